//! Search pattern compilation with literal fallback.

use std::ops::Range;

use regex::Regex;
use regex::RegexBuilder;

/// A compiled substring matcher for one query.
///
/// Every character with special meaning in pattern syntax is escaped before
/// compiling, so user input such as `"[draft"` or `"a+b"` is searched
/// literally. If the escaped pattern still fails to compile (size limits on
/// very long input), the matcher degrades to a char-wise literal scan.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    needle: String,
    case_sensitive: bool,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Regex(Regex),
    Literal,
}

impl SearchPattern {
    /// Compile a matcher for `needle`.
    pub fn new(needle: &str, case_sensitive: bool) -> Self {
        let matcher = match RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(!case_sensitive)
            .build()
        {
            Ok(re) => Matcher::Regex(re),
            Err(e) => {
                log::warn!("search pattern fell back to literal scan: {e}");
                Matcher::Literal
            }
        };
        Self {
            needle: needle.to_string(),
            case_sensitive,
            matcher,
        }
    }

    /// A matcher that always uses the literal scan.
    pub fn literal(needle: &str, case_sensitive: bool) -> Self {
        Self {
            needle: needle.to_string(),
            case_sensitive,
            matcher: Matcher::Literal,
        }
    }

    /// The query text.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Returns `true` if the matcher is the literal fallback.
    pub fn is_literal(&self) -> bool {
        matches!(self.matcher, Matcher::Literal)
    }

    /// Returns `true` if `text` contains the needle. An empty needle
    /// matches everything.
    pub fn is_match(&self, text: &str) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        match &self.matcher {
            Matcher::Regex(re) => re.is_match(text),
            Matcher::Literal => !self.literal_find(text, true).is_empty(),
        }
    }

    /// Byte ranges of every non-overlapping occurrence, left to right.
    ///
    /// An empty needle yields no ranges.
    pub fn find_iter(&self, text: &str) -> Vec<Range<usize>> {
        if self.needle.is_empty() {
            return Vec::new();
        }
        match &self.matcher {
            Matcher::Regex(re) => re.find_iter(text).map(|m| m.range()).collect(),
            Matcher::Literal => self.literal_find(text, false),
        }
    }

    fn literal_find(&self, text: &str, first_only: bool) -> Vec<Range<usize>> {
        if self.case_sensitive {
            let found = text
                .match_indices(self.needle.as_str())
                .map(|(start, m)| start..start + m.len());
            return if first_only {
                found.take(1).collect()
            } else {
                found.collect()
            };
        }

        let mut ranges = Vec::new();
        let mut resume = 0;
        for (start, _) in text.char_indices() {
            if start < resume {
                continue;
            }
            if let Some(end) = self.fold_match_at(text, start) {
                ranges.push(start..end);
                if first_only {
                    break;
                }
                resume = end;
            }
        }
        ranges
    }

    /// End offset of a case-insensitive match starting at `start`.
    fn fold_match_at(&self, text: &str, start: usize) -> Option<usize> {
        let mut haystack = text[start..].char_indices();
        for wanted in self.needle.chars() {
            let (_, found) = haystack.next()?;
            if found != wanted && !found.to_lowercase().eq(wanted.to_lowercase()) {
                return None;
            }
        }
        let consumed = haystack.next().map_or(text.len() - start, |(offset, _)| offset);
        Some(start + consumed)
    }
}
