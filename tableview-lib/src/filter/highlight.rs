//! Splitting rendered text around match spans.

use std::ops::Range;

/// A piece of a cell's rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Match(&'a str),
}

impl<'a> Segment<'a> {
    /// The text of this piece.
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Plain(s) | Segment::Match(s) => s,
        }
    }

    /// Returns `true` for matched pieces.
    pub fn is_match(&self) -> bool {
        matches!(self, Segment::Match(_))
    }
}

/// Split `text` into plain and matched pieces.
///
/// Spans are taken in start order; spans that overlap an earlier one, fall
/// outside the text or do not sit on character boundaries are ignored.
/// Concatenating the pieces always reproduces `text`.
///
/// # Example
///
/// ```
/// use tableview_lib::filter::{Segment, highlight_segments};
///
/// let segments = highlight_segments("Laptop stand", &[0..3]);
/// assert_eq!(segments, vec![Segment::Match("Lap"), Segment::Plain("top stand")]);
/// ```
pub fn highlight_segments<'a>(text: &'a str, spans: &[Range<usize>]) -> Vec<Segment<'a>> {
    let mut spans: Vec<&Range<usize>> = spans
        .iter()
        .filter(|r| {
            r.start < r.end
                && r.end <= text.len()
                && text.is_char_boundary(r.start)
                && text.is_char_boundary(r.end)
        })
        .collect();
    spans.sort_by_key(|r| (r.start, r.end));

    let mut segments = Vec::new();
    let mut cursor = 0;
    for span in spans {
        if span.start < cursor {
            continue;
        }
        if span.start > cursor {
            segments.push(Segment::Plain(&text[cursor..span.start]));
        }
        segments.push(Segment::Match(&text[span.start..span.end]));
        cursor = span.end;
    }
    if cursor < text.len() {
        segments.push(Segment::Plain(&text[cursor..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(segments: &[Segment<'_>]) -> String {
        segments.iter().map(Segment::text).collect()
    }

    #[test]
    fn test_no_spans() {
        assert_eq!(highlight_segments("desk", &[]), vec![Segment::Plain("desk")]);
        assert!(highlight_segments("", &[]).is_empty());
    }

    #[test]
    fn test_multiple_spans() {
        let segments = highlight_segments("lap LAP lap", &[8..11, 0..3, 4..7]);
        assert_eq!(
            segments,
            vec![
                Segment::Match("lap"),
                Segment::Plain(" "),
                Segment::Match("LAP"),
                Segment::Plain(" "),
                Segment::Match("lap"),
            ]
        );
    }

    #[test]
    fn test_invalid_spans_ignored() {
        let text = "모니터 27";
        // 1..2 is inside the first character
        let segments = highlight_segments(text, &[1..2, 0..3, 2..6, 40..50]);
        assert_eq!(segments[0], Segment::Match("모"));
        assert_eq!(joined(&segments), text);
        assert_eq!(segments.iter().filter(|s| s.is_match()).count(), 1);
    }
}
