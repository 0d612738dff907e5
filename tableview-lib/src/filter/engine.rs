//! Filter engine - query state, row predicate and match spans.

use std::collections::BTreeSet;
use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

use super::pattern::SearchPattern;
use crate::model::{ColumnSet, Row, RowId};

/// Which columns a query is searched in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// Every searchable column (every field when no columns are described).
    #[default]
    All,
    /// Only the named columns.
    Columns(BTreeSet<String>),
}

impl SearchScope {
    /// Restrict searching to the given columns.
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchScope::Columns(columns.into_iter().map(Into::into).collect())
    }

    fn keys<'a>(&'a self, columns: &'a ColumnSet, row: &'a Row) -> Vec<&'a str> {
        match self {
            SearchScope::All => columns.searchable_keys(row),
            SearchScope::Columns(keys) => keys.iter().map(String::as_str).collect(),
        }
    }
}

/// The active search of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Raw query text; surrounding whitespace is ignored.
    pub query: String,
    /// Columns to search.
    pub scope: SearchScope,
    /// Whether letter case must match.
    pub case_sensitive: bool,
    /// Queries shorter than this (in characters) do not filter.
    pub min_length: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            scope: SearchScope::All,
            case_sensitive: false,
            min_length: 1,
        }
    }
}

impl FilterState {
    /// Create a state for a query with default options.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set the search scope.
    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Enable or disable case-sensitive matching.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Set the minimum query length.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// The query text that is actually searched for.
    pub fn needle(&self) -> &str {
        self.query.trim()
    }

    /// Returns `true` if the query is long enough to filter.
    pub fn is_active(&self) -> bool {
        let needle = self.needle();
        !needle.is_empty() && needle.chars().count() >= self.min_length
    }
}

/// Where a match occurred inside a cell's rendered text.
///
/// `start..end` is a byte range into
/// [`CellValue::display_text`](crate::model::CellValue::display_text).
/// `row_index` is the row's position in the filtered input, which stays
/// unambiguous even when two rows share an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchSpan {
    pub row_index: usize,
    pub row_id: RowId,
    pub column_key: String,
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    /// The span as a byte range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Result of one filter pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    /// Indices of kept rows, in input order.
    pub indices: Vec<usize>,
    /// Match locations for highlighting.
    pub matches: Vec<MatchSpan>,
}

impl FilterOutcome {
    fn unfiltered(len: usize) -> Self {
        Self {
            indices: (0..len).collect(),
            matches: Vec::new(),
        }
    }

    /// The kept rows.
    pub fn rows<'a>(&'a self, rows: &'a [Row]) -> impl Iterator<Item = &'a Row> + 'a {
        self.indices.iter().filter_map(|&i| rows.get(i))
    }

    /// Number of kept rows.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no row was kept.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Spans of one cell, left to right.
    pub fn spans_for(&self, row_id: &RowId, column_key: &str) -> Vec<Range<usize>> {
        self.matches
            .iter()
            .filter(|m| &m.row_id == row_id && m.column_key == column_key)
            .map(MatchSpan::range)
            .collect()
    }
}

/// Filter rows by a query.
///
/// A row is kept when any searched column contains the query. Inactive
/// queries (shorter than `min_length`) keep every row and report no spans.
///
/// # Example
///
/// ```
/// use tableview_lib::filter::{FilterState, filter_rows};
/// use tableview_lib::model::{ColumnSet, Row};
///
/// let rows = vec![
///     Row::new("1").set("name", "Laptop"),
///     Row::new("2").set("name", "Desk"),
/// ];
/// let outcome = filter_rows(&rows, &ColumnSet::new(), &FilterState::new("lap"));
///
/// assert_eq!(outcome.indices, vec![0]);
/// assert_eq!(outcome.matches[0].range(), 0..3);
/// ```
pub fn filter_rows(rows: &[Row], columns: &ColumnSet, state: &FilterState) -> FilterOutcome {
    if !state.is_active() {
        return FilterOutcome::unfiltered(rows.len());
    }

    let pattern = SearchPattern::new(state.needle(), state.case_sensitive);
    let mut outcome = FilterOutcome::default();

    for (index, row) in rows.iter().enumerate() {
        let mut kept = false;
        for key in state.scope.keys(columns, row) {
            let text = columns.resolve(row, key).display_text();
            let spans = pattern.find_iter(&text);
            if spans.is_empty() {
                continue;
            }
            kept = true;
            outcome.matches.extend(spans.into_iter().map(|range| MatchSpan {
                row_index: index,
                row_id: row.id().clone(),
                column_key: key.to_string(),
                start: range.start,
                end: range.end,
            }));
        }
        if kept {
            outcome.indices.push(index);
        }
    }

    outcome
}

/// Owns the active [`FilterState`] of a table and its last outcome.
///
/// Applying an unchanged state to unchanged data is a no-op. Changing the
/// query drops the previous match spans before anything is recomputed.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    state: FilterState,
    outcome: FilterOutcome,
    applied: Option<(FilterState, u64)>,
    passes: usize,
}

impl FilterEngine {
    /// Create an engine starting from `state`.
    pub fn new(state: FilterState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    /// The active state.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// The outcome of the last pass.
    pub fn outcome(&self) -> &FilterOutcome {
        &self.outcome
    }

    /// Number of filter passes actually evaluated.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Set the query. Returns `false` if it was unchanged.
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if query == self.state.query {
            return false;
        }
        self.outcome.matches.clear();
        self.state.query = query;
        true
    }

    /// Set the search scope. Returns `false` if it was unchanged.
    pub fn set_scope(&mut self, scope: SearchScope) -> bool {
        if scope == self.state.scope {
            return false;
        }
        self.state.scope = scope;
        true
    }

    /// Set case sensitivity. Returns `false` if it was unchanged.
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) -> bool {
        if case_sensitive == self.state.case_sensitive {
            return false;
        }
        self.state.case_sensitive = case_sensitive;
        true
    }

    /// Set the minimum query length. Returns `false` if it was unchanged.
    pub fn set_min_length(&mut self, min_length: usize) -> bool {
        if min_length == self.state.min_length {
            return false;
        }
        self.state.min_length = min_length;
        true
    }

    /// Clear the query and its highlights.
    pub fn clear(&mut self) -> bool {
        self.set_query(String::new())
    }

    /// Filter `rows`, reusing the last outcome when neither the state nor
    /// the data `generation` changed.
    pub fn apply(&mut self, rows: &[Row], columns: &ColumnSet, generation: u64) -> &FilterOutcome {
        let unchanged = self
            .applied
            .as_ref()
            .is_some_and(|(state, applied_generation)| {
                *state == self.state && *applied_generation == generation
            });
        if unchanged {
            log::trace!("filter state unchanged; reusing previous outcome");
            return &self.outcome;
        }

        self.outcome = filter_rows(rows, columns, &self.state);
        self.passes += 1;
        self.applied = Some((self.state.clone(), generation));
        log::debug!(
            "filter pass {} for {:?}: kept {} of {} rows, {} spans",
            self.passes,
            self.state.needle(),
            self.outcome.len(),
            rows.len(),
            self.outcome.matches.len()
        );
        &self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnDescriptor;

    fn assets() -> Vec<Row> {
        vec![
            Row::new("A1").set("name", "Laptop").set("dept", "IT"),
            Row::new("A2").set("name", "Desk").set("dept", "Facilities"),
            Row::new("A3").set("name", "Laptop stand").set("dept", "IT"),
        ]
    }

    #[test]
    fn test_inactive_query_keeps_all() {
        let state = FilterState::new("la").with_min_length(3);
        let outcome = filter_rows(&assets(), &ColumnSet::new(), &state);
        assert_eq!(outcome.indices, vec![0, 1, 2]);
        assert!(outcome.matches.is_empty());
    }

    #[test]
    fn test_whitespace_query_is_inactive() {
        let state = FilterState::new("   ");
        assert!(!state.is_active());
    }

    #[test]
    fn test_any_column_matches() {
        let outcome = filter_rows(&assets(), &ColumnSet::new(), &FilterState::new("it"));
        // "IT" dept, and "Facilities" contains "it"
        assert_eq!(outcome.indices, vec![0, 1, 2]);

        let outcome = filter_rows(
            &assets(),
            &ColumnSet::new(),
            &FilterState::new("it").with_case_sensitive(true),
        );
        assert_eq!(outcome.indices, vec![1]);
    }

    #[test]
    fn test_scope_restricts_columns() {
        let state = FilterState::new("it").with_scope(SearchScope::columns(["name"]));
        let outcome = filter_rows(&assets(), &ColumnSet::new(), &state);
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_unsearchable_descriptor_skipped() {
        let columns = ColumnSet::from(vec![
            ColumnDescriptor::new("name"),
            ColumnDescriptor::new("dept").searchable(false),
        ]);
        let outcome = filter_rows(&assets(), &columns, &FilterState::new("it"));
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_spans_cover_every_occurrence() {
        let rows = vec![Row::new("r").set("memo", "lap LAP lap")];
        let outcome = filter_rows(&rows, &ColumnSet::new(), &FilterState::new("lap"));
        assert_eq!(
            outcome.spans_for(&RowId::from("r"), "memo"),
            vec![0..3, 4..7, 8..11]
        );
    }

    #[test]
    fn test_numbers_searched_by_rendered_text() {
        let rows = vec![Row::new("r").set("price", 1200)];
        let outcome = filter_rows(&rows, &ColumnSet::new(), &FilterState::new("20"));
        assert_eq!(outcome.indices, vec![0]);
        assert_eq!(outcome.matches[0].range(), 1..3);
    }

    #[test]
    fn test_engine_skips_unchanged_pass() {
        let rows = assets();
        let columns = ColumnSet::new();
        let mut engine = FilterEngine::new(FilterState::new("desk"));
        engine.apply(&rows, &columns, 0);
        engine.apply(&rows, &columns, 0);
        assert_eq!(engine.passes(), 1);

        engine.apply(&rows, &columns, 1);
        assert_eq!(engine.passes(), 2);

        assert!(!engine.set_query("desk"));
        engine.apply(&rows, &columns, 1);
        assert_eq!(engine.passes(), 2);
    }

    #[test]
    fn test_query_change_drops_highlights() {
        let rows = assets();
        let columns = ColumnSet::new();
        let mut engine = FilterEngine::new(FilterState::new("desk"));
        assert_eq!(engine.apply(&rows, &columns, 0).matches.len(), 1);

        assert!(engine.set_query("laptop"));
        assert!(engine.outcome().matches.is_empty());

        let outcome = engine.apply(&rows, &columns, 0);
        assert_eq!(outcome.indices, vec![0, 2]);
        assert_eq!(outcome.matches.len(), 2);
    }

    #[test]
    fn test_clear() {
        let rows = assets();
        let columns = ColumnSet::new();
        let mut engine = FilterEngine::new(FilterState::new("desk"));
        engine.apply(&rows, &columns, 0);
        assert!(engine.clear());
        assert_eq!(engine.apply(&rows, &columns, 0).len(), 3);
    }
}
