//! The seam between the engine and whatever draws the table.

use std::ops::Range;

use super::state::TableId;
use crate::filter::{MatchSpan, Segment, highlight_segments};
use crate::model::{Row, RowId};
use crate::paging::{PageLink, PageState};
use crate::sort::{SortDirection, SortKey};

/// Everything a view needs to draw one table state.
///
/// Produced by [`TableView::snapshot`](super::TableView::snapshot); holds
/// copies, so it can outlive further changes to the table.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    /// The table this snapshot belongs to.
    pub table_id: TableId,
    /// Rows of the current page, in display order.
    pub rows: Vec<Row>,
    /// Active sort keys in priority order.
    pub sort_keys: Vec<SortKey>,
    /// Match spans of the rows on this page.
    pub matches: Vec<MatchSpan>,
    /// Page position.
    pub page: PageState,
    /// Whether pagination controls are worth showing.
    pub controls_needed: bool,
    /// Page-number strip.
    pub page_links: Vec<PageLink>,
    /// 1-based bounds of the rows on this page.
    pub item_range: Option<(usize, usize)>,
    /// Row count before filtering.
    pub total_unfiltered: usize,
    /// The applied query.
    pub query: String,
}

impl ViewSnapshot {
    /// Sort indicator for a column header.
    pub fn sort_indicator(&self, column: &str) -> Option<(SortDirection, usize)> {
        self.sort_keys
            .iter()
            .find(|k| k.column == column)
            .map(|k| (k.direction, k.priority))
    }

    /// Spans of one cell, left to right.
    pub fn spans_for(&self, row_id: &RowId, column_key: &str) -> Vec<Range<usize>> {
        self.matches
            .iter()
            .filter(|m| &m.row_id == row_id && m.column_key == column_key)
            .map(MatchSpan::range)
            .collect()
    }

    /// Split a cell's rendered text into plain and matched pieces.
    pub fn segments<'a>(&self, row_id: &RowId, column_key: &str, text: &'a str) -> Vec<Segment<'a>> {
        highlight_segments(text, &self.spans_for(row_id, column_key))
    }

    /// Returns `true` if filtering removed rows.
    pub fn is_filtered(&self) -> bool {
        self.page.total_items < self.total_unfiltered
    }
}

/// Draws table state.
///
/// Implementors own all presentation: cell markup, sort indicators,
/// highlight styling and page controls. The engine only hands over
/// snapshots.
pub trait ViewAdapter {
    /// Draw a snapshot.
    fn render(&mut self, snapshot: &ViewSnapshot);
}

impl<F: FnMut(&ViewSnapshot)> ViewAdapter for F {
    fn render(&mut self, snapshot: &ViewSnapshot) {
        self(snapshot)
    }
}
