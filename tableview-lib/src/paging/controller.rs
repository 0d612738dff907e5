//! Pagination controller - page window state machine.

use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

/// Page position of a table.
///
/// After any controller operation `1 <= current_page <= total_pages()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    /// Current page (1-indexed).
    pub current_page: usize,
    /// Rows per page (at least 1).
    pub page_size: usize,
    /// Rows across all pages.
    pub total_items: usize,
}

impl PageState {
    /// Number of pages; an empty table still has one (empty) page.
    pub fn total_pages(&self) -> usize {
        let page_size = self.page_size.max(1);
        self.total_items.div_ceil(page_size).max(1)
    }

    /// Index of the first row on the current page.
    pub fn offset(&self) -> usize {
        (self.current_page.max(1) - 1).saturating_mul(self.page_size)
    }
}

/// One entry of a page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// A numbered page button.
    Page(usize),
    /// Elided pages.
    Gap,
}

/// Drives the page window of one table.
///
/// The controller lives as long as the table and is told about every data
/// change; it clamps instead of failing and reports rejected navigation as
/// `false`.
///
/// # Example
///
/// ```
/// use tableview_lib::paging::PaginationController;
///
/// let mut pages = PaginationController::new(10);
/// pages.on_data_changed(25);
/// assert!(pages.goto(3));
///
/// pages.on_data_changed(5);
/// assert_eq!(pages.current_page(), 1);
/// assert_eq!(pages.total_pages(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PaginationController {
    state: PageState,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PaginationController {
    /// Create a controller on page 1 of an empty table.
    ///
    /// A page size of 0 is clamped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            state: PageState {
                current_page: 1,
                page_size: page_size.max(1),
                total_items: 0,
            },
        }
    }

    /// Snapshot of the page state.
    pub fn state(&self) -> PageState {
        self.state
    }

    /// Current page (1-indexed).
    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.state.page_size
    }

    /// Rows across all pages.
    pub fn total_items(&self) -> usize {
        self.state.total_items
    }

    /// Number of pages (at least 1).
    pub fn total_pages(&self) -> usize {
        self.state.total_pages()
    }

    /// Index of the first row on the current page.
    pub fn offset(&self) -> usize {
        self.state.offset()
    }

    // -------------------------------------------------------------------------
    // Data changes
    // -------------------------------------------------------------------------

    /// Record a new row count and clamp the current page.
    ///
    /// Returns `true` if the current page moved.
    pub fn on_data_changed(&mut self, total_items: usize) -> bool {
        self.state.total_items = total_items;
        self.clamp()
    }

    /// Change the page size and clamp the current page.
    ///
    /// A size of 0 is clamped to 1. Returns `true` if the current page moved.
    pub fn on_page_size_changed(&mut self, page_size: usize) -> bool {
        self.state.page_size = page_size.max(1);
        self.clamp()
    }

    fn clamp(&mut self) -> bool {
        let total_pages = self.total_pages();
        let clamped = self.state.current_page.clamp(1, total_pages);
        if clamped == self.state.current_page {
            return false;
        }
        log::debug!(
            "page {} out of range ({} pages, {} rows); clamped to {}",
            self.state.current_page,
            total_pages,
            self.state.total_items,
            clamped
        );
        self.state.current_page = clamped;
        true
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Go to page `page`. Out-of-range pages leave the state unchanged and
    /// return `false`.
    pub fn goto(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.state.current_page = page;
        true
    }

    /// Go to the next page.
    pub fn next(&mut self) -> bool {
        self.goto(self.state.current_page + 1)
    }

    /// Go to the previous page.
    pub fn prev(&mut self) -> bool {
        self.goto(self.state.current_page.saturating_sub(1))
    }

    /// Go to the first page.
    pub fn first(&mut self) -> bool {
        self.goto(1)
    }

    /// Go to the last page.
    pub fn last(&mut self) -> bool {
        self.goto(self.total_pages())
    }

    /// Returns `true` if there is a page after the current one.
    pub fn has_next(&self) -> bool {
        self.state.current_page < self.total_pages()
    }

    /// Returns `true` if there is a page before the current one.
    pub fn has_prev(&self) -> bool {
        self.state.current_page > 1
    }

    // -------------------------------------------------------------------------
    // Window
    // -------------------------------------------------------------------------

    /// Index range of the current page within a sequence of `len` rows.
    pub fn window_range(&self, len: usize) -> Range<usize> {
        let start = self.offset().min(len);
        let end = start.saturating_add(self.state.page_size).min(len);
        start..end
    }

    /// The rows of the current page.
    pub fn window_for<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[self.window_range(rows.len())]
    }

    /// 1-based inclusive bounds of the rows on the current page, for
    /// "showing x-y of z" labels. `None` when there are no rows.
    pub fn item_range(&self) -> Option<(usize, usize)> {
        let range = self.window_range(self.state.total_items);
        if range.is_empty() {
            return None;
        }
        Some((range.start + 1, range.end))
    }

    /// Whether pagination controls are worth showing.
    ///
    /// Advisory only: slicing is the same either way.
    pub fn controls_needed(&self) -> bool {
        self.state.total_items > self.state.page_size
    }

    /// Page-number strip centred on the current page.
    ///
    /// Up to `max_buttons` consecutive pages around the current one, with the
    /// first and last pages always reachable and [`PageLink::Gap`] marking
    /// elided runs.
    pub fn visible_pages(&self, max_buttons: usize) -> Vec<PageLink> {
        let total = self.total_pages();
        let max_buttons = max_buttons.max(1);
        if total <= max_buttons {
            return (1..=total).map(PageLink::Page).collect();
        }

        let current = self.state.current_page;
        let mut start = current.saturating_sub(max_buttons / 2).max(1);
        let mut end = start + max_buttons - 1;
        if end > total {
            end = total;
            start = end + 1 - max_buttons;
        }

        let mut links = Vec::with_capacity(max_buttons + 4);
        if start > 1 {
            links.push(PageLink::Page(1));
            if start > 2 {
                links.push(PageLink::Gap);
            }
        }
        links.extend((start..=end).map(PageLink::Page));
        if end < total {
            if end + 1 < total {
                links.push(PageLink::Gap);
            }
            links.push(PageLink::Page(total));
        }
        links
    }
}
