//! Table view state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::adapter::{ViewAdapter, ViewSnapshot};
use crate::config::ViewConfig;
use crate::filter::{Debouncer, FilterEngine, FilterState, MatchSpan, SearchScope};
use crate::model::{ColumnSet, Row};
use crate::paging::{PageState, PaginationController};
use crate::sort::{SortController, SortDirection, SortKey};

/// Unique identifier for a TableView instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__tableview_{}", self.0)
    }
}

/// Internal state for a TableView.
#[derive(Debug)]
struct TableInner {
    /// The rows as supplied; never reordered.
    rows: Vec<Row>,
    /// Bumped on every row replacement.
    generation: u64,
    /// Column descriptors.
    columns: ColumnSet,
    /// Active sort keys.
    sort: SortController,
    /// Active query and last filter outcome.
    filter: FilterEngine,
    /// Page window.
    pages: PaginationController,
    /// Pending as-you-type query.
    debouncer: Debouncer<String>,
    /// Page-number strip width.
    page_buttons: usize,
    /// Filtered, sorted row indices.
    ordered: Vec<usize>,
    /// Whether `ordered` must be recomputed.
    stale: bool,
}

impl TableInner {
    fn new(config: &ViewConfig, columns: ColumnSet, rows: Vec<Row>) -> Self {
        let config = config.sanitized();
        let filter_state = FilterState::default()
            .with_case_sensitive(config.case_sensitive)
            .with_min_length(config.min_query_length);
        Self {
            rows,
            generation: 0,
            columns,
            sort: SortController::new(),
            filter: FilterEngine::new(filter_state),
            pages: PaginationController::new(config.page_size),
            debouncer: Debouncer::new(config.debounce),
            page_buttons: config.page_buttons,
            ordered: Vec::new(),
            stale: true,
        }
    }

    /// Filter, sort and re-clamp the page window if anything changed.
    fn refresh(&mut self) {
        if !self.stale {
            return;
        }
        let mut ordered = self
            .filter
            .apply(&self.rows, &self.columns, self.generation)
            .indices
            .clone();
        self.sort.apply(&self.rows, &self.columns, &mut ordered);
        self.ordered = ordered;
        self.pages.on_data_changed(self.ordered.len());
        self.stale = false;
    }

    fn run_search(&mut self, query: String) -> bool {
        let changed = self.filter.set_query(query);
        if changed {
            self.stale = true;
        }
        self.refresh();
        changed
    }

    fn snapshot(&mut self, table_id: TableId) -> ViewSnapshot {
        self.refresh();
        let window = &self.ordered[self.pages.window_range(self.ordered.len())];
        let rows = window
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();

        ViewSnapshot {
            table_id,
            rows,
            sort_keys: self.sort.keys().to_vec(),
            matches: visible_matches(&self.filter.outcome().matches, window),
            page: self.pages.state(),
            controls_needed: self.pages.controls_needed(),
            page_links: self.pages.visible_pages(self.page_buttons),
            item_range: self.pages.item_range(),
            total_unfiltered: self.rows.len(),
            query: self.filter.state().query.clone(),
        }
    }
}

/// The sort, search and page state of one table.
///
/// `TableView` is a cheap handle: clones share the same table, which lets a
/// [`SearchScheduler`](super::SearchScheduler) run debounced passes against
/// it. Separate `TableView::new` calls never share state.
///
/// Every recomputation runs filter, then a stable sort, then re-clamps the
/// page window. Operations never fail; rejected navigation returns `false`.
///
/// # Example
///
/// ```
/// use tableview_lib::ViewConfig;
/// use tableview_lib::model::{ColumnSet, Row};
/// use tableview_lib::view::TableView;
///
/// let rows = (1..=25usize)
///     .map(|n| Row::new(n).set("name", format!("Asset {n}")))
///     .collect();
/// let table = TableView::with_rows(ViewConfig::default(), ColumnSet::new(), rows);
///
/// assert!(table.goto_page(3));
/// assert_eq!(table.snapshot().rows.len(), 5);
///
/// table.search_now("Asset 2");
/// let snapshot = table.snapshot();
/// assert_eq!(snapshot.page.total_items, 7); // 2, 20..=25
/// assert_eq!(snapshot.page.current_page, 1);
/// ```
#[derive(Debug)]
pub struct TableView {
    /// Unique identifier.
    id: TableId,
    /// Internal state.
    inner: Arc<RwLock<TableInner>>,
    /// Dirty flag for re-render.
    dirty: Arc<AtomicBool>,
}

impl TableView {
    /// Create an empty table view.
    pub fn new(config: ViewConfig) -> Self {
        Self::with_rows(config, ColumnSet::new(), Vec::new())
    }

    /// Create a table view over initial rows.
    pub fn with_rows(config: ViewConfig, columns: ColumnSet, rows: Vec<Row>) -> Self {
        Self {
            id: TableId::new(),
            inner: Arc::new(RwLock::new(TableInner::new(&config, columns, rows))),
            dirty: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get the unique ID.
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Run `f` on the state and mark the view dirty if it reports a change.
    fn update<R>(&self, default: R, f: impl FnOnce(&mut TableInner) -> (R, bool)) -> R {
        match self.inner.write() {
            Ok(mut guard) => {
                let (result, changed) = f(&mut guard);
                if changed {
                    self.dirty.store(true, Ordering::SeqCst);
                }
                result
            }
            Err(_) => {
                log::warn!("table {} state lock poisoned", self.id);
                default
            }
        }
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Replace the rows.
    pub fn set_rows(&self, rows: Vec<Row>) {
        self.update((), |inner| {
            inner.rows = rows;
            inner.generation += 1;
            inner.stale = true;
            inner.refresh();
            ((), true)
        })
    }

    /// Replace the column descriptors.
    pub fn set_columns(&self, columns: ColumnSet) {
        self.update((), |inner| {
            inner.columns = columns;
            // Accessors may have changed what a cell reads as.
            inner.generation += 1;
            inner.stale = true;
            ((), true)
        })
    }

    /// Get the rows as supplied (unfiltered, unsorted).
    pub fn rows(&self) -> Vec<Row> {
        self.inner
            .read()
            .map(|g| g.rows.clone())
            .unwrap_or_default()
    }

    /// Number of rows before filtering.
    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.rows.len()).unwrap_or(0)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Schedule a query typed at `now`, cancelling any pending one.
    ///
    /// Nothing is filtered until [`poll_search`](Self::poll_search) runs
    /// after the debounce delay. Returns the deadline.
    pub fn input_query(&self, query: impl Into<String>, now: Instant) -> Instant {
        let query = query.into();
        self.update(now, |inner| (inner.debouncer.schedule(query, now), false))
    }

    /// Run the pending query if its delay has passed.
    ///
    /// Returns `true` if a search pass ran.
    pub fn poll_search(&self, now: Instant) -> bool {
        self.update(false, |inner| match inner.debouncer.poll(now) {
            Some(query) => {
                let changed = inner.run_search(query);
                (true, changed)
            }
            None => (false, false),
        })
    }

    /// Search immediately, cancelling any pending query.
    ///
    /// Returns `false` if the query was already applied.
    pub fn search_now(&self, query: impl Into<String>) -> bool {
        let query = query.into();
        self.update(false, |inner| {
            inner.debouncer.cancel();
            let changed = inner.run_search(query);
            (changed, changed)
        })
    }

    /// Run the pending query now, if there is one.
    pub fn flush_search(&self) -> bool {
        self.update(false, |inner| match inner.debouncer.flush() {
            Some(query) => {
                let changed = inner.run_search(query);
                (true, changed)
            }
            None => (false, false),
        })
    }

    /// Drop the pending query without running it.
    pub fn cancel_search(&self) -> bool {
        self.update(false, |inner| (inner.debouncer.cancel().is_some(), false))
    }

    /// Check if a typed query is waiting for its delay.
    pub fn has_pending_search(&self) -> bool {
        self.inner
            .read()
            .map(|g| g.debouncer.is_pending())
            .unwrap_or(false)
    }

    /// When the pending query runs.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.inner.read().ok().and_then(|g| g.debouncer.deadline())
    }

    /// The applied query.
    pub fn query(&self) -> String {
        self.inner
            .read()
            .map(|g| g.filter.state().query.clone())
            .unwrap_or_default()
    }

    /// Restrict or widen the searched columns.
    pub fn set_search_scope(&self, scope: SearchScope) {
        self.update((), |inner| {
            let changed = inner.filter.set_scope(scope);
            inner.stale |= changed;
            ((), changed)
        })
    }

    /// Enable or disable case-sensitive search.
    pub fn set_case_sensitive(&self, case_sensitive: bool) {
        self.update((), |inner| {
            let changed = inner.filter.set_case_sensitive(case_sensitive);
            inner.stale |= changed;
            ((), changed)
        })
    }

    /// Set the minimum query length.
    pub fn set_min_query_length(&self, min_length: usize) {
        self.update((), |inner| {
            let changed = inner.filter.set_min_length(min_length);
            inner.stale |= changed;
            ((), changed)
        })
    }

    /// Number of filter passes evaluated so far.
    pub fn filter_passes(&self) -> usize {
        self.inner.read().map(|g| g.filter.passes()).unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Sort
    // -------------------------------------------------------------------------

    /// Handle a header interaction (see [`SortController::toggle`]).
    pub fn toggle_sort(&self, column: &str, multi_key: bool) {
        self.update((), |inner| {
            inner.sort.toggle(column, multi_key);
            inner.stale = true;
            ((), true)
        })
    }

    /// Make a column the only sort key.
    pub fn set_sort(&self, column: &str, direction: SortDirection) {
        self.update((), |inner| {
            inner.sort.set(column, direction);
            inner.stale = true;
            ((), true)
        })
    }

    /// Append a lowest-priority sort key.
    pub fn add_sort(&self, column: &str, direction: SortDirection) {
        self.update((), |inner| {
            inner.sort.add(column, direction);
            inner.stale = true;
            ((), true)
        })
    }

    /// Remove a column's sort key.
    pub fn remove_sort(&self, column: &str) -> bool {
        self.update(false, |inner| {
            let removed = inner.sort.remove(column);
            inner.stale |= removed;
            (removed, removed)
        })
    }

    /// Clear all sort keys; rows return to their supplied order.
    pub fn clear_sort(&self) {
        self.update((), |inner| {
            let changed = !inner.sort.is_empty();
            inner.sort.clear();
            inner.stale |= changed;
            ((), changed)
        })
    }

    /// Active sort keys in priority order.
    pub fn sort_keys(&self) -> Vec<SortKey> {
        self.inner
            .read()
            .map(|g| g.sort.keys().to_vec())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Pages
    // -------------------------------------------------------------------------

    fn navigate(&self, f: impl FnOnce(&mut PaginationController) -> bool) -> bool {
        self.update(false, |inner| {
            inner.refresh();
            let moved = f(&mut inner.pages);
            (moved, moved)
        })
    }

    /// Go to a page. Out-of-range pages return `false`.
    pub fn goto_page(&self, page: usize) -> bool {
        self.navigate(|pages| pages.goto(page))
    }

    /// Go to the next page.
    pub fn next_page(&self) -> bool {
        self.navigate(PaginationController::next)
    }

    /// Go to the previous page.
    pub fn prev_page(&self) -> bool {
        self.navigate(PaginationController::prev)
    }

    /// Go to the first page.
    pub fn first_page(&self) -> bool {
        self.navigate(PaginationController::first)
    }

    /// Go to the last page.
    pub fn last_page(&self) -> bool {
        self.navigate(PaginationController::last)
    }

    /// Change the page size (0 is clamped to 1).
    pub fn set_page_size(&self, page_size: usize) {
        self.update((), |inner| {
            inner.refresh();
            inner.pages.on_page_size_changed(page_size);
            ((), true)
        })
    }

    /// Current page position.
    pub fn page_state(&self) -> PageState {
        self.update(PaginationController::default().state(), |inner| {
            inner.refresh();
            (inner.pages.state(), false)
        })
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Compute the current page and everything needed to draw it.
    pub fn snapshot(&self) -> ViewSnapshot {
        let id = self.id;
        self.update(empty_snapshot(id), |inner| (inner.snapshot(id), false))
    }

    /// Hand the current snapshot to an adapter and clear the dirty flag.
    pub fn render(&self, adapter: &mut dyn ViewAdapter) {
        let snapshot = self.snapshot();
        adapter.render(&snapshot);
        self.clear_dirty();
    }

    /// Check if the table has changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

/// Match spans of the rows at `window`, matched by row position rather
/// than id.
fn visible_matches(matches: &[MatchSpan], window: &[usize]) -> Vec<MatchSpan> {
    let visible: HashSet<usize> = window.iter().copied().collect();
    matches
        .iter()
        .filter(|m| visible.contains(&m.row_index))
        .cloned()
        .collect()
}

fn empty_snapshot(table_id: TableId) -> ViewSnapshot {
    let pages = PaginationController::default();
    ViewSnapshot {
        table_id,
        rows: Vec::new(),
        sort_keys: Vec::new(),
        matches: Vec::new(),
        page: pages.state(),
        controls_needed: false,
        page_links: Vec::new(),
        item_range: None,
        total_unfiltered: 0,
        query: String::new(),
    }
}

impl Clone for TableView {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl Default for TableView {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::model::ColumnDescriptor;

    fn assets(n: usize) -> Vec<Row> {
        (1..=n)
            .map(|i| {
                Row::new(i)
                    .set("name", format!("Asset {i:02}"))
                    .set("price", (i % 4) * 100)
            })
            .collect()
    }

    fn ids(snapshot: &ViewSnapshot) -> Vec<String> {
        snapshot.rows.iter().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let a = TableView::with_rows(ViewConfig::default(), ColumnSet::new(), assets(5));
        let b = TableView::with_rows(ViewConfig::default(), ColumnSet::new(), assets(5));
        assert_ne!(a.id(), b.id());
        a.search_now("Asset 01");
        a.toggle_sort("price", false);
        assert_eq!(b.query(), "");
        assert!(b.sort_keys().is_empty());
        assert_eq!(b.snapshot().rows.len(), 5);

        let shared = a.clone();
        assert_eq!(shared.id(), a.id());
        assert_eq!(shared.query(), "Asset 01");
    }

    #[test]
    fn test_filter_then_sort_then_page() {
        let config = ViewConfig::default().with_page_size(2);
        let table = TableView::with_rows(config, ColumnSet::new(), assets(8));
        table.search_now("Asset 0");
        table.set_sort("price", SortDirection::Descending);
        let snapshot = table.snapshot();
        // prices: 1→100 2→200 3→300 4→0 5→100 6→200 7→300 8→0
        assert_eq!(ids(&snapshot), vec!["3", "7"]);
        assert_eq!(snapshot.page.total_items, 8);
        assert!(snapshot.controls_needed);

        assert!(table.last_page());
        assert_eq!(ids(&table.snapshot()), vec!["4", "8"]);
    }

    #[test]
    fn test_filter_clamps_page() {
        let table = TableView::with_rows(ViewConfig::default(), ColumnSet::new(), assets(25));
        assert!(table.goto_page(3));
        table.search_now("Asset 0");
        let page = table.page_state();
        assert_eq!(page.total_items, 9);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_set_rows_reclamps() {
        let table = TableView::with_rows(ViewConfig::default(), ColumnSet::new(), assets(25));
        assert!(table.last_page());
        table.set_rows(assets(12));
        assert_eq!(table.page_state().current_page, 2);
        assert!(!table.goto_page(3));
    }

    #[test]
    fn test_snapshot_matches_only_visible_rows() {
        let config = ViewConfig::default().with_page_size(3);
        let table = TableView::with_rows(config, ColumnSet::new(), assets(6));
        table.search_now("asset");
        let snapshot = table.snapshot();
        assert_eq!(snapshot.rows.len(), 3);
        assert_eq!(snapshot.matches.len(), 3);
        let first = &snapshot.rows[0];
        assert_eq!(snapshot.spans_for(first.id(), "name"), vec![0..5]);
    }

    #[test]
    fn test_shared_id_spans_stay_on_their_row() {
        let rows = vec![
            Row::new("A").set("name", "axxxxx"),
            Row::new("A").set("name", "xxxxxa"),
        ];
        let config = ViewConfig::default().with_page_size(1);
        let table = TableView::with_rows(config, ColumnSet::new(), rows);
        table.search_now("a");

        let snapshot = table.snapshot();
        assert_eq!(snapshot.matches.len(), 1);
        assert_eq!(snapshot.spans_for(snapshot.rows[0].id(), "name"), vec![0..1]);

        assert!(table.next_page());
        let snapshot = table.snapshot();
        assert_eq!(snapshot.spans_for(snapshot.rows[0].id(), "name"), vec![5..6]);
    }

    #[test]
    fn test_debounced_input_collapses_burst() {
        let config = ViewConfig::default().with_debounce(Duration::from_millis(300));
        let table = TableView::with_rows(config, ColumnSet::new(), assets(10));
        table.snapshot();
        let before = table.filter_passes();

        let t0 = Instant::now();
        table.input_query("A", t0);
        table.input_query("As", t0 + Duration::from_millis(100));
        table.input_query("Asset 1", t0 + Duration::from_millis(200));

        assert!(!table.poll_search(t0 + Duration::from_millis(300)));
        assert_eq!(table.query(), "");
        assert!(table.poll_search(t0 + Duration::from_millis(500)));
        assert!(!table.poll_search(t0 + Duration::from_millis(900)));

        assert_eq!(table.filter_passes(), before + 1);
        assert_eq!(table.query(), "Asset 1");
        // only "Asset 10"
        assert_eq!(table.page_state().total_items, 1);
    }

    #[test]
    fn test_search_now_cancels_pending() {
        let table = TableView::with_rows(ViewConfig::default(), ColumnSet::new(), assets(10));
        let t0 = Instant::now();
        table.input_query("Asset 02", t0);
        assert!(table.has_pending_search());
        assert!(table.search_now("Asset 03"));
        assert!(!table.has_pending_search());
        assert!(!table.poll_search(t0 + Duration::from_secs(10)));
        assert_eq!(table.query(), "Asset 03");
    }

    #[test]
    fn test_unchanged_query_is_noop() {
        let table = TableView::with_rows(ViewConfig::default(), ColumnSet::new(), assets(10));
        assert!(table.search_now("Asset"));
        let passes = table.filter_passes();
        assert!(!table.search_now("Asset"));
        table.snapshot();
        assert_eq!(table.filter_passes(), passes);
    }

    #[test]
    fn test_zero_page_size_config_clamped() {
        let config = ViewConfig::default().with_page_size(0);
        let table = TableView::with_rows(config, ColumnSet::new(), assets(3));
        assert_eq!(table.page_state().page_size, 1);
        assert_eq!(table.page_state().total_items, 3);
    }

    #[test]
    fn test_dirty_tracking_and_render() {
        let table = TableView::with_rows(ViewConfig::default(), ColumnSet::new(), assets(3));
        let mut rendered = 0;
        table.render(&mut |snapshot: &ViewSnapshot| {
            rendered += snapshot.rows.len();
        });
        assert_eq!(rendered, 3);
        assert!(!table.is_dirty());
        table.toggle_sort("name", false);
        assert!(table.is_dirty());
    }

    #[test]
    fn test_set_columns_changes_search() {
        let table = TableView::with_rows(ViewConfig::default(), ColumnSet::new(), assets(4));
        table.search_now("300");
        assert_eq!(table.page_state().total_items, 1);
        table.set_columns(ColumnSet::from(vec![
            ColumnDescriptor::new("name"),
            ColumnDescriptor::new("price").searchable(false),
        ]));
        assert_eq!(table.page_state().total_items, 0);
    }
}
