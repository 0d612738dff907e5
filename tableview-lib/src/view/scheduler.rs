//! Timer-driven debounced search.

use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::state::TableView;

/// Runs a table's as-you-type searches on the tokio timer.
///
/// Each keystroke cancels the previous timer and starts a new one for the
/// configured delay, so a burst of keystrokes triggers a single filter pass
/// with the final text. Dropping the scheduler cancels any pending pass.
///
/// Created inside a tokio runtime, the scheduler spawns its timers there.
/// Outside one it only records the keystroke, and the caller drives the
/// pass with [`TableView::poll_search`].
#[derive(Debug)]
pub struct SearchScheduler {
    view: TableView,
    handle: Option<Handle>,
    pending: Mutex<Option<CancellationToken>>,
    searched: Arc<Notify>,
}

impl SearchScheduler {
    /// Create a scheduler for a table view.
    pub fn new(view: TableView) -> Self {
        let handle = Handle::try_current().ok();
        if handle.is_none() {
            log::debug!("search scheduler for {} created outside a runtime", view.id());
        }
        Self {
            view,
            handle,
            pending: Mutex::new(None),
            searched: Arc::new(Notify::new()),
        }
    }

    /// The scheduled table view.
    pub fn view(&self) -> &TableView {
        &self.view
    }

    /// Record a keystroke: the new full query text.
    pub fn keystroke(&self, query: impl Into<String>) {
        let token = CancellationToken::new();
        self.replace_pending(Some(token.clone()));

        let deadline = self.view.input_query(query, Instant::now().into_std());
        let Some(handle) = &self.handle else {
            return;
        };

        let view = self.view.clone();
        let searched = Arc::clone(&self.searched);
        handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    log::trace!("search timer for {} cancelled", view.id());
                }
                _ = tokio::time::sleep_until(Instant::from_std(deadline)) => {
                    if view.poll_search(Instant::now().into_std()) {
                        searched.notify_one();
                    }
                }
            }
        });
    }

    /// Search immediately, cancelling any pending pass.
    pub fn search_now(&self, query: impl Into<String>) -> bool {
        self.replace_pending(None);
        let changed = self.view.search_now(query);
        self.searched.notify_one();
        changed
    }

    /// Cancel the pending pass without running it.
    pub fn cancel(&self) {
        self.replace_pending(None);
        self.view.cancel_search();
    }

    /// Wait until the next search pass has run.
    pub async fn searched(&self) {
        self.searched.notified().await;
    }

    fn replace_pending(&self, token: Option<CancellationToken>) {
        let Ok(mut pending) = self.pending.lock() else {
            return;
        };
        if let Some(previous) = std::mem::replace(&mut *pending, token) {
            previous.cancel();
        }
    }
}

impl Drop for SearchScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
