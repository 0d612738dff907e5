//! Per-table view state and the rendering seam.
//!
//! A [`TableView`] owns the rows, sort keys, query and page of one table and
//! produces [`ViewSnapshot`]s for a [`ViewAdapter`] to draw.

mod adapter;
mod scheduler;
mod state;

pub use adapter::{ViewAdapter, ViewSnapshot};
pub use scheduler::SearchScheduler;
pub use state::{TableId, TableView};
