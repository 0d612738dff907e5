//! In-memory table view engine
//!
//! Sorting, searching and pagination over a collection of rows, computed
//! without server round-trips. Rendering is left to a [`view::ViewAdapter`].

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod paging;
pub mod sort;
pub mod view;

pub use config::ViewConfig;

pub mod prelude {
    pub use crate::config::ViewConfig;
    pub use crate::error::{ConfigError, RowError};
    pub use crate::filter::{
        FilterEngine, FilterOutcome, FilterState, MatchSpan, SearchScope, Segment,
        highlight_segments,
    };
    pub use crate::model::{CellValue, ColumnDescriptor, ColumnSet, Row, RowId};
    pub use crate::paging::{PageLink, PageState, PaginationController};
    pub use crate::sort::{CellType, RowComparator, SortController, SortDirection, SortKey};
    pub use crate::view::{SearchScheduler, TableId, TableView, ViewAdapter, ViewSnapshot};
}
