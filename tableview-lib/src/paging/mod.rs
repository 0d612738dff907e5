//! Pagination over the ordered, filtered rows.

mod controller;

pub use controller::{PageLink, PageState, PaginationController};
