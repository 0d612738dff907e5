//! Sorting: type inference, row comparison and the sort-key controller.

mod compare;
mod controller;
mod infer;
mod key;

pub use compare::{RowComparator, collate};
pub use controller::SortController;
pub use infer::{CellType, infer, infer_str, parse_bool, parse_number, parse_timestamp};
pub use key::{SortDirection, SortKey};
