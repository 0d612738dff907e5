//! Searching: query state, safe pattern matching, highlighting and
//! keystroke debouncing.

mod debounce;
mod engine;
mod highlight;
mod pattern;

pub use debounce::Debouncer;
pub use engine::{FilterEngine, FilterOutcome, FilterState, MatchSpan, SearchScope, filter_rows};
pub use highlight::{Segment, highlight_segments};
pub use pattern::SearchPattern;
