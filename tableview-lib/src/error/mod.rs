//! Error types

mod config;
mod row;

pub use config::*;
pub use row::*;
