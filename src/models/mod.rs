//! Data models module
//!
//! Contains the data structures the engine aggregates over:
//! - Raw and normalized transaction records
//! - Filter lines (store set, product set, date range)

pub mod line;
pub mod record;
