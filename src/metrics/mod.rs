//! Metrics calculation module
//!
//! - Line filtering and bucket aggregation (the shared predicate)
//! - Category breakdowns by store, product and payment type
//! - Headline KPIs and deltas against a baseline line

pub mod aggregate;
pub mod breakdown;
pub mod kpi;

pub use aggregate::{aggregate, filter_line, line_series};
pub use kpi::{compute_kpi, Kpi};
