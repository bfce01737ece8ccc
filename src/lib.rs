//! Sales Lens - sales analytics aggregation engine
//!
//! This library turns a flat list of vending transactions into:
//! - Time-bucketed series (6-hour, daily, 2-day) for a primary line and up
//!   to four comparison lines
//! - Category breakdowns by store, product and payment type with stable colors
//! - Headline KPIs with deltas against a baseline line
//! - View availability decisions for the breakdown charts

pub mod cli;
pub mod colors;
pub mod config;
pub mod lines;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod session;
pub mod trends;
pub mod views;

pub use colors::ColorRegistry;
pub use config::EngineConfig;
pub use lines::{LineId, LineManager};
pub use models::line::FilterLine;
pub use models::record::{RawTransaction, TransactionRecord};
pub use session::{RenderPass, SalesSession};
pub use trends::{Bucket, Granularity};
pub use views::{Availability, ChartView};

/// Rejected configuration operations
///
/// None of these mutate state: the operation that produced the error left
/// the session exactly as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("At most {max} comparison lines are allowed")]
    CapacityExceeded { max: usize },

    #[error("Comparison line not found: {0}")]
    LineNotFound(usize),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("View {view} is unavailable: {reason}")]
    ViewUnavailable { view: String, reason: String },
}

// Serialized as the display string so UI collaborators can show it directly
impl serde::Serialize for EngineError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
