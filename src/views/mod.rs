//! Chart view state
//!
//! Tracks the active chart and decides when the category breakdowns may be
//! shown. Availability is recomputed on every configuration change and the
//! active view falls back to the time series when it is no longer allowed.

pub mod types;
pub mod validator;

pub use types::{Availability, ChartView, ViewTransition};
pub use validator::{check_availability, ViewState};
