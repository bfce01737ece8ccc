//! Chart view types
//!
//! The active chart and the availability decision the UI uses to enable or
//! disable the breakdown affordances.

use serde::{Deserialize, Serialize};

/// Chart shown for the current configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChartView {
    /// Bucketed sales over time, one series per line
    #[default]
    TimeSeries,
    ByStore,
    ByProduct,
    ByPayment,
}

impl ChartView {
    /// Get display name for the view
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::TimeSeries => "Sales Trend",
            Self::ByStore => "Sales by Store",
            Self::ByProduct => "Sales by Product",
            Self::ByPayment => "Orders by Payment Type",
        }
    }

    /// Stable identifier, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TimeSeries => "time_series",
            Self::ByStore => "by_store",
            Self::ByProduct => "by_product",
            Self::ByPayment => "by_payment",
        }
    }

    /// Category breakdowns are gated by the availability rules
    pub fn is_breakdown(&self) -> bool {
        !matches!(self, Self::TimeSeries)
    }

    pub fn all() -> Vec<ChartView> {
        vec![Self::TimeSeries, Self::ByStore, Self::ByProduct, Self::ByPayment]
    }

    /// Parse from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "time_series" | "timeseries" | "trend" | "daily" => Some(Self::TimeSeries),
            "by_store" | "bystore" | "store" => Some(Self::ByStore),
            "by_product" | "byproduct" | "product" => Some(Self::ByProduct),
            "by_payment" | "bypayment" | "payment" => Some(Self::ByPayment),
            _ => None,
        }
    }
}

/// Whether breakdown views may be shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    /// Why the breakdowns are disabled; `None` when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Availability {
    pub fn available() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
        }
    }

    /// Whether a specific view may be shown under this decision
    pub fn allows(&self, view: ChartView) -> bool {
        self.available || !view.is_breakdown()
    }
}

/// An automatic switch of the active view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewTransition {
    pub from: ChartView,
    pub to: ChartView,
    pub reason: String,
}
