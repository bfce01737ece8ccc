//! View availability rules
//!
//! A pure function of the line configuration, never of the data. Breakdown
//! views assume each line covers "all categories", so they are disabled when:
//! - The primary line selects more than one store or product
//! - A comparison line exists and any line pins exactly one store or product

use serde::{Deserialize, Serialize};
use tracing::info;

use super::types::{Availability, ChartView, ViewTransition};
use crate::lines::LineManager;
use crate::EngineError;

/// Decide whether breakdown views are available
pub fn check_availability(lines: &LineManager) -> Availability {
    let primary = lines.primary();
    if primary.stores.len() > 1 {
        return Availability::unavailable("Primary line has multiple stores selected");
    }
    if primary.products.len() > 1 {
        return Availability::unavailable("Primary line has multiple products selected");
    }

    if lines.has_comparisons() {
        for (id, line) in lines.lines() {
            if line.stores.len() == 1 {
                return Availability::unavailable(format!(
                    "{} is limited to a single store while comparing",
                    id.display_name()
                ));
            }
            if line.products.len() == 1 {
                return Availability::unavailable(format!(
                    "{} is limited to a single product while comparing",
                    id.display_name()
                ));
            }
        }
    }

    Availability::available()
}

/// Active view plus the availability it was last checked against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    active: ChartView,
    availability: Availability,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active: ChartView::TimeSeries,
            availability: Availability::available(),
        }
    }
}

impl ViewState {
    pub fn active(&self) -> ChartView {
        self.active
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    /// Store a fresh availability decision, falling back to the time series
    /// when the active view is no longer allowed
    pub fn reconcile(&mut self, availability: Availability) -> Option<ViewTransition> {
        self.availability = availability;

        if self.availability.allows(self.active) {
            return None;
        }

        let transition = ViewTransition {
            from: self.active,
            to: ChartView::TimeSeries,
            reason: self.availability.reason.clone().unwrap_or_default(),
        };
        info!(
            "View {} unavailable, falling back to {}: {}",
            transition.from.as_str(),
            transition.to.as_str(),
            transition.reason
        );
        self.active = ChartView::TimeSeries;
        Some(transition)
    }

    /// Switch to a view, rejected without change when it is unavailable
    pub fn request(&mut self, view: ChartView) -> Result<(), EngineError> {
        if !self.availability.allows(view) {
            return Err(EngineError::ViewUnavailable {
                view: view.as_str().to_string(),
                reason: self.availability.reason.clone().unwrap_or_default(),
            });
        }
        self.active = view;
        Ok(())
    }

    /// Back to the time series with fresh availability
    pub fn reset(&mut self, availability: Availability) {
        self.active = ChartView::TimeSeries;
        self.availability = availability;
    }
}
