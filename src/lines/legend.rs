//! Legend descriptors
//!
//! One entry per line: its date range and a short description of the store
//! and product selections. A single selection is shown by name, several by
//! count, and "all" is omitted.

use std::collections::BTreeSet;

use serde::Serialize;

use super::LineId;
use crate::models::line::FilterLine;
use crate::trends::daily::full_date_label;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub line: LineId,
    pub name: String,
    /// "2025/9/1 ~ 2025/9/7"
    pub date_range: String,
    pub stores: Option<String>,
    pub products: Option<String>,
    /// Everything joined for a one-line legend
    pub text: String,
}

/// Describe a selection set
fn selection_text(set: &BTreeSet<String>, unit: &str) -> Option<String> {
    match set.len() {
        0 => None,
        1 => set.iter().next().cloned(),
        n => Some(format!("{} {}", n, unit)),
    }
}

impl LegendEntry {
    pub fn describe(id: LineId, line: &FilterLine) -> Self {
        let name = id.display_name();
        let date_range = format!(
            "{} ~ {}",
            full_date_label(line.start.date()),
            full_date_label(line.end.date())
        );
        let stores = selection_text(&line.stores, "stores");
        let products = selection_text(&line.products, "products");

        let text = [Some(&name), Some(&date_range), stores.as_ref(), products.as_ref()]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(" | ");

        Self {
            line: id,
            name,
            date_range,
            stores,
            products,
            text,
        }
    }
}
