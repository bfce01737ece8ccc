//! Line management
//!
//! One primary line that always exists, plus up to four comparison lines
//! created on demand. Each line is computed independently at the shared
//! granularity, then aligned for plotting.

pub mod legend;
pub mod series;

pub use legend::LegendEntry;
pub use series::{align, AlignedSeries, LineSeries};

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::metrics::line_series;
use crate::models::line::FilterLine;
use crate::models::record::TransactionRecord;
use crate::trends::Granularity;
use crate::EngineError;

/// Maximum number of comparison lines besides the primary
pub const MAX_COMPARISON_LINES: usize = 4;

/// Identifies a line within the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineId {
    Primary,
    /// Zero-based position in the comparison list
    Comparison(usize),
}

impl LineId {
    /// Human-facing name ("Primary", "Comparison 1", ...)
    pub fn display_name(&self) -> String {
        match self {
            LineId::Primary => "Primary".to_string(),
            LineId::Comparison(i) => format!("Comparison {}", i + 1),
        }
    }
}

impl Serialize for LineId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            LineId::Primary => serializer.serialize_str("primary"),
            LineId::Comparison(i) => serializer.serialize_str(&format!("comparison_{}", i)),
        }
    }
}

fn format_instant(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

fn check_range(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), EngineError> {
    if start > end {
        return Err(EngineError::InvalidDateRange {
            start: format_instant(start),
            end: format_instant(end),
        });
    }
    Ok(())
}

/// Primary line plus ordered comparison lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineManager {
    primary: FilterLine,
    comparisons: Vec<FilterLine>,
}

impl LineManager {
    pub fn new(primary: FilterLine) -> Self {
        Self {
            primary,
            comparisons: Vec::new(),
        }
    }

    pub fn primary(&self) -> &FilterLine {
        &self.primary
    }

    pub fn comparisons(&self) -> &[FilterLine] {
        &self.comparisons
    }

    pub fn has_comparisons(&self) -> bool {
        !self.comparisons.is_empty()
    }

    /// The line KPI deltas and breakdown comparisons are measured against
    pub fn baseline(&self) -> Option<&FilterLine> {
        self.comparisons.first()
    }

    pub fn line(&self, id: LineId) -> Result<&FilterLine, EngineError> {
        match id {
            LineId::Primary => Ok(&self.primary),
            LineId::Comparison(i) => self.comparisons.get(i).ok_or(EngineError::LineNotFound(i)),
        }
    }

    fn line_mut(&mut self, id: LineId) -> Result<&mut FilterLine, EngineError> {
        match id {
            LineId::Primary => Ok(&mut self.primary),
            LineId::Comparison(i) => self
                .comparisons
                .get_mut(i)
                .ok_or(EngineError::LineNotFound(i)),
        }
    }

    /// Every line, primary first
    pub fn lines(&self) -> impl Iterator<Item = (LineId, &FilterLine)> + '_ {
        std::iter::once((LineId::Primary, &self.primary)).chain(
            self.comparisons
                .iter()
                .enumerate()
                .map(|(i, line)| (LineId::Comparison(i), line)),
        )
    }

    /// Append a comparison line
    ///
    /// Fails without mutating when the list is full or the range is inverted.
    pub fn add_comparison(&mut self, line: FilterLine) -> Result<LineId, EngineError> {
        if self.comparisons.len() >= MAX_COMPARISON_LINES {
            return Err(EngineError::CapacityExceeded {
                max: MAX_COMPARISON_LINES,
            });
        }
        check_range(line.start, line.end)?;

        self.comparisons.push(line);
        let id = LineId::Comparison(self.comparisons.len() - 1);
        debug!("Added {}", id.display_name());
        Ok(id)
    }

    /// Remove a comparison line; later lines shift down one position
    pub fn remove_comparison(&mut self, index: usize) -> Result<FilterLine, EngineError> {
        if index >= self.comparisons.len() {
            return Err(EngineError::LineNotFound(index));
        }
        debug!("Removed {}", LineId::Comparison(index).display_name());
        Ok(self.comparisons.remove(index))
    }

    pub fn clear_comparisons(&mut self) {
        self.comparisons.clear();
    }

    pub fn set_date_range(
        &mut self,
        id: LineId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<(), EngineError> {
        check_range(start, end)?;
        let line = self.line_mut(id)?;
        line.start = start;
        line.end = end;
        Ok(())
    }

    pub fn set_stores(&mut self, id: LineId, stores: BTreeSet<String>) -> Result<(), EngineError> {
        self.line_mut(id)?.stores = stores;
        Ok(())
    }

    pub fn set_products(&mut self, id: LineId, products: BTreeSet<String>) -> Result<(), EngineError> {
        self.line_mut(id)?.products = products;
        Ok(())
    }

    /// Aggregate every line at `granularity` and align the results
    pub fn compute_series(&self, records: &[TransactionRecord], granularity: Granularity) -> AlignedSeries {
        let series = self
            .lines()
            .map(|(id, line)| (id, line_series(records, line, granularity)))
            .collect();
        align(granularity, series)
    }

    pub fn legends(&self) -> Vec<LegendEntry> {
        self.lines()
            .map(|(id, line)| LegendEntry::describe(id, line))
            .collect()
    }
}
