//! Headline KPI calculation
//!
//! Total sales, transaction count and average transaction value for a line,
//! with deltas against a baseline line when the baseline has sales.

use serde::{Deserialize, Serialize};

use crate::models::record::TransactionRecord;

/// Direction of a change relative to the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn of(diff: f64) -> Self {
        if diff >= 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }

    /// Sign prefix for the absolute difference
    pub fn sign(&self) -> &'static str {
        match self {
            Self::Up => "+",
            Self::Down => "-",
        }
    }

    /// Arrow indicator for display
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
        }
    }
}

/// Change of one measure against the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    /// primary - baseline
    pub absolute: f64,
    /// absolute / baseline * 100
    pub percentage: f64,
    pub direction: Direction,
}

impl Delta {
    /// Compute a delta; `None` when the baseline is zero (or not a number)
    pub fn between(primary: f64, baseline: f64) -> Option<Self> {
        if baseline == 0.0 || !baseline.is_finite() {
            return None;
        }

        let absolute = primary - baseline;
        Some(Self {
            absolute,
            percentage: absolute / baseline * 100.0,
            direction: Direction::of(absolute),
        })
    }

    /// Display text, e.g. "▲ 20.0%"
    pub fn display(&self) -> String {
        format!("{} {:.1}%", self.direction.indicator(), self.percentage)
    }
}

/// Deltas for every headline measure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiDelta {
    pub total_sales: Delta,
    pub total_transactions: Delta,
    pub avg_transaction_value: Delta,
}

/// Headline numbers for one line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub total_sales: f64,
    pub total_transactions: u64,
    pub avg_transaction_value: f64,
    /// Absent (not zero) when there is no baseline or the baseline has no sales
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<KpiDelta>,
}

/// Plain totals, without any comparison
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Totals {
    sales: f64,
    transactions: u64,
}

impl Totals {
    fn from_records(records: &[&TransactionRecord]) -> Self {
        records
            .iter()
            .filter(|r| r.is_countable())
            .fold(Self::default(), |acc, r| Self {
                sales: acc.sales + r.amount,
                transactions: acc.transactions + 1,
            })
    }

    fn average(&self) -> f64 {
        if self.transactions > 0 {
            self.sales / self.transactions as f64
        } else {
            0.0
        }
    }
}

/// Compute KPIs for a filtered line, optionally against a filtered baseline
pub fn compute_kpi(
    primary: &[&TransactionRecord],
    baseline: Option<&[&TransactionRecord]>,
) -> Kpi {
    let current = Totals::from_records(primary);

    let delta = baseline.map(Totals::from_records).and_then(|base| {
        if base.sales == 0.0 || base.transactions == 0 {
            return None;
        }
        Some(KpiDelta {
            total_sales: Delta::between(current.sales, base.sales)?,
            total_transactions: Delta::between(
                current.transactions as f64,
                base.transactions as f64,
            )?,
            avg_transaction_value: Delta::between(current.average(), base.average())?,
        })
    });

    Kpi {
        total_sales: current.sales,
        total_transactions: current.transactions,
        avg_transaction_value: current.average(),
        delta,
    }
}
