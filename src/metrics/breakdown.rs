//! Category breakdowns
//!
//! Store, product and payment-type tallies over a filtered line, plus the
//! chart-ready shapes built from them:
//! - Single line: slices (products collapsed to top N + "other")
//! - Comparison: grouped bars for stores, 100% stacked shares for products
//!   and payment types
//! - Per-store product detail with podium ranks

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::colors::ColorRegistry;
use crate::models::record::TransactionRecord;

/// Number of top-ranked products flagged in per-store detail
pub const PODIUM_SIZE: usize = 3;

/// What a breakdown's value column measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Summed currency amount
    Amount,
    /// Number of transactions
    Count,
}

/// Tally for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub amount: f64,
    pub order_count: u32,
}

impl CategoryTotal {
    fn new(name: String) -> Self {
        Self {
            name,
            amount: 0.0,
            order_count: 0,
        }
    }

    /// Value under the given measure
    pub fn value(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Amount => self.amount,
            Measure::Count => f64::from(self.order_count),
        }
    }
}

/// Group countable records by a key, sorted descending by `measure`
///
/// Ties are broken by name so repeated passes give identical output.
/// Records without a key are skipped.
fn tally<F>(records: &[&TransactionRecord], measure: Measure, key: F) -> Vec<CategoryTotal>
where
    F: Fn(&TransactionRecord) -> Option<&str>,
{
    let mut map: HashMap<&str, CategoryTotal> = HashMap::new();

    for record in records.iter().filter(|r| r.is_countable()) {
        let Some(name) = key(*record) else {
            continue;
        };
        let entry = map
            .entry(name)
            .or_insert_with(|| CategoryTotal::new(name.to_string()));
        entry.amount += record.amount;
        entry.order_count += 1;
    }

    let mut totals: Vec<CategoryTotal> = map.into_values().collect();
    sort_desc(&mut totals, measure);
    totals
}

fn sort_desc(totals: &mut [CategoryTotal], measure: Measure) {
    totals.sort_by(|a, b| {
        b.value(measure)
            .total_cmp(&a.value(measure))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Store -> summed amount
pub fn by_store(records: &[&TransactionRecord]) -> Vec<CategoryTotal> {
    tally(records, Measure::Amount, |r| r.shop_name.as_deref())
}

/// Product -> summed amount, with per-product order counts
pub fn by_product(records: &[&TransactionRecord]) -> Vec<CategoryTotal> {
    tally(records, Measure::Amount, |r| r.product.as_deref())
}

/// Payment type -> transaction count
pub fn by_payment(records: &[&TransactionRecord]) -> Vec<CategoryTotal> {
    tally(records, Measure::Count, |r| r.pay_type.as_deref())
}

/// Keep the first `top_n` entries and merge the rest into one `other_label` entry
///
/// Expects entries already sorted descending.
pub fn collapse_top_n(
    mut totals: Vec<CategoryTotal>,
    top_n: usize,
    other_label: &str,
) -> Vec<CategoryTotal> {
    if totals.len() <= top_n {
        return totals;
    }

    let rest = totals.split_off(top_n);
    let other = rest.into_iter().fold(
        CategoryTotal::new(other_label.to_string()),
        |mut acc, t| {
            acc.amount += t.amount;
            acc.order_count += t.order_count;
            acc
        },
    );
    totals.push(other);
    totals
}

fn share(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}

fn measure_total(totals: &[CategoryTotal], measure: Measure) -> f64 {
    totals.iter().map(|t| t.value(measure)).sum()
}

/// One slice of a single-line pie/doughnut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub name: String,
    pub value: f64,
    pub order_count: u32,
    /// Share of the line total, 0-100
    pub share_pct: f64,
    pub color: String,
}

/// One category of a two-line grouped bar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedBar {
    pub name: String,
    pub primary: f64,
    pub baseline: f64,
    pub color: String,
}

/// One category of a two-line 100% stacked chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedSegment {
    pub name: String,
    pub primary_value: f64,
    pub baseline_value: f64,
    pub primary_pct: f64,
    pub baseline_pct: f64,
    pub primary_orders: u32,
    pub baseline_orders: u32,
    pub color: String,
}

/// Chart-ready breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreakdownChart {
    Slices {
        measure: Measure,
        slices: Vec<Slice>,
    },
    GroupedBars {
        measure: Measure,
        bars: Vec<GroupedBar>,
    },
    PercentStacked {
        measure: Measure,
        segments: Vec<StackedSegment>,
    },
}

impl BreakdownChart {
    /// Category names in display order
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Slices { slices, .. } => slices.iter().map(|s| s.name.as_str()).collect(),
            Self::GroupedBars { bars, .. } => bars.iter().map(|b| b.name.as_str()).collect(),
            Self::PercentStacked { segments, .. } => {
                segments.iter().map(|s| s.name.as_str()).collect()
            }
        }
    }
}

fn slices(totals: Vec<CategoryTotal>, measure: Measure, colors: &mut ColorRegistry) -> BreakdownChart {
    let total = measure_total(&totals, measure);
    let slices = totals
        .into_iter()
        .map(|t| Slice {
            value: t.value(measure),
            share_pct: share(t.value(measure), total),
            color: colors.color_for(&t.name),
            order_count: t.order_count,
            name: t.name,
        })
        .collect();

    BreakdownChart::Slices { measure, slices }
}

/// Primary categories in primary order, then baseline-only ones in baseline order
fn union_order<'a>(primary: &'a [CategoryTotal], baseline: &'a [CategoryTotal]) -> Vec<&'a str> {
    let mut names: Vec<&str> = primary.iter().map(|t| t.name.as_str()).collect();
    for t in baseline {
        if !names.contains(&t.name.as_str()) {
            names.push(t.name.as_str());
        }
    }
    names
}

fn find<'a>(totals: &'a [CategoryTotal], name: &str) -> Option<&'a CategoryTotal> {
    totals.iter().find(|t| t.name == name)
}

fn percent_stacked(
    primary: &[CategoryTotal],
    baseline: &[CategoryTotal],
    measure: Measure,
    colors: &mut ColorRegistry,
) -> BreakdownChart {
    let primary_total = measure_total(primary, measure);
    let baseline_total = measure_total(baseline, measure);

    let segments = union_order(primary, baseline)
        .into_iter()
        .map(|name| {
            let p = find(primary, name);
            let b = find(baseline, name);
            let primary_value = p.map_or(0.0, |t| t.value(measure));
            let baseline_value = b.map_or(0.0, |t| t.value(measure));

            StackedSegment {
                name: name.to_string(),
                primary_value,
                baseline_value,
                primary_pct: share(primary_value, primary_total),
                baseline_pct: share(baseline_value, baseline_total),
                primary_orders: p.map_or(0, |t| t.order_count),
                baseline_orders: b.map_or(0, |t| t.order_count),
                color: colors.color_for(name),
            }
        })
        .collect();

    BreakdownChart::PercentStacked { measure, segments }
}

/// Store breakdown: slices for one line, grouped bars against a baseline
pub fn store_chart(
    primary: &[&TransactionRecord],
    baseline: Option<&[&TransactionRecord]>,
    colors: &mut ColorRegistry,
) -> BreakdownChart {
    let primary_totals = by_store(primary);

    let Some(baseline) = baseline else {
        return slices(primary_totals, Measure::Amount, colors);
    };

    let baseline_totals = by_store(baseline);
    let bars = union_order(&primary_totals, &baseline_totals)
        .into_iter()
        .map(|name| GroupedBar {
            name: name.to_string(),
            primary: find(&primary_totals, name).map_or(0.0, |t| t.amount),
            baseline: find(&baseline_totals, name).map_or(0.0, |t| t.amount),
            color: colors.color_for(name),
        })
        .collect();

    BreakdownChart::GroupedBars {
        measure: Measure::Amount,
        bars,
    }
}

/// Product breakdown: top N + other for one line, unmerged 100% stacked against a baseline
pub fn product_chart(
    primary: &[&TransactionRecord],
    baseline: Option<&[&TransactionRecord]>,
    top_n: usize,
    other_label: &str,
    colors: &mut ColorRegistry,
) -> BreakdownChart {
    let primary_totals = by_product(primary);

    match baseline {
        None => slices(
            collapse_top_n(primary_totals, top_n, other_label),
            Measure::Amount,
            colors,
        ),
        Some(baseline) => {
            percent_stacked(&primary_totals, &by_product(baseline), Measure::Amount, colors)
        }
    }
}

/// Payment breakdown by transaction count
pub fn payment_chart(
    primary: &[&TransactionRecord],
    baseline: Option<&[&TransactionRecord]>,
    colors: &mut ColorRegistry,
) -> BreakdownChart {
    let primary_totals = by_payment(primary);

    match baseline {
        None => slices(primary_totals, Measure::Count, colors),
        Some(baseline) => {
            percent_stacked(&primary_totals, &by_payment(baseline), Measure::Count, colors)
        }
    }
}

/// One product line of a store's detail card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProduct {
    /// 1-based rank by amount
    pub rank: usize,
    pub name: String,
    pub amount: f64,
    pub order_count: u32,
    /// Within the top three
    pub podium: bool,
    pub color: String,
}

/// Product ranking for one store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDetail {
    pub store: String,
    pub total_amount: f64,
    pub order_count: u32,
    pub products: Vec<RankedProduct>,
}

/// Per-store product rankings, stores ordered by total amount
pub fn store_details(records: &[&TransactionRecord], colors: &mut ColorRegistry) -> Vec<StoreDetail> {
    let mut by_shop: HashMap<&str, Vec<&TransactionRecord>> = HashMap::new();
    for record in records.iter().filter(|r| r.is_countable()) {
        if let Some(shop) = record.shop_name.as_deref() {
            by_shop.entry(shop).or_default().push(*record);
        }
    }

    by_store(records)
        .into_iter()
        .map(|store| {
            let shop_records = by_shop.remove(store.name.as_str()).unwrap_or_default();
            let products = by_product(&shop_records)
                .into_iter()
                .enumerate()
                .map(|(i, p)| RankedProduct {
                    rank: i + 1,
                    podium: i < PODIUM_SIZE,
                    color: colors.color_for(&p.name),
                    amount: p.amount,
                    order_count: p.order_count,
                    name: p.name,
                })
                .collect();

            StoreDetail {
                total_amount: store.amount,
                order_count: store.order_count,
                store: store.name,
                products,
            }
        })
        .collect()
}
