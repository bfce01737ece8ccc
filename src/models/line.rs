//! Filter line definition
//!
//! A line is an independent filter over the record set: a store set, a
//! product set and an inclusive date range. An empty set means "all".

use std::collections::BTreeSet;

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::record::TransactionRecord;

/// First instant of a calendar day
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Last instant (23:59:59.999) of a calendar day
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + ChronoDuration::days(1) - ChronoDuration::milliseconds(1)
}

/// Filter configuration for one plotted line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterLine {
    /// Selected stores; empty means all stores
    pub stores: BTreeSet<String>,
    /// Selected products; empty means all products
    pub products: BTreeSet<String>,
    /// Inclusive range start
    pub start: NaiveDateTime,
    /// Inclusive range end
    pub end: NaiveDateTime,
}

impl FilterLine {
    /// Create an all-stores, all-products line over an exact range
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            stores: BTreeSet::new(),
            products: BTreeSet::new(),
            start,
            end,
        }
    }

    /// Create a line from a date-only picker selection
    ///
    /// The end is pushed to the last instant of `last` so the whole final
    /// day is included.
    pub fn for_days(first: NaiveDate, last: NaiveDate) -> Self {
        Self::new(start_of_day(first), end_of_day(last))
    }

    /// Builder: restrict to the given stores
    pub fn with_stores<I, S>(mut self, stores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stores = stores.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: restrict to the given products
    pub fn with_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the range is well formed
    pub fn is_valid_range(&self) -> bool {
        self.start <= self.end
    }

    /// Whether a timestamp falls inside the inclusive range
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.start && ts <= self.end
    }

    /// The line predicate
    ///
    /// Every aggregate in the engine goes through this one check: dated,
    /// positive amount, inside the range, and a member of both sets.
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        let Some(ts) = record.timestamp else {
            return false;
        };
        if record.amount.is_nan() || record.amount <= 0.0 || !self.contains(ts) {
            return false;
        }

        let store_ok = self.stores.is_empty()
            || record
                .shop_name
                .as_ref()
                .is_some_and(|s| self.stores.contains(s));
        let product_ok = self.products.is_empty()
            || record
                .product
                .as_ref()
                .is_some_and(|p| self.products.contains(p));

        store_ok && product_ok
    }

    /// Number of calendar days the range touches
    pub fn span_days(&self) -> i64 {
        (self.end.date() - self.start.date()).num_days() + 1
    }

    /// A line of the same length that ends the day before this one starts
    ///
    /// Keeps the store and product selections so the two periods compare
    /// like for like.
    pub fn previous_period(&self) -> FilterLine {
        let span = self.span_days().max(1);
        let last = self.start.date() - ChronoDuration::days(1);
        let first = last - ChronoDuration::days(span - 1);

        FilterLine {
            stores: self.stores.clone(),
            products: self.products.clone(),
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(shop: &str, product: &str, amount: f64, ts: &str) -> TransactionRecord {
        TransactionRecord {
            shop_name: Some(shop.to_string()),
            product: Some(product.to_string()),
            pay_type: None,
            amount,
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").ok(),
        }
    }

    #[test]
    fn test_for_days_normalizes_end() {
        let line = FilterLine::for_days(date(2025, 9, 1), date(2025, 9, 3));
        assert_eq!(line.start.time(), NaiveTime::default());
        assert_eq!(line.end.date(), date(2025, 9, 3));
        assert_eq!(
            (line.end.hour(), line.end.minute(), line.end.second()),
            (23, 59, 59)
        );
        assert_eq!(line.end.nanosecond(), 999_000_000);
        assert_eq!(line.span_days(), 3);
    }

    #[test]
    fn test_matches_all_sets_empty() {
        let line = FilterLine::for_days(date(2025, 9, 1), date(2025, 9, 1));
        assert!(line.matches(&record("A", "Plush", 10.0, "2025-09-01 23:59:59")));
        assert!(!line.matches(&record("A", "Plush", 10.0, "2025-09-02 00:00:00")));
    }

    #[test]
    fn test_matches_excludes_non_positive_and_undated() {
        let line = FilterLine::for_days(date(2025, 9, 1), date(2025, 9, 1));
        assert!(!line.matches(&record("A", "Plush", 0.0, "2025-09-01 10:00:00")));
        assert!(!line.matches(&record("A", "Plush", -3.0, "2025-09-01 10:00:00")));
        assert!(!line.matches(&record("A", "Plush", f64::NAN, "2025-09-01 10:00:00")));
        assert!(!line.matches(&record("A", "Plush", 10.0, "bad")));
    }

    #[test]
    fn test_matches_store_and_product_sets() {
        let line = FilterLine::for_days(date(2025, 9, 1), date(2025, 9, 1))
            .with_stores(["A", "B"])
            .with_products(["Plush"]);

        assert!(line.matches(&record("B", "Plush", 5.0, "2025-09-01 09:00:00")));
        assert!(!line.matches(&record("C", "Plush", 5.0, "2025-09-01 09:00:00")));
        assert!(!line.matches(&record("A", "Keychain", 5.0, "2025-09-01 09:00:00")));

        let mut unnamed = record("A", "Plush", 5.0, "2025-09-01 09:00:00");
        unnamed.shop_name = None;
        assert!(!line.matches(&unnamed));
    }

    #[test]
    fn test_previous_period() {
        let line = FilterLine::for_days(date(2025, 9, 8), date(2025, 9, 14)).with_stores(["A"]);
        let prev = line.previous_period();

        assert_eq!(prev.start.date(), date(2025, 9, 1));
        assert_eq!(prev.end.date(), date(2025, 9, 7));
        assert_eq!(prev.span_days(), 7);
        assert!(prev.stores.contains("A"));
    }

    #[test]
    fn test_invalid_range() {
        let line = FilterLine::for_days(date(2025, 9, 3), date(2025, 9, 1));
        assert!(!line.is_valid_range());
    }
}
