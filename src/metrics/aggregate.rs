//! Record filtering and bucket aggregation
//!
//! `filter_line` is the only place the line predicate is applied. Bucket
//! series, KPIs and breakdowns all start from its output, so headline totals,
//! bucket sums and category sums always agree.

use chrono::NaiveDateTime;

use crate::models::line::FilterLine;
use crate::models::record::TransactionRecord;
use crate::trends::{generate_buckets, Bucket, Granularity};

/// Records matching a line, in their original order
pub fn filter_line<'a>(
    records: &'a [TransactionRecord],
    line: &FilterLine,
) -> Vec<&'a TransactionRecord> {
    records.iter().filter(|r| line.matches(r)).collect()
}

/// Fill bucket values and order counts from records already filtered for a line
///
/// Matching records are sorted by timestamp once, then each bucket window is
/// located by binary search.
pub fn aggregate_matching(matching: &[&TransactionRecord], mut buckets: Vec<Bucket>) -> Vec<Bucket> {
    let mut points: Vec<(NaiveDateTime, f64)> = matching
        .iter()
        .filter(|r| r.is_countable())
        .filter_map(|r| r.timestamp.map(|ts| (ts, r.amount)))
        .collect();
    points.sort_by(|a, b| a.0.cmp(&b.0));

    for bucket in buckets.iter_mut() {
        let lo = points.partition_point(|(ts, _)| *ts < bucket.start);
        let hi = points.partition_point(|(ts, _)| *ts <= bucket.end).max(lo);
        let window = &points[lo..hi];

        bucket.value = window.iter().map(|(_, amount)| amount).sum();
        bucket.order_count = window.len() as u32;
    }

    buckets
}

/// Fill buckets for a line straight from the full record set
pub fn aggregate(records: &[TransactionRecord], line: &FilterLine, buckets: Vec<Bucket>) -> Vec<Bucket> {
    let matching = filter_line(records, line);
    aggregate_matching(&matching, buckets)
}

/// Bucketed series for a line at a granularity
pub fn line_series(
    records: &[TransactionRecord],
    line: &FilterLine,
    granularity: Granularity,
) -> Vec<Bucket> {
    let buckets = generate_buckets(line.start, line.end, granularity);
    aggregate(records, line, buckets)
}
