//! Multi-line series alignment
//!
//! Lines may cover ranges of different lengths, so their bucket counts differ.
//! Every series is right-padded with zero slots to the longest one so all
//! lines plot against a shared index axis.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::LineId;
use crate::trends::{Bucket, Granularity};

/// Tooltip metadata for one real bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotMeta {
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// "2025/9/3 ~ 2025/9/4"
    pub range_text: String,
    pub weekend: bool,
}

impl From<&Bucket> for SlotMeta {
    fn from(bucket: &Bucket) -> Self {
        Self {
            label: bucket.label.clone(),
            start: bucket.start,
            end: bucket.end,
            range_text: bucket.range_text(),
            weekend: bucket.is_weekend(),
        }
    }
}

/// One line's series, padded to the aligned length
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub line: LineId,
    pub name: String,
    /// Number of real buckets before padding
    pub bucket_count: usize,
    pub values: Vec<f64>,
    pub order_counts: Vec<u32>,
    /// `None` for padded slots
    pub meta: Vec<Option<SlotMeta>>,
}

impl LineSeries {
    /// Sum of all slot values
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Every line's series on a shared index axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSeries {
    pub granularity: Granularity,
    /// Longest series length; every line has exactly this many slots
    pub length: usize,
    /// Axis label per slot, taken from the first line with a real bucket there
    pub labels: Vec<Option<String>>,
    pub lines: Vec<LineSeries>,
}

/// Pad each line's buckets to the longest series
pub fn align(granularity: Granularity, series: Vec<(LineId, Vec<Bucket>)>) -> AlignedSeries {
    let length = series.iter().map(|(_, b)| b.len()).max().unwrap_or(0);

    let labels = (0..length)
        .map(|i| {
            series
                .iter()
                .find_map(|(_, buckets)| buckets.get(i).map(|b| b.label.clone()))
        })
        .collect();

    let lines = series
        .into_iter()
        .map(|(line, buckets)| {
            let padding = length - buckets.len();

            let mut values: Vec<f64> = buckets.iter().map(|b| b.value).collect();
            let mut order_counts: Vec<u32> = buckets.iter().map(|b| b.order_count).collect();
            let mut meta: Vec<Option<SlotMeta>> =
                buckets.iter().map(|b| Some(SlotMeta::from(b))).collect();

            values.extend(std::iter::repeat(0.0).take(padding));
            order_counts.extend(std::iter::repeat(0).take(padding));
            meta.extend(std::iter::repeat(None).take(padding));

            LineSeries {
                name: line.display_name(),
                line,
                bucket_count: buckets.len(),
                values,
                order_counts,
                meta,
            }
        })
        .collect();

    AlignedSeries {
        granularity,
        length,
        labels,
        lines,
    }
}
