//! Temporal bucketing module
//!
//! This module splits a line's date range into time buckets:
//! - Six-hour day parts, calendar days, or two-day spans
//! - Ordered, contiguous and non-overlapping
//! - The last bucket clipped to the range end

pub mod daily;
pub mod six_hour;

use chrono::{Datelike, Duration as ChronoDuration, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// One time bucket of a line's series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Axis label ("9/3", "morning", ...)
    pub label: String,
    /// Inclusive bucket start
    pub start: NaiveDateTime,
    /// Inclusive bucket end
    pub end: NaiveDateTime,
    /// Summed amount of matching records
    pub value: f64,
    /// Number of matching records
    pub order_count: u32,
}

impl Bucket {
    /// Create an empty bucket
    pub fn new(label: String, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            label,
            start,
            end,
            value: 0.0,
            order_count: 0,
        }
    }

    /// Whether a timestamp falls inside this bucket
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.start && ts <= self.end
    }

    /// Whether the bucket starts on a Saturday or Sunday
    pub fn is_weekend(&self) -> bool {
        matches!(self.start.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Tooltip text for the covered range, e.g. "2025/9/3 ~ 2025/9/4"
    pub fn range_text(&self) -> String {
        format!(
            "{} ~ {}",
            daily::full_date_label(self.start.date()),
            daily::full_date_label(self.end.date())
        )
    }
}

/// Bucket width policy, global to one rendering pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "6h")]
    SixHour,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "2d")]
    TwoDay,
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Daily
    }
}

impl Granularity {
    /// Stable identifier used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::SixHour => "6h",
            Granularity::Daily => "daily",
            Granularity::TwoDay => "2d",
        }
    }
}

impl From<&str> for Granularity {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "6h" | "six_hour" | "sixhour" => Granularity::SixHour,
            "2d" | "two_day" | "twoday" => Granularity::TwoDay,
            _ => Granularity::Daily,
        }
    }
}

impl From<Option<String>> for Granularity {
    fn from(s: Option<String>) -> Self {
        match s {
            Some(val) => Granularity::from(val.as_str()),
            None => Granularity::default(),
        }
    }
}

/// Where the cursor goes next and what the current bucket is called
pub(crate) struct BucketStep {
    pub next_start: NaiveDateTime,
    pub label: String,
}

/// Generate the empty buckets covering `[start, end]`
///
/// The cursor starts at `start`; each step emits one bucket ending one
/// millisecond before the next boundary (or at `end`, whichever is earlier)
/// and moves to that boundary. An inverted range yields no buckets.
pub fn generate_buckets(
    start: NaiveDateTime,
    end: NaiveDateTime,
    granularity: Granularity,
) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut cursor = start;

    while cursor <= end {
        let step = match granularity {
            Granularity::SixHour => six_hour::step(cursor),
            Granularity::Daily => daily::step(cursor, 1),
            Granularity::TwoDay => daily::step(cursor, 2),
        };

        let nominal_end = step.next_start - ChronoDuration::milliseconds(1);
        buckets.push(Bucket::new(step.label, cursor, nominal_end.min(end)));
        cursor = step.next_start;
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::line::{end_of_day, start_of_day};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    /// Contiguous, non-overlapping, exact cover, clipped end
    fn assert_covers(buckets: &[Bucket], start: NaiveDateTime, end: NaiveDateTime) {
        assert!(!buckets.is_empty());
        assert_eq!(buckets[0].start, start);
        assert_eq!(buckets.last().unwrap().end, end);
        for pair in buckets.windows(2) {
            assert!(pair[0].start <= pair[0].end);
            assert_eq!(
                pair[1].start,
                pair[0].end + ChronoDuration::milliseconds(1),
                "gap or overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
        assert!(buckets.iter().all(|b| b.end <= end));
    }

    #[test]
    fn test_daily_buckets_cover_range() {
        let start = start_of_day(date(2025, 8, 30));
        let end = end_of_day(date(2025, 9, 2));
        let buckets = generate_buckets(start, end, Granularity::Daily);

        assert_eq!(buckets.len(), 4);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["8/30", "8/31", "9/1", "9/2"]);
        assert_covers(&buckets, start, end);
        assert!(buckets.iter().all(|b| b.value == 0.0 && b.order_count == 0));
    }

    #[test]
    fn test_two_day_buckets_clip_last() {
        let start = start_of_day(date(2025, 9, 1));
        let end = end_of_day(date(2025, 9, 5));
        let buckets = generate_buckets(start, end, Granularity::TwoDay);

        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["9/1", "9/3", "9/5"]);
        assert_eq!(buckets[0].end, end_of_day(date(2025, 9, 2)));
        // Nominal end would be 9/6 23:59:59.999
        assert_eq!(buckets[2].end, end);
        assert_covers(&buckets, start, end);
    }

    #[test]
    fn test_six_hour_buckets_for_one_day() {
        let start = start_of_day(date(2025, 9, 3));
        let end = end_of_day(date(2025, 9, 3));
        let buckets = generate_buckets(start, end, Granularity::SixHour);

        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["9/3", "morning", "noon", "evening"]);
        assert_eq!(buckets[1].start, at(2025, 9, 3, 6, 0));
        assert_covers(&buckets, start, end);
    }

    #[test]
    fn test_six_hour_label_repeats_date_each_day() {
        let start = start_of_day(date(2025, 9, 3));
        let end = end_of_day(date(2025, 9, 4));
        let buckets = generate_buckets(start, end, Granularity::SixHour);

        assert_eq!(buckets.len(), 8);
        assert_eq!(buckets[4].label, "9/4");
        assert_eq!(buckets[5].label, "morning");
    }

    #[test]
    fn test_unaligned_start_and_end() {
        let start = at(2025, 9, 3, 14, 30);
        let end = at(2025, 9, 4, 3, 15);

        let six = generate_buckets(start, end, Granularity::SixHour);
        let labels: Vec<&str> = six.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["noon", "evening", "9/4"]);
        assert_eq!(six[0].end, at(2025, 9, 3, 18, 0) - ChronoDuration::milliseconds(1));
        assert_covers(&six, start, end);

        let daily = generate_buckets(start, end, Granularity::Daily);
        assert_eq!(daily.len(), 2);
        assert_covers(&daily, start, end);
    }

    #[test]
    fn test_single_instant_range() {
        let ts = at(2025, 9, 3, 8, 0);
        let buckets = generate_buckets(ts, ts, Granularity::Daily);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].start, ts);
        assert_eq!(buckets[0].end, ts);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let buckets = generate_buckets(at(2025, 9, 3, 0, 0), at(2025, 9, 2, 0, 0), Granularity::Daily);
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_coverage_across_month_and_year_end() {
        for granularity in [Granularity::SixHour, Granularity::Daily, Granularity::TwoDay] {
            let start = start_of_day(date(2024, 12, 27));
            let end = end_of_day(date(2025, 1, 3));
            let buckets = generate_buckets(start, end, granularity);
            assert_covers(&buckets, start, end);
        }
    }

    #[test]
    fn test_series_length_is_deterministic() {
        let start = start_of_day(date(2025, 9, 1));
        let end = end_of_day(date(2025, 9, 30));
        assert_eq!(generate_buckets(start, end, Granularity::Daily).len(), 30);
        assert_eq!(generate_buckets(start, end, Granularity::TwoDay).len(), 15);
        assert_eq!(generate_buckets(start, end, Granularity::SixHour).len(), 120);
    }

    #[test]
    fn test_bucket_weekend_and_range_text() {
        // 2025-09-06 is a Saturday
        let sat = Bucket::new(
            "9/6".to_string(),
            start_of_day(date(2025, 9, 6)),
            end_of_day(date(2025, 9, 6)),
        );
        assert!(sat.is_weekend());
        assert_eq!(sat.range_text(), "2025/9/6 ~ 2025/9/6");

        let mon = Bucket::new(
            "9/8".to_string(),
            start_of_day(date(2025, 9, 8)),
            end_of_day(date(2025, 9, 9)),
        );
        assert!(!mon.is_weekend());
        assert_eq!(mon.range_text(), "2025/9/8 ~ 2025/9/9");
    }

    #[test]
    fn test_granularity_from_str() {
        assert_eq!(Granularity::from("6h"), Granularity::SixHour);
        assert_eq!(Granularity::from("DAILY"), Granularity::Daily);
        assert_eq!(Granularity::from("2d"), Granularity::TwoDay);
        assert_eq!(Granularity::from("two_day"), Granularity::TwoDay);
        assert_eq!(Granularity::from("unknown"), Granularity::Daily);
        assert_eq!(Granularity::from(None), Granularity::Daily);
        assert_eq!(Granularity::from(Some("6h".to_string())), Granularity::SixHour);
    }

    #[test]
    fn test_granularity_serialization() {
        assert_eq!(serde_json::to_string(&Granularity::SixHour).unwrap(), "\"6h\"");
        assert_eq!(serde_json::to_string(&Granularity::TwoDay).unwrap(), "\"2d\"");
        let parsed: Granularity = serde_json::from_str("\"daily\"").unwrap();
        assert_eq!(parsed, Granularity::Daily);
    }
}
