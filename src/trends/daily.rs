//! Calendar-day bucket boundaries
//!
//! Daily and two-day buckets both end on a calendar-day boundary; they only
//! differ in how many days one bucket spans.

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, NaiveDateTime};

use super::BucketStep;
use crate::models::line::start_of_day;

/// Short axis label, "{month}/{day}" without zero padding
pub fn day_label(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// Full label, "{year}/{month}/{day}" without zero padding
pub fn full_date_label(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.year(), date.month(), date.day())
}

/// Midnight `days` calendar days after the cursor's date
pub fn next_day_boundary(cursor: NaiveDateTime, days: i64) -> NaiveDateTime {
    start_of_day(cursor.date() + ChronoDuration::days(days))
}

/// One step of a `days`-wide calendar bucket starting at the cursor
pub(crate) fn step(cursor: NaiveDateTime, days: i64) -> BucketStep {
    BucketStep {
        next_start: next_day_boundary(cursor, days),
        label: day_label(cursor.date()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_label_has_no_padding() {
        let d = NaiveDate::from_ymd_opt(2025, 9, 3).unwrap();
        assert_eq!(day_label(d), "9/3");
        assert_eq!(full_date_label(d), "2025/9/3");

        let d = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        assert_eq!(day_label(d), "12/25");
    }

    #[test]
    fn test_next_day_boundary_from_mid_day() {
        let cursor = NaiveDate::from_ymd_opt(2025, 2, 28)
            .unwrap()
            .and_hms_opt(15, 45, 0)
            .unwrap();

        let next = next_day_boundary(cursor, 1);
        assert_eq!(next, start_of_day(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));

        let next = next_day_boundary(cursor, 2);
        assert_eq!(next, start_of_day(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()));
    }

    #[test]
    fn test_step_labels_cursor_day() {
        let cursor = NaiveDate::from_ymd_opt(2025, 9, 3)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let step = step(cursor, 2);
        assert_eq!(step.label, "9/3");
        assert_eq!(step.next_start.date(), NaiveDate::from_ymd_opt(2025, 9, 5).unwrap());
    }
}
