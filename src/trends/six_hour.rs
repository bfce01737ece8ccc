//! Six-hour day-part buckets
//!
//! Four buckets per calendar day starting at hours 0, 6, 12 and 18. The
//! midnight bucket carries the date label; the other three carry the name of
//! their day part.

use chrono::{Duration as ChronoDuration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::daily::day_label;
use super::BucketStep;
use crate::models::line::start_of_day;

/// Width of one bucket in hours
pub const BLOCK_HOURS: u32 = 6;

/// The four six-hour blocks of a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    /// 00:00 - 05:59, labeled with the date
    Night,
    /// 06:00 - 11:59
    Morning,
    /// 12:00 - 17:59
    Noon,
    /// 18:00 - 23:59
    Evening,
}

impl DayPart {
    /// Day part containing the given hour
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => Self::Night,
            6..=11 => Self::Morning,
            12..=17 => Self::Noon,
            _ => Self::Evening,
        }
    }

    /// First hour of the block
    pub fn start_hour(&self) -> u32 {
        match self {
            Self::Night => 0,
            Self::Morning => 6,
            Self::Noon => 12,
            Self::Evening => 18,
        }
    }

    /// Axis label for the non-date blocks
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Night => None,
            Self::Morning => Some("morning"),
            Self::Noon => Some("noon"),
            Self::Evening => Some("evening"),
        }
    }
}

/// One step of a six-hour bucket starting at the cursor
///
/// An unaligned cursor still ends at the next block boundary, so every later
/// bucket is aligned to hours 0/6/12/18.
pub(crate) fn step(cursor: NaiveDateTime) -> BucketStep {
    let part = DayPart::from_hour(cursor.hour());
    let block_start =
        start_of_day(cursor.date()) + ChronoDuration::hours(i64::from(part.start_hour()));
    let next_start = block_start + ChronoDuration::hours(i64::from(BLOCK_HOURS));

    let label = match part.label() {
        Some(name) => name.to_string(),
        None => day_label(cursor.date()),
    };

    BucketStep { next_start, label }
}
