//! Transaction record types
//!
//! Raw rows as supplied by the data-loading side, and the normalized
//! records every aggregate is computed from. Dates are parsed exactly once,
//! here, and never re-parsed downstream.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Epoch values at or above this magnitude are read as milliseconds
const EPOCH_MILLIS_THRESHOLD: f64 = 100_000_000_000.0;

/// Naive timestamp layouts accepted for text dates, most specific first
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Amount as it arrives: a JSON number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

/// Date as it arrives: an epoch number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Epoch(f64),
    Text(String),
}

/// One transaction row exactly as the loading collaborator delivers it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default, alias = "shopName", alias = "store", alias = "shop")]
    pub shop_name: Option<String>,
    #[serde(default, alias = "productName", alias = "product_name")]
    pub product: Option<String>,
    #[serde(default, alias = "payType")]
    pub pay_type: Option<String>,
    #[serde(default)]
    pub amount: Option<RawAmount>,
    #[serde(default, alias = "transaction_time", alias = "transactionTime")]
    pub date: Option<RawDate>,
}

/// A normalized transaction
///
/// `timestamp` is `None` when the source date was missing or unparseable.
/// `amount` is `0.0` when the source amount was missing, non-numeric or NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub shop_name: Option<String>,
    pub product: Option<String>,
    pub pay_type: Option<String>,
    pub amount: f64,
    pub timestamp: Option<NaiveDateTime>,
}

impl TransactionRecord {
    /// Normalize a raw row
    ///
    /// `offset` is the wall-clock offset that zoned timestamps (RFC 3339 and
    /// epoch values) are converted into. Without it zoned text keeps the
    /// wall-clock time it was written in and epochs are read as UTC.
    pub fn from_raw(raw: &RawTransaction, offset: Option<FixedOffset>) -> Self {
        Self {
            shop_name: clean_name(raw.shop_name.as_deref()),
            product: clean_name(raw.product.as_deref()),
            pay_type: clean_name(raw.pay_type.as_deref()),
            amount: parse_amount(raw.amount.as_ref()),
            timestamp: raw.date.as_ref().and_then(|d| parse_timestamp(d, offset)),
        }
    }

    /// Whether this record may contribute to any aggregate
    pub fn is_countable(&self) -> bool {
        self.timestamp.is_some() && self.amount > 0.0
    }
}

/// Normalize a batch of raw rows
pub fn ingest(rows: &[RawTransaction], offset: Option<FixedOffset>) -> Vec<TransactionRecord> {
    rows.iter()
        .map(|row| TransactionRecord::from_raw(row, offset))
        .collect()
}

fn clean_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Coerce a raw amount to a finite number, 0.0 when it is not one
pub fn parse_amount(raw: Option<&RawAmount>) -> f64 {
    let value = match raw {
        Some(RawAmount::Number(n)) => *n,
        Some(RawAmount::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        None => 0.0,
    };

    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parse any accepted date shape into a naive wall-clock timestamp
///
/// Handles formats like:
/// - "2025-09-03T10:30:00.000Z" / "2025-09-03T10:30:00+08:00"
/// - "2025-09-03 10:30:00" / "2025/09/03 10:30"
/// - "2025-09-03" (midnight)
/// - epoch seconds or milliseconds, as a number or a numeric string
pub fn parse_timestamp(raw: &RawDate, offset: Option<FixedOffset>) -> Option<NaiveDateTime> {
    match raw {
        RawDate::Epoch(value) => from_epoch(*value, offset),
        RawDate::Text(text) => parse_text_timestamp(text.trim(), offset),
    }
}

fn parse_text_timestamp(text: &str, offset: Option<FixedOffset>) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }

    if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
        return Some(match offset {
            Some(tz) => zoned.with_timezone(&tz).naive_local(),
            None => zoned.naive_local(),
        });
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ts);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.and_time(NaiveTime::default()));
        }
    }

    text.parse::<f64>().ok().and_then(|value| from_epoch(value, offset))
}

fn from_epoch(value: f64, offset: Option<FixedOffset>) -> Option<NaiveDateTime> {
    if !value.is_finite() {
        return None;
    }

    let millis = if value.abs() >= EPOCH_MILLIS_THRESHOLD {
        value as i64
    } else {
        (value * 1000.0) as i64
    };

    let utc = DateTime::<Utc>::from_timestamp_millis(millis)?;
    Some(match offset {
        Some(tz) => utc.with_timezone(&tz).naive_local(),
        None => utc.naive_utc(),
    })
}
