//! JSON transaction files
//!
//! Accepts a bare array of rows or an API-style envelope holding the array
//! under `data`, `transactions` or `records`.

use serde::Deserialize;

use super::LoadError;
use crate::models::record::RawTransaction;

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPayload {
    Rows(Vec<RawTransaction>),
    Envelope {
        #[serde(alias = "transactions", alias = "records")]
        data: Vec<RawTransaction>,
    },
}

/// Parse JSON text into raw rows
pub fn parse_json(content: &str) -> Result<Vec<RawTransaction>, LoadError> {
    let payload: JsonPayload = serde_json::from_str(content)?;
    Ok(match payload {
        JsonPayload::Rows(rows) => rows,
        JsonPayload::Envelope { data } => data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{RawAmount, RawDate};

    #[test]
    fn test_parse_array_with_aliases() {
        let rows = parse_json(
            r#"[
                {"shopName": "A", "product": "Plush", "payType": "cash", "amount": 12.5, "date": "2025-09-01 10:00:00"},
                {"store": "B", "productName": "Cap", "amount": "8", "transactionTime": 1756720800000}
            ]"#,
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].shop_name.as_deref(), Some("A"));
        assert_eq!(rows[0].amount, Some(RawAmount::Number(12.5)));
        assert_eq!(rows[1].shop_name.as_deref(), Some("B"));
        assert_eq!(rows[1].product.as_deref(), Some("Cap"));
        assert_eq!(rows[1].amount, Some(RawAmount::Text("8".to_string())));
        assert!(matches!(rows[1].date, Some(RawDate::Epoch(_))));
        assert!(rows[1].pay_type.is_none());
    }

    #[test]
    fn test_parse_envelope() {
        let rows = parse_json(r#"{"data": [{"shopName": "A", "amount": 1}]}"#).unwrap();
        assert_eq!(rows.len(), 1);

        let rows = parse_json(r#"{"transactions": []}"#).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(parse_json("{\"oops\": 1}"), Err(LoadError::Json(_))));
    }
}
