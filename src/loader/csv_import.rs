//! CSV transaction files
//!
//! Header row required. Every cell is read as text; amount and date
//! coercion happens during normalization like any other row.

use std::io::Read;

use serde::Deserialize;

use super::LoadError;
use crate::models::record::{RawAmount, RawDate, RawTransaction};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default, alias = "shopName", alias = "store", alias = "shop")]
    shop_name: Option<String>,
    #[serde(default, alias = "productName", alias = "product_name")]
    product: Option<String>,
    #[serde(default, alias = "payType")]
    pay_type: Option<String>,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default, alias = "transaction_time", alias = "transactionTime")]
    date: Option<String>,
}

impl From<CsvRow> for RawTransaction {
    fn from(row: CsvRow) -> Self {
        RawTransaction {
            shop_name: row.shop_name,
            product: row.product,
            pay_type: row.pay_type,
            amount: row.amount.map(RawAmount::Text),
            date: row.date.map(RawDate::Text),
        }
    }
}

/// Parse CSV from any reader into raw rows
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawTransaction>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.deserialize::<CsvRow>() {
        rows.push(result?.into());
    }
    Ok(rows)
}
