//! Transaction file loading
//!
//! Reads exported transaction files (JSON or CSV) matched by a glob pattern
//! and normalizes every row. This is the caller of the date parser, so it is
//! also where unparseable dates are counted and logged.

pub mod csv_import;
pub mod json_import;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use glob::glob;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::record::{ingest, RawTransaction, TransactionRecord};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("No files match {0}")]
    NoMatches(String),
}

/// File formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Csv,
}

impl FileFormat {
    /// Detect from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Read one file into raw rows
pub fn load_file(path: &Path) -> Result<Vec<RawTransaction>, LoadError> {
    let format =
        FileFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

    let rows = match format {
        FileFormat::Json => json_import::parse_json(&fs::read_to_string(path)?)?,
        FileFormat::Csv => csv_import::parse_csv(fs::File::open(path)?)?,
    };

    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Load and normalize every file matching `pattern`
///
/// Files with an unknown extension are skipped with a warning. Rows with an
/// unparseable date are kept (with no timestamp) and counted in the log.
pub fn load_records(
    pattern: &str,
    offset: Option<FixedOffset>,
) -> Result<Vec<TransactionRecord>, LoadError> {
    let mut rows = Vec::new();
    let mut matched = 0;

    for entry in glob(pattern)? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        if FileFormat::from_path(&path).is_none() {
            warn!("Skipping unsupported file: {}", path.display());
            continue;
        }

        matched += 1;
        rows.extend(load_file(&path)?);
    }

    if matched == 0 {
        return Err(LoadError::NoMatches(pattern.to_string()));
    }

    let records = ingest(&rows, offset);
    let undated = records.iter().filter(|r| r.timestamp.is_none()).count();
    if undated > 0 {
        warn!(
            "{} of {} transactions have a missing or invalid date and will be excluded",
            undated,
            records.len()
        );
    }

    info!("Loaded {} transactions from {} files", records.len(), matched);
    Ok(records)
}
