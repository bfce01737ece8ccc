//! Command-line front end
//!
//! `sales-lens report` loads transaction files, configures the primary and
//! comparison lines, runs one render pass and prints it as JSON.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, EngineConfig};
use crate::loader::{load_records, LoadError};
use crate::models::line::FilterLine;
use crate::session::SalesSession;
use crate::trends::Granularity;
use crate::views::ChartView;
use crate::EngineError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// Sales analytics over vending transaction exports
#[derive(Parser)]
#[command(name = "sales-lens")]
#[command(about = "Sales analytics over vending transaction exports")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate transactions and print one chart-ready report as JSON
    Report(ReportCommand),
}

#[derive(Args)]
pub struct ReportCommand {
    /// Glob of JSON or CSV transaction files
    #[arg(short, long)]
    pub input: String,

    /// First day of the primary range (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub from: NaiveDate,

    /// Last day of the primary range, inclusive
    #[arg(long, value_parser = parse_date)]
    pub to: NaiveDate,

    /// Comparison range as FIRST..LAST, repeatable (max 4)
    #[arg(long = "compare", value_parser = parse_day_range)]
    pub compare: Vec<(NaiveDate, NaiveDate)>,

    /// Add the period just before the primary range as a comparison
    #[arg(long)]
    pub previous_period: bool,

    /// Restrict the primary line to a store, repeatable
    #[arg(long = "store")]
    pub stores: Vec<String>,

    /// Restrict the primary line to a product, repeatable
    #[arg(long = "product")]
    pub products: Vec<String>,

    /// Bucket width: 6h, daily or 2d
    #[arg(short, long)]
    pub granularity: Option<String>,

    /// Chart: time_series, by_store, by_product or by_payment
    #[arg(long, value_parser = parse_view, default_value = "time_series")]
    pub view: ChartView,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {}", s, e))
}

fn parse_day_range(s: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let (first, last) = s
        .split_once("..")
        .ok_or_else(|| format!("expected FIRST..LAST, got '{}'", s))?;
    Ok((parse_date(first)?, parse_date(last)?))
}

fn parse_view(s: &str) -> Result<ChartView, String> {
    ChartView::from_name(s).ok_or_else(|| format!("unknown view '{}'", s))
}

impl ReportCommand {
    pub fn run(self) -> AppResult<()> {
        let config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::load_default()?,
        };

        let records = load_records(&self.input, config.timestamp_offset())?;
        let primary = FilterLine::for_days(self.from, self.to)
            .with_stores(self.stores.iter().cloned())
            .with_products(self.products.iter().cloned());
        if !primary.is_valid_range() {
            return Err(EngineError::InvalidDateRange {
                start: self.from.to_string(),
                end: self.to.to_string(),
            }
            .into());
        }

        let mut session = SalesSession::new(config, records, primary);
        if let Some(granularity) = self.granularity.clone() {
            session.set_granularity(Granularity::from(granularity.as_str()));
        }

        if self.previous_period {
            session.add_previous_period()?;
        }
        for (first, last) in &self.compare {
            let id = session.add_comparison(FilterLine::for_days(*first, *last))?;
            if !self.stores.is_empty() {
                session.set_stores(id, self.stores.iter().cloned())?;
            }
            if !self.products.is_empty() {
                session.set_products(id, self.products.iter().cloned())?;
            }
        }

        session.select_view(self.view)?;
        let pass = session.render();
        info!(
            "Report: {} lines, total sales {:.2}",
            pass.legends.len(),
            pass.kpi.total_sales
        );

        let json = if self.compact {
            serde_json::to_string(&pass)?
        } else {
            serde_json::to_string_pretty(&pass)?
        };
        println!("{}", json);

        Ok(())
    }
}

pub fn run() -> AppResult<()> {
    // Logs go to stderr so stdout stays valid JSON; RUST_LOG overrides "info"
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report(command) => command.run(),
    }
}
