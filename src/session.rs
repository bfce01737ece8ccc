//! Analytics session
//!
//! Owns the loaded records and all mutable engine state: the lines, the
//! active granularity, the view state and the category colors. UI events
//! arrive as method calls; every configuration change re-checks view
//! availability before the next render.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info};

use crate::colors::ColorRegistry;
use crate::config::EngineConfig;
use crate::lines::{AlignedSeries, LegendEntry, LineId, LineManager};
use crate::metrics::breakdown::{
    payment_chart, product_chart, store_chart, store_details, BreakdownChart, StoreDetail,
};
use crate::metrics::{compute_kpi, filter_line, Kpi};
use crate::models::line::{end_of_day, start_of_day, FilterLine};
use crate::models::record::{ingest, RawTransaction, TransactionRecord};
use crate::trends::Granularity;
use crate::views::{check_availability, Availability, ChartView, ViewState, ViewTransition};
use crate::EngineError;

/// Everything the UI needs for one render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPass {
    pub granularity: Granularity,
    pub view: ChartView,
    pub availability: Availability,
    /// Set when the last configuration change forced the view back to the time series
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<ViewTransition>,
    pub kpi: Kpi,
    pub legends: Vec<LegendEntry>,
    pub series: AlignedSeries,
    /// Present for breakdown views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BreakdownChart>,
    /// Per-store product ranking, present for the store view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_details: Option<Vec<StoreDetail>>,
}

pub struct SalesSession {
    config: EngineConfig,
    records: Vec<TransactionRecord>,
    lines: LineManager,
    granularity: Granularity,
    view: ViewState,
    colors: ColorRegistry,
    pending_fallback: Option<ViewTransition>,
}

impl SalesSession {
    /// Start a session over already-normalized records
    pub fn new(config: EngineConfig, records: Vec<TransactionRecord>, primary: FilterLine) -> Self {
        let lines = LineManager::new(primary);
        let mut view = ViewState::default();
        view.reset(check_availability(&lines));

        info!(
            "Session started with {} transactions, {} undated",
            records.len(),
            records.iter().filter(|r| r.timestamp.is_none()).count()
        );

        Self {
            granularity: config.default_granularity,
            colors: ColorRegistry::new(config.palette.clone()),
            config,
            records,
            lines,
            view,
            pending_fallback: None,
        }
    }

    /// Start a session from raw rows, normalizing them once
    pub fn from_raw(config: EngineConfig, rows: &[RawTransaction], primary: FilterLine) -> Self {
        let records = ingest(rows, config.timestamp_offset());
        Self::new(config, records, primary)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn lines(&self) -> &LineManager {
        &self.lines
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn active_view(&self) -> ChartView {
        self.view.active()
    }

    pub fn availability(&self) -> &Availability {
        self.view.availability()
    }

    pub fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    /// Distinct store names in the record set, for selection lists
    pub fn store_names(&self) -> BTreeSet<String> {
        self.records.iter().filter_map(|r| r.shop_name.clone()).collect()
    }

    /// Distinct product names in the record set, for selection lists
    pub fn product_names(&self) -> BTreeSet<String> {
        self.records.iter().filter_map(|r| r.product.clone()).collect()
    }

    /// Re-check availability after a line change
    fn revalidate(&mut self) {
        if let Some(transition) = self.view.reconcile(check_availability(&self.lines)) {
            self.pending_fallback = Some(transition);
        }
    }

    pub fn set_date_range(
        &mut self,
        id: LineId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<(), EngineError> {
        self.lines.set_date_range(id, start, end)?;
        info!("{} range set to {} ~ {}", id.display_name(), start, end);
        self.revalidate();
        Ok(())
    }

    /// Date-picker variant: whole days, end day inclusive
    pub fn set_day_range(&mut self, id: LineId, first: NaiveDate, last: NaiveDate) -> Result<(), EngineError> {
        self.set_date_range(id, start_of_day(first), end_of_day(last))
    }

    pub fn set_stores<I, S>(&mut self, id: LineId, stores: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stores: BTreeSet<String> = stores.into_iter().map(Into::into).collect();
        let count = stores.len();
        self.lines.set_stores(id, stores)?;
        info!("{} store selection: {} selected", id.display_name(), count);
        self.revalidate();
        Ok(())
    }

    pub fn set_products<I, S>(&mut self, id: LineId, products: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let products: BTreeSet<String> = products.into_iter().map(Into::into).collect();
        let count = products.len();
        self.lines.set_products(id, products)?;
        info!("{} product selection: {} selected", id.display_name(), count);
        self.revalidate();
        Ok(())
    }

    pub fn add_comparison(&mut self, line: FilterLine) -> Result<LineId, EngineError> {
        let id = self.lines.add_comparison(line)?;
        info!("{} added", id.display_name());
        self.revalidate();
        Ok(id)
    }

    /// Compare against the period just before the primary range
    pub fn add_previous_period(&mut self) -> Result<LineId, EngineError> {
        let line = self.lines.primary().previous_period();
        self.add_comparison(line)
    }

    pub fn remove_comparison(&mut self, index: usize) -> Result<(), EngineError> {
        self.lines.remove_comparison(index)?;
        info!("{} removed", LineId::Comparison(index).display_name());
        self.revalidate();
        Ok(())
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        info!("Granularity set to {}", granularity.as_str());
        self.granularity = granularity;
    }

    /// Switch charts; rejected without change when the view is unavailable
    pub fn select_view(&mut self, view: ChartView) -> Result<(), EngineError> {
        self.view.request(view)?;
        self.pending_fallback = None;
        info!("View set to {}", view.as_str());
        Ok(())
    }

    /// Drop comparison lines, return to the time series and forget colors
    pub fn reset(&mut self) {
        self.lines.clear_comparisons();
        self.view.reset(check_availability(&self.lines));
        self.colors.reset();
        self.pending_fallback = None;
        info!("Session reset");
    }

    /// Compute everything for the current configuration
    ///
    /// Re-running with unchanged configuration yields identical output: the
    /// only state touched is the append-only color map.
    pub fn render(&mut self) -> RenderPass {
        let primary = filter_line(&self.records, self.lines.primary());
        let baseline = self
            .lines
            .baseline()
            .map(|line| filter_line(&self.records, line));
        let baseline = baseline.as_deref();

        let kpi = compute_kpi(&primary, baseline);
        let series = self.lines.compute_series(&self.records, self.granularity);
        let view = self.view.active();

        let breakdown = match view {
            ChartView::TimeSeries => None,
            ChartView::ByStore => Some(store_chart(&primary, baseline, &mut self.colors)),
            ChartView::ByProduct => Some(product_chart(
                &primary,
                baseline,
                self.config.top_n,
                &self.config.other_label,
                &mut self.colors,
            )),
            ChartView::ByPayment => Some(payment_chart(&primary, baseline, &mut self.colors)),
        };

        let details = (view == ChartView::ByStore).then(|| store_details(&primary, &mut self.colors));

        debug!(
            "Rendered {} with {} lines over {} slots",
            view.as_str(),
            series.lines.len(),
            series.length
        );

        RenderPass {
            granularity: self.granularity,
            view,
            availability: self.view.availability().clone(),
            fallback: self.pending_fallback.take(),
            kpi,
            legends: self.lines.legends(),
            series,
            breakdown,
            store_details: details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    fn record(shop: &str, product: &str, amount: f64, ts: &str) -> TransactionRecord {
        TransactionRecord {
            shop_name: Some(shop.to_string()),
            product: Some(product.to_string()),
            pay_type: Some("cash".to_string()),
            amount,
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").ok(),
        }
    }

    fn session() -> SalesSession {
        let records = vec![
            record("A", "Plush", 60.0, "2025-09-02 10:00:00"),
            record("B", "Cap", 60.0, "2025-09-03 15:00:00"),
            record("A", "Plush", 100.0, "2025-08-27 09:00:00"),
        ];
        SalesSession::new(
            EngineConfig::default(),
            records,
            FilterLine::for_days(day(1), day(7)),
        )
    }

    #[test]
    fn test_render_single_line() {
        let mut s = session();
        let pass = s.render();

        assert_eq!(pass.view, ChartView::TimeSeries);
        assert_eq!(pass.kpi.total_sales, 120.0);
        assert!(pass.kpi.delta.is_none());
        assert_eq!(pass.series.length, 7);
        assert!(pass.breakdown.is_none());
        assert_eq!(pass.legends.len(), 1);
    }

    #[test]
    fn test_previous_period_baseline() {
        let mut s = session();
        s.add_previous_period().unwrap();
        let pass = s.render();

        let delta = pass.kpi.delta.unwrap();
        assert!((delta.total_sales.absolute - 20.0).abs() < 0.001);
        assert!((delta.total_sales.percentage - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_selection_change_forces_fallback() {
        let mut s = session();
        s.select_view(ChartView::ByStore).unwrap();
        s.add_comparison(FilterLine::for_days(day(8), day(14))).unwrap();
        assert_eq!(s.active_view(), ChartView::ByStore);

        s.set_stores(LineId::Comparison(0), ["A"]).unwrap();
        assert_eq!(s.active_view(), ChartView::TimeSeries);
        assert!(!s.availability().available);

        let pass = s.render();
        let fallback = pass.fallback.unwrap();
        assert_eq!(fallback.from, ChartView::ByStore);
        assert!(s.render().fallback.is_none());
    }

    #[test]
    fn test_select_unavailable_view_rejected() {
        let mut s = session();
        s.set_stores(LineId::Primary, ["A", "B"]).unwrap();
        let err = s.select_view(ChartView::ByProduct).unwrap_err();
        assert!(matches!(err, EngineError::ViewUnavailable { .. }));
        assert_eq!(s.active_view(), ChartView::TimeSeries);
    }

    #[test]
    fn test_store_view_includes_details() {
        let mut s = session();
        s.select_view(ChartView::ByStore).unwrap();
        let pass = s.render();

        assert!(matches!(pass.breakdown, Some(BreakdownChart::Slices { .. })));
        let details = pass.store_details.unwrap();
        assert_eq!(details.len(), 2);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut s = session();
        s.select_view(ChartView::ByProduct).unwrap();
        let first = s.render();
        let second = s.render();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reset() {
        let mut s = session();
        s.add_comparison(FilterLine::for_days(day(8), day(14))).unwrap();
        s.select_view(ChartView::ByPayment).unwrap();
        s.render();
        assert!(!s.colors().is_empty());

        s.reset();
        assert!(!s.lines().has_comparisons());
        assert_eq!(s.active_view(), ChartView::TimeSeries);
        assert!(s.colors().is_empty());
    }

    #[test]
    fn test_invalid_range_leaves_state() {
        let mut s = session();
        let err = s.set_day_range(LineId::Primary, day(9), day(1)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDateRange { .. }));
        assert_eq!(s.lines().primary().start.date(), day(1));
    }

    #[test]
    fn test_name_lists() {
        let s = session();
        assert_eq!(s.store_names().len(), 2);
        assert!(s.product_names().contains("Cap"));
    }
}
