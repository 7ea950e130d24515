//! Shared "recompute the dashboard" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! criteria -> filtered view -> daily totals / rolling average / rankings / shares / correlation
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets). The
//! host calls [`compute`] once per state change; nothing is cached between calls.

use log::debug;

use crate::analytics::{
    apply_filters, category_shares, correlation_matrix, daily_totals, rolling_average, summarize,
    top_products,
};
use crate::domain::{DashboardView, FilterCriteria, PipelineOptions, SalesDataset};

/// Recompute every enabled aggregate for `criteria` over the full dataset.
pub fn compute(dataset: &SalesDataset, criteria: &FilterCriteria, options: &PipelineOptions) -> DashboardView {
    let view = apply_filters(dataset.records(), criteria);
    debug!(
        "recompute: {} of {} rows match (range {}..={})",
        view.len(),
        dataset.len(),
        criteria.date_range.start,
        criteria.date_range.end
    );

    let charts = options.charts;
    let daily = charts.time_series.then(|| daily_totals(&view));
    let rolling = daily
        .as_deref()
        .map(|d| rolling_average(d, options.rolling_window));

    DashboardView {
        criteria: criteria.clone(),
        summary: summarize(&view),
        daily_totals: daily,
        rolling_average: rolling,
        rolling_window: options.rolling_window,
        top_products: charts.top_products.then(|| top_products(&view, options.top_n)),
        category_shares: charts.category_shares.then(|| category_shares(&view)),
        correlation: charts.correlation.then(|| correlation_matrix(&view)),
    }
}
