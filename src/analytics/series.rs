//! Daily time series and its trailing moving average.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::analytics::FilteredView;
use crate::domain::{DailyTotal, RollingPoint};

/// Sum `total_sales` per `date_sold`, ascending by date.
///
/// Days without rows are absent (no zero fill).
pub fn daily_totals(view: &FilteredView<'_>) -> Vec<DailyTotal> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in view.iter() {
        *by_date.entry(r.date_sold).or_insert(0.0) += r.total_sales;
    }
    by_date
        .into_iter()
        .map(|(date, total_sales)| DailyTotal { date, total_sales })
        .collect()
}

/// Trailing mean over the last `window` entries of `daily`.
///
/// The window counts sequence entries, not calendar days: a gap between trading
/// days shifts the window rather than widening it. Positions with fewer than
/// `window` entries up to and including them are `None`, as is every position
/// when `window == 0`.
pub fn rolling_average(daily: &[DailyTotal], window: usize) -> Vec<RollingPoint> {
    daily
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let average = if window == 0 || i + 1 < window {
                None
            } else {
                let slice = &daily[i + 1 - window..=i];
                let sum: f64 = slice.iter().map(|x| x.total_sales).sum();
                Some(sum / window as f64)
            };
            RollingPoint { date: d.date, average }
        })
        .collect()
}
