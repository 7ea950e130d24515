//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during recomputation
//! - exported to JSON/CSV
//! - rendered by either front-end (CLI tables or the TUI)

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default number of products in the top-N ranking.
pub const DEFAULT_TOP_N: usize = 10;
/// Smallest top-N a host may request.
pub const TOP_N_MIN: usize = 5;
/// Largest top-N a host may request.
pub const TOP_N_MAX: usize = 20;
/// Default trailing window (in sequence entries) for the rolling average.
pub const DEFAULT_ROLLING_WINDOW: usize = 7;

/// Clamp a requested top-N into `[TOP_N_MIN, TOP_N_MAX]`.
pub fn clamp_top_n(n: usize) -> usize {
    n.clamp(TOP_N_MIN, TOP_N_MAX)
}

/// One row of the source dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub date_sold: NaiveDate,
    pub category: String,
    pub product_name: String,
    pub price: f64,
    pub quantity_sold: i64,
    /// `price * quantity_sold`, taken as already computed by the source.
    pub total_sales: f64,
}

/// Inclusive date range `[start, end]`.
///
/// A range with `start > end` is representable on purpose: filtering with it
/// yields an empty view rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range that admits every representable date.
    pub fn unbounded() -> Self {
        Self::new(NaiveDate::MIN, NaiveDate::MAX)
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Pull each end toward `bounds`: `start` up to `bounds.start`, `end`
    /// down to `bounds.end`.
    ///
    /// This is the fallback for manual date input. Each end only moves toward
    /// the data, so a range lying wholly before or after the dataset comes
    /// out reversed and filters to an empty view. Ordering is not repaired.
    pub fn clamp_to(&self, bounds: DateRange) -> DateRange {
        DateRange {
            start: self.start.max(bounds.start),
            end: self.end.min(bounds.end),
        }
    }
}

/// The full loaded dataset with pre-computed indices.
///
/// Built once and never mutated; the pipeline only ever borrows it.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    records: Vec<SaleRecord>,
    /// Distinct categories in first-encountered order.
    categories: Vec<String>,
    /// Distinct product names in first-encountered order.
    products: Vec<String>,
    bounds: Option<DateRange>,
}

impl SalesDataset {
    /// Build the dataset and its column indices from loaded records.
    pub fn from_records(records: Vec<SaleRecord>) -> Self {
        let (categories, products, bounds) = index_records(&records);
        Self {
            records,
            categories,
            products,
            bounds,
        }
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    /// `[min_date, max_date]` over all rows, `None` when empty.
    pub fn date_bounds(&self) -> Option<DateRange> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn index_records(records: &[SaleRecord]) -> (Vec<String>, Vec<String>, Option<DateRange>) {
    let mut categories = Vec::new();
    let mut products = Vec::new();
    let mut seen_categories = HashSet::new();
    let mut seen_products = HashSet::new();
    let mut bounds: Option<DateRange> = None;

    for r in records {
        if seen_categories.insert(r.category.as_str()) {
            categories.push(r.category.clone());
        }
        if seen_products.insert(r.product_name.as_str()) {
            products.push(r.product_name.clone());
        }
        bounds = Some(match bounds {
            None => DateRange::new(r.date_sold, r.date_sold),
            Some(b) => DateRange::new(b.start.min(r.date_sold), b.end.max(r.date_sold)),
        });
    }

    (categories, products, bounds)
}

/// User-selected constraints narrowing the dataset.
///
/// `None` for `categories` / `products` means that filter is switched off.
/// `Some(empty)` is an active filter that matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub categories: Option<BTreeSet<String>>,
    pub products: Option<BTreeSet<String>>,
    pub date_range: DateRange,
}

impl FilterCriteria {
    /// Criteria that keep every row of `dataset`.
    pub fn for_dataset(dataset: &SalesDataset) -> Self {
        Self {
            categories: None,
            products: None,
            date_range: dataset.date_bounds().unwrap_or_else(DateRange::unbounded),
        }
    }
}

/// The numeric fields entering the correlation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Price,
    QuantitySold,
    TotalSales,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Price, Field::QuantitySold, Field::TotalSales];

    pub fn label(self) -> &'static str {
        match self {
            Field::Price => "price",
            Field::QuantitySold => "quantity_sold",
            Field::TotalSales => "total_sales",
        }
    }

    pub fn value(self, record: &SaleRecord) -> f64 {
        match self {
            Field::Price => record.price,
            Field::QuantitySold => record.quantity_sold as f64,
            Field::TotalSales => record.total_sales,
        }
    }
}

/// The dashboard's charts, each of which can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    TimeSeries,
    TopProducts,
    CategoryShares,
    Correlation,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::TimeSeries,
        ChartKind::TopProducts,
        ChartKind::CategoryShares,
        ChartKind::Correlation,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::TimeSeries => "Sales over time",
            ChartKind::TopProducts => "Top products",
            ChartKind::CategoryShares => "Category shares",
            ChartKind::Correlation => "Correlation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartToggles {
    pub time_series: bool,
    pub top_products: bool,
    pub category_shares: bool,
    pub correlation: bool,
}

impl Default for ChartToggles {
    fn default() -> Self {
        Self {
            time_series: true,
            top_products: true,
            category_shares: true,
            correlation: true,
        }
    }
}

impl ChartToggles {
    pub fn is_enabled(&self, kind: ChartKind) -> bool {
        match kind {
            ChartKind::TimeSeries => self.time_series,
            ChartKind::TopProducts => self.top_products,
            ChartKind::CategoryShares => self.category_shares,
            ChartKind::Correlation => self.correlation,
        }
    }

    pub fn toggle(&mut self, kind: ChartKind) {
        let flag = match kind {
            ChartKind::TimeSeries => &mut self.time_series,
            ChartKind::TopProducts => &mut self.top_products,
            ChartKind::CategoryShares => &mut self.category_shares,
            ChartKind::Correlation => &mut self.correlation,
        };
        *flag = !*flag;
    }
}

/// Knobs of one recomputation that are not row filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub top_n: usize,
    pub rolling_window: usize,
    pub charts: ChartToggles,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            rolling_window: DEFAULT_ROLLING_WINDOW,
            charts: ChartToggles::default(),
        }
    }
}

/// Summed `total_sales` for one calendar day present in the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_sales: f64,
}

/// Trailing mean at one position of the daily series (`None` until the window fills).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTotal {
    pub product_name: String,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub total_sales: f64,
    /// `100 * total_sales / grand_total`.
    pub percent: f64,
}

/// Pearson correlation over [`Field::ALL`]; `None` marks an undefined cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub fields: [Field; 3],
    pub values: [[Option<f64>; 3]; 3],
}

impl CorrelationMatrix {
    pub fn undefined() -> Self {
        Self {
            fields: Field::ALL,
            values: [[None; 3]; 3],
        }
    }

    pub fn get(&self, a: Field, b: Field) -> Option<f64> {
        let idx = |f: Field| Field::ALL.iter().position(|x| *x == f).unwrap_or(0);
        self.values[idx(a)][idx(b)]
    }

    pub fn is_all_undefined(&self) -> bool {
        self.values.iter().flatten().all(Option::is_none)
    }
}

/// Headline numbers for the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub rows: usize,
    pub total_sales: f64,
    pub units_sold: i64,
    pub distinct_products: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Everything a front-end needs to draw one frame.
///
/// Charts switched off in [`ChartToggles`] are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub criteria: FilterCriteria,
    pub summary: Summary,
    pub daily_totals: Option<Vec<DailyTotal>>,
    pub rolling_average: Option<Vec<RollingPoint>>,
    pub rolling_window: usize,
    pub top_products: Option<Vec<ProductTotal>>,
    pub category_shares: Option<Vec<CategoryShare>>,
    pub correlation: Option<CorrelationMatrix>,
}

/// Export file format for `sales export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// The full dashboard view as pretty-printed JSON.
    Json,
    /// One row per day: `date,total_sales,rolling_avg`.
    Csv,
}

/// Process-level settings resolved from flags, environment and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub csv_path: PathBuf,
    pub top_n: usize,
    pub rolling_window: usize,
}

impl DashboardConfig {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            top_n: self.top_n,
            rolling_window: self.rolling_window,
            charts: ChartToggles::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn rec(day: u32, category: &str, product: &str) -> SaleRecord {
        SaleRecord {
            date_sold: d(day),
            category: category.to_string(),
            product_name: product.to_string(),
            price: 2.0,
            quantity_sold: 3,
            total_sales: 6.0,
        }
    }

    #[test]
    fn dataset_indices_keep_first_encountered_order() {
        let ds = SalesDataset::from_records(vec![
            rec(5, "Toys", "Ball"),
            rec(2, "Books", "Atlas"),
            rec(9, "Toys", "Kite"),
            rec(3, "Books", "Ball"),
        ]);
        assert_eq!(ds.categories(), ["Toys", "Books"]);
        assert_eq!(ds.products(), ["Ball", "Atlas", "Kite"]);
        assert_eq!(ds.date_bounds(), Some(DateRange::new(d(2), d(9))));
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = SalesDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.date_bounds(), None);
        assert_eq!(FilterCriteria::for_dataset(&ds).date_range, DateRange::unbounded());
    }

    #[test]
    fn clamp_pulls_dates_into_bounds() {
        let bounds = DateRange::new(d(5), d(20));
        let wide = DateRange::new(d(1), d(31));
        assert_eq!(wide.clamp_to(bounds), bounds);

        let inside = DateRange::new(d(7), d(8));
        assert_eq!(inside.clamp_to(bounds), inside);
    }

    #[test]
    fn clamp_keeps_disjoint_ranges_empty() {
        let bounds = DateRange::new(d(5), d(20));

        let after = DateRange::new(d(25), d(31)).clamp_to(bounds);
        assert_eq!(after, DateRange::new(d(25), d(20)));
        assert!(!after.is_ordered());

        let before = DateRange::new(d(1), d(3)).clamp_to(bounds);
        assert_eq!(before, DateRange::new(d(5), d(3)));
        assert!(!before.is_ordered());
    }

    #[test]
    fn top_n_is_clamped() {
        assert_eq!(clamp_top_n(1), TOP_N_MIN);
        assert_eq!(clamp_top_n(12), 12);
        assert_eq!(clamp_top_n(99), TOP_N_MAX);
    }

    #[test]
    fn chart_toggle_flips_one_flag() {
        let mut charts = ChartToggles::default();
        charts.toggle(ChartKind::Correlation);
        assert!(!charts.is_enabled(ChartKind::Correlation));
        assert!(charts.is_enabled(ChartKind::TimeSeries));
        charts.toggle(ChartKind::Correlation);
        assert!(charts.is_enabled(ChartKind::Correlation));
    }
}
