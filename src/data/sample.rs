//! Synthetic sales data for demos and tests.
//!
//! Rows are drawn from a fixed catalogue so the output looks like a small
//! retail export: a handful of categories, a few products each, prices that
//! wobble around a list price and Poisson-ish basket sizes. The generator is
//! seeded, so the same [`SampleSpec`] always produces the same file.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use log::info;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Normal, Poisson};

use crate::domain::SaleRecord;
use crate::error::AppError;
use crate::io::REQUIRED_COLUMNS;

/// Category -> (product, list price).
const CATALOGUE: &[(&str, &[(&str, f64)])] = &[
    (
        "Electronics",
        &[("Headphones", 59.90), ("Smartwatch", 199.00), ("Charger", 19.90), ("Bluetooth Speaker", 89.00)],
    ),
    ("Books", &[("Novel", 14.50), ("Cookbook", 24.00), ("Atlas", 35.00)]),
    ("Clothing", &[("T-Shirt", 15.00), ("Jeans", 49.00), ("Jacket", 120.00)]),
    ("Home", &[("Desk Lamp", 39.00), ("Blender", 75.00), ("Towel Set", 22.00)]),
    ("Sports", &[("Yoga Mat", 25.00), ("Dumbbells", 60.00), ("Running Shoes", 95.00)]),
];

/// Relative price noise around the list price.
const PRICE_JITTER: f64 = 0.05;

/// Mean of the extra units on top of the first one.
const EXTRA_UNITS_MEAN: f64 = 1.5;

#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub rows: usize,
    pub seed: u64,
    pub start: NaiveDate,
    pub days: u32,
}

/// Generate `spec.rows` sales, sorted by date.
pub fn generate_sales(spec: &SampleSpec) -> Result<Vec<SaleRecord>, AppError> {
    if spec.rows == 0 {
        return Err(AppError::new(2, "Sample row count must be > 0."));
    }
    if spec.days == 0 {
        return Err(AppError::new(2, "Sample day span must be > 0."));
    }
    if spec.start.checked_add_signed(Duration::days(i64::from(spec.days))).is_none() {
        return Err(AppError::new(2, "Sample date span runs past the supported calendar."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let jitter = Normal::new(0.0, PRICE_JITTER)
        .map_err(|e| AppError::new(4, format!("Price distribution error: {e}")))?;
    let extra_units = Poisson::new(EXTRA_UNITS_MEAN)
        .map_err(|e| AppError::new(4, format!("Quantity distribution error: {e}")))?;

    let mut records = Vec::with_capacity(spec.rows);
    for _ in 0..spec.rows {
        let offset = rng.gen_range(0..spec.days);
        let date_sold = spec.start + Duration::days(i64::from(offset));

        let (category, products) = CATALOGUE[rng.gen_range(0..CATALOGUE.len())];
        let (product, list_price) = products[rng.gen_range(0..products.len())];

        let z: f64 = jitter.sample(&mut rng);
        let price = round_cents((list_price * (1.0 + z)).max(0.01));
        let extra: f64 = extra_units.sample(&mut rng);
        let quantity_sold = 1 + extra as i64;

        records.push(SaleRecord {
            date_sold,
            category: category.to_string(),
            product_name: product.to_string(),
            price,
            quantity_sold,
            total_sales: round_cents(price * quantity_sold as f64),
        });
    }

    // Stable, so same-day rows keep their draw order.
    records.sort_by_key(|r| r.date_sold);
    Ok(records)
}

/// Generate a sample and write it to `path` as CSV.
pub fn write_sample_csv(path: &Path, spec: &SampleSpec) -> Result<usize, AppError> {
    let records = generate_sales(spec)?;
    let file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create sample CSV '{}': {e}", path.display()))
    })?;
    write_sales_csv(file, &records)?;

    info!("wrote {} sample rows to {}", records.len(), path.display());
    Ok(records.len())
}

/// Write records with the standard column layout.
pub fn write_sales_csv<W: Write>(out: W, records: &[SaleRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(REQUIRED_COLUMNS)
        .map_err(|e| AppError::input(format!("Failed to write sample CSV header: {e}")))?;

    for r in records {
        writer
            .write_record([
                r.date_sold.format("%Y-%m-%d").to_string(),
                r.category.clone(),
                r.product_name.clone(),
                format!("{:.2}", r.price),
                r.quantity_sold.to_string(),
                format!("{:.2}", r.total_sales),
            ])
            .map_err(|e| AppError::input(format!("Failed to write sample CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush sample CSV: {e}")))
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
