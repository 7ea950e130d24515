//! CSV ingest and validation.
//!
//! This module turns the sales export into an immutable [`SalesDataset`].
//!
//! Design goals:
//! - **Strict schema**: every required column must be present (exit code 2)
//! - **Fail fast**: an unparseable date or number aborts the load with its line
//!   number, so recomputation never sees a malformed row
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use log::info;

use crate::domain::{SaleRecord, SalesDataset};
use crate::error::AppError;

pub const COL_DATE_SOLD: &str = "Date_Sold";
pub const COL_CATEGORY: &str = "Category";
pub const COL_PRODUCT_NAME: &str = "Product_Name";
pub const COL_PRICE: &str = "Price";
pub const COL_QUANTITY_SOLD: &str = "Quantity_Sold";
pub const COL_TOTAL_SALES: &str = "Total_Sales";

/// Required columns, in the order they are written by `sales sample`.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_DATE_SOLD,
    COL_CATEGORY,
    COL_PRODUCT_NAME,
    COL_PRICE,
    COL_QUANTITY_SOLD,
    COL_TOTAL_SALES,
];

/// Resolved positions of the required columns in the header row.
struct Columns {
    date_sold: usize,
    category: usize,
    product_name: usize,
    price: usize,
    quantity_sold: usize,
    total_sales: usize,
}

/// Load the sales CSV at `path`.
pub fn load_sales_csv(path: &Path) -> Result<SalesDataset, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    let dataset = load_sales_from_reader(file)?;

    if let Some(bounds) = dataset.date_bounds() {
        info!(
            "loaded {} rows from {} ({}..={}, {} categories, {} products)",
            dataset.len(),
            path.display(),
            bounds.start,
            bounds.end,
            dataset.categories().len(),
            dataset.products().len()
        );
    }
    Ok(dataset)
}

/// Load sales rows from any CSV byte source (header row required).
pub fn load_sales_from_reader<R: Read>(source: R) -> Result<SalesDataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let columns = resolve_columns(&build_header_map(&headers))?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        let record = result.map_err(|e| AppError::input(format!("Line {line}: CSV parse error: {e}")))?;
        let row = parse_row(&record, &columns).map_err(|e| AppError::input(format!("Line {line}: {e}")))?;
        records.push(row);
    }

    if records.is_empty() {
        return Err(AppError::new(3, "The CSV contains a header but no sales rows."));
    }

    Ok(SalesDataset::from_records(records))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins when a header is duplicated.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_columns(header_map: &HashMap<String, usize>) -> Result<Columns, AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(&c.to_ascii_lowercase()))
        .collect();
    if !missing.is_empty() {
        let list = missing.iter().map(|c| format!("`{c}`")).collect::<Vec<_>>().join(", ");
        return Err(AppError::input(format!("Missing required column(s): {list}")));
    }

    let at = |name: &str| header_map[&name.to_ascii_lowercase()];
    Ok(Columns {
        date_sold: at(COL_DATE_SOLD),
        category: at(COL_CATEGORY),
        product_name: at(COL_PRODUCT_NAME),
        price: at(COL_PRICE),
        quantity_sold: at(COL_QUANTITY_SOLD),
        total_sales: at(COL_TOTAL_SALES),
    })
}

fn parse_row(record: &StringRecord, columns: &Columns) -> Result<SaleRecord, String> {
    let date_sold = parse_date(get_required(record, columns.date_sold, COL_DATE_SOLD)?)?;
    let category = get_required(record, columns.category, COL_CATEGORY)?.to_string();
    let product_name = get_required(record, columns.product_name, COL_PRODUCT_NAME)?.to_string();
    let price = parse_f64(get_required(record, columns.price, COL_PRICE)?, COL_PRICE)?;
    let quantity_sold = parse_quantity(get_required(record, columns.quantity_sold, COL_QUANTITY_SOLD)?)?;
    let total_sales = parse_f64(get_required(record, columns.total_sales, COL_TOTAL_SALES)?, COL_TOTAL_SALES)?;

    Ok(SaleRecord {
        date_sold,
        category,
        product_name,
        price,
        quantity_sold,
        total_sales,
    })
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

/// Parse a sale date.
///
/// ISO dates (`YYYY-MM-DD`) are the norm, but exports often carry a time part
/// or use day-first layouts. We accept a small fixed set of formats to keep
/// parsing deterministic.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
    const DATETIME_FMTS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, DD/MM/YYYY, DD-MM-YYYY (optionally with a time)."
    ))
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `{name}` value '{s}' (expected a finite number).")),
    }
}

fn parse_quantity(s: &str) -> Result<i64, String> {
    if let Ok(q) = s.parse::<i64>() {
        return Ok(q);
    }
    // Spreadsheet exports often write whole numbers as `3.0`.
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
        _ => Err(format!(
            "Invalid `{COL_QUANTITY_SOLD}` value '{s}' (expected a whole number)."
        )),
    }
}
