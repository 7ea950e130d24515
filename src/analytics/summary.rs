//! Headline numbers for the dashboard header.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::analytics::FilteredView;
use crate::domain::Summary;

pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let mut products = HashSet::new();
    let mut total_sales = 0.0;
    let mut units_sold = 0i64;
    let mut first_date = None;
    let mut last_date = None;

    for r in view.iter() {
        products.insert(r.product_name.as_str());
        total_sales += r.total_sales;
        units_sold = units_sold.saturating_add(r.quantity_sold);
        first_date = Some(first_date.map_or(r.date_sold, |d: NaiveDate| d.min(r.date_sold)));
        last_date = Some(last_date.map_or(r.date_sold, |d: NaiveDate| d.max(r.date_sold)));
    }

    Summary {
        rows: view.len(),
        total_sales,
        units_sold,
        distinct_products: products.len(),
        first_date,
        last_date,
    }
}
