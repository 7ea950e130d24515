//! Category revenue shares (the pie chart).

use std::collections::BTreeMap;

use crate::analytics::FilteredView;
use crate::domain::CategoryShare;

/// Summed `total_sales` and percentage share per category, ordered by category name.
///
/// Only categories present in the view appear. An empty view (or one whose
/// grand total is zero) yields no entries, so no share is ever divided by zero.
pub fn category_shares(view: &FilteredView<'_>) -> Vec<CategoryShare> {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for r in view.iter() {
        *by_category.entry(r.category.as_str()).or_insert(0.0) += r.total_sales;
    }

    let grand_total: f64 = by_category.values().sum();
    if grand_total == 0.0 || !grand_total.is_finite() {
        return Vec::new();
    }

    by_category
        .into_iter()
        .map(|(category, total_sales)| CategoryShare {
            category: category.to_string(),
            total_sales,
            percent: 100.0 * total_sales / grand_total,
        })
        .collect()
}
