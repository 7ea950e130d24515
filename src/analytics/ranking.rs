//! Top-N product ranking by revenue.

use std::collections::HashMap;

use crate::analytics::FilteredView;
use crate::domain::ProductTotal;

/// Rank products by summed `total_sales`, descending, keeping the first `n`.
///
/// Groups are kept in first-encountered order and sorted with a stable sort,
/// so equal sums keep the order in which their products first appear in the view.
/// This differs from grouping by sorted key, which would order ties by name.
pub fn top_products(view: &FilteredView<'_>, n: usize) -> Vec<ProductTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<ProductTotal> = Vec::new();

    for r in view.iter() {
        match index.get(r.product_name.as_str()) {
            Some(&i) => totals[i].total_sales += r.total_sales,
            None => {
                index.insert(r.product_name.as_str(), totals.len());
                totals.push(ProductTotal {
                    product_name: r.product_name.clone(),
                    total_sales: r.total_sales,
                });
            }
        }
    }

    totals.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    totals.truncate(n);
    totals
}
