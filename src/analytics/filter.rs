//! Row filtering.
//!
//! A [`FilteredView`] borrows rows from the dataset; it never copies or
//! mutates them and lives for one recomputation.

use crate::domain::{FilterCriteria, SaleRecord};

/// The subset of dataset rows that passed the current criteria, in dataset order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    rows: Vec<&'a SaleRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &[&'a SaleRecord] {
        &self.rows
    }

    /// Iterate the borrowed rows (with the dataset lifetime, so the result can be re-filtered).
    pub fn iter(&self) -> impl Iterator<Item = &'a SaleRecord> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> FromIterator<&'a SaleRecord> for FilteredView<'a> {
    fn from_iter<T: IntoIterator<Item = &'a SaleRecord>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Keep the rows matching every active constraint.
///
/// A row passes when:
/// * its category is selected (or the category filter is off)
/// * its product is selected (or the product filter is off)
/// * `start <= date_sold <= end`
///
/// A reversed date range matches nothing.
pub fn apply_filters<'a, I>(rows: I, criteria: &FilterCriteria) -> FilteredView<'a>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    if !criteria.date_range.is_ordered() {
        return FilteredView::default();
    }

    rows.into_iter().filter(|r| matches(r, criteria)).collect()
}

fn matches(record: &SaleRecord, criteria: &FilterCriteria) -> bool {
    if let Some(categories) = &criteria.categories {
        if !categories.contains(&record.category) {
            return false;
        }
    }
    if let Some(products) = &criteria.products {
        if !products.contains(&record.product_name) {
            return false;
        }
    }
    criteria.date_range.contains(record.date_sold)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;
    use crate::domain::{DateRange, SalesDataset};

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn ten_day_dataset() -> SalesDataset {
        let cats = ["A", "A", "A", "B", "B", "B", "B", "A", "A", "B"];
        let records = cats
            .iter()
            .enumerate()
            .map(|(i, c)| SaleRecord {
                date_sold: jan(i as u32 + 1),
                category: c.to_string(),
                product_name: format!("P{}", i % 3),
                price: 10.0,
                quantity_sold: i as i64 + 1,
                total_sales: 10.0 * (i as f64 + 1.0),
            })
            .collect();
        SalesDataset::from_records(records)
    }

    fn set(values: &[&str]) -> Option<BTreeSet<String>> {
        Some(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn category_filter_keeps_matching_rows() {
        let ds = ten_day_dataset();
        let criteria = FilterCriteria {
            categories: set(&["A"]),
            ..FilterCriteria::for_dataset(&ds)
        };
        let view = apply_filters(ds.records(), &criteria);
        assert_eq!(view.len(), 5);
        assert!(view.iter().all(|r| r.category == "A"));
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let ds = ten_day_dataset();
        let criteria = FilterCriteria {
            date_range: DateRange::new(jan(3), jan(5)),
            ..FilterCriteria::for_dataset(&ds)
        };
        let view = apply_filters(ds.records(), &criteria);
        let dates: Vec<_> = view.iter().map(|r| r.date_sold).collect();
        assert_eq!(dates, vec![jan(3), jan(4), jan(5)]);
    }

    #[test]
    fn reversed_range_yields_empty_view() {
        let ds = ten_day_dataset();
        let criteria = FilterCriteria {
            date_range: DateRange::new(jan(8), jan(2)),
            ..FilterCriteria::for_dataset(&ds)
        };
        assert!(apply_filters(ds.records(), &criteria).is_empty());
    }

    #[test]
    fn product_filter_combines_with_category() {
        let ds = ten_day_dataset();
        let criteria = FilterCriteria {
            categories: set(&["B"]),
            products: set(&["P0"]),
            ..FilterCriteria::for_dataset(&ds)
        };
        let view = apply_filters(ds.records(), &criteria);
        // B rows are days 4..7 and 10 (indices 3,4,5,6,9); P0 is index % 3 == 0.
        let dates: Vec<_> = view.iter().map(|r| r.date_sold).collect();
        assert_eq!(dates, vec![jan(4), jan(7), jan(10)]);
    }

    #[test]
    fn empty_selection_matches_nothing() {
        let ds = ten_day_dataset();
        let criteria = FilterCriteria {
            categories: set(&[]),
            ..FilterCriteria::for_dataset(&ds)
        };
        assert!(apply_filters(ds.records(), &criteria).is_empty());
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            pick_a in any::<bool>(),
            pick_b in any::<bool>(),
            start in 1u32..=10,
            end in 1u32..=10,
        ) {
            let ds = ten_day_dataset();
            let mut cats = Vec::new();
            if pick_a { cats.push("A"); }
            if pick_b { cats.push("B"); }
            let criteria = FilterCriteria {
                categories: set(&cats),
                products: None,
                date_range: DateRange::new(jan(start), jan(end)),
            };

            let once = apply_filters(ds.records(), &criteria);
            let twice = apply_filters(once.iter(), &criteria);
            prop_assert_eq!(once.rows(), twice.rows());
        }
    }
}
