//! Pearson correlation matrix over price, quantity and revenue.
//!
//! We build the `n × 3` observation matrix, center each column, and read the
//! correlations off the scatter matrix `Xcᵀ Xc`. Undefined cells are `None`:
//!
//! - every cell when the view has fewer than 2 rows
//! - the whole row/column of a constant field (zero variance), diagonal included

use nalgebra::DMatrix;

use crate::analytics::FilteredView;
use crate::domain::{CorrelationMatrix, Field};

pub fn correlation_matrix(view: &FilteredView<'_>) -> CorrelationMatrix {
    let n = view.len();
    if n < 2 {
        return CorrelationMatrix::undefined();
    }

    let rows = view.rows();
    let mut x = DMatrix::from_fn(n, Field::ALL.len(), |i, j| Field::ALL[j].value(rows[i]));

    // Degenerate means every value is bit-for-bit identical.
    let constant: Vec<bool> = (0..x.ncols())
        .map(|j| {
            let col = x.column(j);
            let first = col[0];
            col.iter().all(|v| *v == first)
        })
        .collect();

    for j in 0..x.ncols() {
        let mean = x.column(j).mean();
        x.column_mut(j).add_scalar_mut(-mean);
    }
    let scatter = x.tr_mul(&x);

    let mut values = [[None; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            if constant[i] || constant[j] {
                continue;
            }
            if i == j {
                values[i][j] = Some(1.0);
                continue;
            }
            let denom = (scatter[(i, i)] * scatter[(j, j)]).sqrt();
            if denom > 0.0 && denom.is_finite() {
                values[i][j] = Some((scatter[(i, j)] / denom).clamp(-1.0, 1.0));
            }
        }
    }

    // The scatter matrix is symmetric in exact arithmetic; mirror the upper
    // triangle so rounding cannot make r(a, b) differ from r(b, a).
    for i in 0..3 {
        for j in 0..i {
            values[i][j] = values[j][i];
        }
    }

    CorrelationMatrix {
        fields: Field::ALL,
        values,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;
    use crate::analytics::apply_filters;
    use crate::domain::{FilterCriteria, SaleRecord, SalesDataset};

    fn record(price: f64, qty: i64) -> SaleRecord {
        SaleRecord {
            date_sold: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            category: "C".to_string(),
            product_name: "P".to_string(),
            price,
            quantity_sold: qty,
            total_sales: price * qty as f64,
        }
    }

    fn corr(records: Vec<SaleRecord>) -> CorrelationMatrix {
        let ds = SalesDataset::from_records(records);
        let view = apply_filters(ds.records(), &FilterCriteria::for_dataset(&ds));
        correlation_matrix(&view)
    }

    #[test]
    fn fewer_than_two_rows_is_undefined() {
        assert!(corr(Vec::new()).is_all_undefined());
        assert!(corr(vec![record(1.0, 2)]).is_all_undefined());
    }

    #[test]
    fn perfectly_linear_fields() {
        // Constant price: total is proportional to quantity.
        let m = corr(vec![record(2.0, 1), record(2.0, 2), record(2.0, 5)]);

        assert_eq!(m.get(Field::Price, Field::Price), None);
        assert_eq!(m.get(Field::Price, Field::TotalSales), None);
        assert_eq!(m.get(Field::QuantitySold, Field::QuantitySold), Some(1.0));
        let r = m.get(Field::QuantitySold, Field::TotalSales).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn negative_correlation() {
        let m = corr(vec![record(1.0, 30), record(2.0, 20), record(3.0, 10)]);
        let r = m.get(Field::Price, Field::QuantitySold).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn known_value() {
        // price = [1, 2, 3, 4], qty = [1, 3, 2, 4] -> r = 0.8
        let m = corr(vec![record(1.0, 1), record(2.0, 3), record(3.0, 2), record(4.0, 4)]);
        let r = m.get(Field::Price, Field::QuantitySold).unwrap();
        assert!((r - 0.8).abs() < 1e-12, "got {r}");
    }

    proptest! {
        #[test]
        fn symmetric_with_unit_diagonal(rows in prop::collection::vec((1.0f64..100.0, 1i64..50), 2..40)) {
            let m = corr(rows.iter().map(|(p, q)| record(*p, *q)).collect());
            for i in 0..3 {
                for j in 0..3 {
                    prop_assert_eq!(m.values[i][j], m.values[j][i]);
                    if let Some(v) = m.values[i][j] {
                        prop_assert!((-1.0..=1.0).contains(&v));
                    }
                }
                if let Some(v) = m.values[i][i] {
                    prop_assert_eq!(v, 1.0);
                }
            }
        }
    }
}
