//! Formatted terminal output for the `summary` command.
//!
//! We keep formatting code in one place so:
//! - the analytics code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{CategoryShare, CorrelationMatrix, DashboardView, FilterCriteria, ProductTotal};

/// Format the KPI header plus the active filters.
pub fn format_run_summary(view: &DashboardView) -> String {
    let mut out = String::new();
    let s = &view.summary;

    out.push_str("=== sales - Sales Dashboard ===\n");
    out.push_str(&format!("Filters: {}\n", describe_criteria(&view.criteria)));
    match (s.first_date, s.last_date) {
        (Some(first), Some(last)) => out.push_str(&format!("Dates: {first} .. {last}\n")),
        _ => out.push_str("Dates: -\n"),
    }
    out.push_str(&format!(
        "Rows: {} | Revenue: {} | Units: {} | Products: {}\n",
        s.rows,
        fmt_amount(s.total_sales),
        s.units_sold,
        s.distinct_products
    ));

    out
}

/// Format every enabled section of the dashboard (without the plot).
pub fn format_dashboard(view: &DashboardView) -> String {
    let mut out = format_run_summary(view);

    if let Some(top) = &view.top_products {
        out.push_str(&format!("\nTop {} products by revenue:\n", top.len()));
        out.push_str(&format_top_products(top));
    }
    if let Some(shares) = &view.category_shares {
        out.push_str("\nCategory share of revenue:\n");
        out.push_str(&format_category_shares(shares));
    }
    if let Some(corr) = &view.correlation {
        out.push_str("\nCorrelation (Pearson):\n");
        out.push_str(&format_correlation(corr));
    }

    out
}

pub fn describe_criteria(criteria: &FilterCriteria) -> String {
    let list = |set: &Option<std::collections::BTreeSet<String>>| match set {
        None => "all".to_string(),
        Some(s) if s.is_empty() => "none".to_string(),
        Some(s) => s.iter().cloned().collect::<Vec<_>>().join(", "),
    };
    format!(
        "categories=[{}] products=[{}] dates={}..={}",
        list(&criteria.categories),
        list(&criteria.products),
        criteria.date_range.start,
        criteria.date_range.end
    )
}

pub fn format_top_products(rows: &[ProductTotal]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:>3} {:<32} {:>14}\n", "#", "product", "revenue").trim_end());
    out.push('\n');
    out.push_str(format!("{:->3} {:-<32} {:->14}\n", "", "", "").trim_end());
    out.push('\n');

    if rows.is_empty() {
        out.push_str("(no sales)\n");
        return out;
    }

    for (i, p) in rows.iter().enumerate() {
        out.push_str(
            format!(
                "{:>3} {:<32} {:>14}\n",
                i + 1,
                truncate(&p.product_name, 32),
                fmt_amount(p.total_sales)
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

pub fn format_category_shares(rows: &[CategoryShare]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<24} {:>14} {:>7}\n", "category", "revenue", "share").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<24} {:->14} {:->7}\n", "", "", "").trim_end());
    out.push('\n');

    if rows.is_empty() {
        out.push_str("(no sales)\n");
        return out;
    }

    for c in rows {
        out.push_str(
            format!(
                "{:<24} {:>14} {:>7}\n",
                truncate(&c.category, 24),
                fmt_amount(c.total_sales),
                fmt_percent(c.percent)
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

pub fn format_correlation(m: &CorrelationMatrix) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<14}", ""));
    for f in &m.fields {
        out.push_str(&format!(" {:>14}", f.label()));
    }
    out.push('\n');

    for (i, f) in m.fields.iter().enumerate() {
        out.push_str(&format!("{:<14}", f.label()));
        for v in &m.values[i] {
            out.push_str(&format!(" {:>14}", fmt_corr(*v)));
        }
        out.push('\n');
    }
    out
}

/// Pie-chart label style: one decimal and a percent sign.
pub fn fmt_percent(v: f64) -> String {
    format!("{v:.1}%")
}

/// Correlation cell; undefined cells read `n/a` rather than `0`.
pub fn fmt_corr(v: Option<f64>) -> String {
    match v {
        Some(r) => format!("{r:.3}"),
        None => "n/a".to_string(),
    }
}

pub fn fmt_amount(v: f64) -> String {
    format!("{v:.2}")
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{DateRange, Field};

    #[test]
    fn shares_table() {
        let rows = vec![
            CategoryShare { category: "Books".to_string(), total_sales: 25.0, percent: 25.0 },
            CategoryShare { category: "Toys".to_string(), total_sales: 75.0, percent: 75.0 },
        ];
        let txt = format_category_shares(&rows);
        let expected = concat!(
            "category                        revenue   share\n",
            "------------------------ -------------- -------\n",
            "Books                             25.00   25.0%\n",
            "Toys                              75.00   75.0%\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_top_products_table() {
        let txt = format_top_products(&[]);
        assert!(txt.ends_with("(no sales)\n"));
    }

    #[test]
    fn undefined_correlation_prints_na() {
        let mut m = CorrelationMatrix::undefined();
        m.values[1][1] = Some(1.0);
        let txt = format_correlation(&m);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains(Field::QuantitySold.label()));
        assert!(lines[2].contains("1.000"));
        assert!(lines[1].contains("n/a"));
    }

    #[test]
    fn criteria_description() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let criteria = FilterCriteria {
            categories: Some(BTreeSet::from(["B".to_string(), "A".to_string()])),
            products: None,
            date_range: DateRange::new(d(1), d(9)),
        };
        assert_eq!(
            describe_criteria(&criteria),
            "categories=[A, B] products=[all] dates=2024-01-01..=2024-01-09"
        );
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
