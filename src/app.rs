//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the config and loads the dataset
//! - turns flags into filter criteria
//! - prints reports/plots, writes exports or hands over to the TUI

use std::collections::BTreeSet;

use clap::Parser;

use crate::cli::{Command, ExportArgs, FilterArgs, SampleArgs, SummaryArgs};
use crate::config::{self, ConfigOverrides};
use crate::data::SampleSpec;
use crate::domain::{DashboardConfig, DateRange, FilterCriteria, SalesDataset};
use crate::error::AppError;
use crate::io::parse_date;

pub mod pipeline;

/// Entry point for the `sales` binary.
pub fn run() -> Result<(), AppError> {
    // `sales` and `sales -f data.csv` behave like `sales tui ...`; clap needs
    // the subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Export(args) => handle_export(args),
        Command::Sample(args) => handle_sample(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let (dataset, config) = load(&args.filters)?;
    let criteria = criteria_from_args(&args.filters, &dataset)?;
    let view = pipeline::compute(&dataset, &criteria, &config.pipeline_options());

    println!("{}", crate::report::format_dashboard(&view));

    if !args.no_plot {
        if let (Some(daily), Some(rolling)) = (&view.daily_totals, &view.rolling_average) {
            let plot = crate::plot::render_sales_plot(
                daily,
                rolling,
                view.rolling_window,
                args.width,
                args.height,
            );
            println!("{plot}");
        }
    }

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let (dataset, config) = load(&args.filters)?;
    let criteria = criteria_from_args(&args.filters, &dataset)?;
    let view = pipeline::compute(&dataset, &criteria, &config.pipeline_options());

    crate::io::write_export(&args.out, &view, args.format)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let start = parse_date(&args.start).map_err(AppError::input)?;
    let spec = SampleSpec {
        rows: args.rows,
        seed: args.seed,
        start,
        days: args.days,
    };
    let written = crate::data::write_sample_csv(&args.out, &spec)?;
    println!("Wrote {written} rows to {}", args.out.display());
    Ok(())
}

fn handle_tui(args: FilterArgs) -> Result<(), AppError> {
    // Load before touching the terminal so input errors print normally.
    let (dataset, config) = load(&args)?;
    let criteria = criteria_from_args(&args, &dataset)?;
    crate::tui::run(dataset, criteria, config.pipeline_options())
}

fn load(args: &FilterArgs) -> Result<(SalesDataset, DashboardConfig), AppError> {
    let config = config::resolve(&overrides_from_args(args))?;
    let dataset = crate::io::load_sales_csv(&config.csv_path)?;
    Ok((dataset, config))
}

pub fn overrides_from_args(args: &FilterArgs) -> ConfigOverrides {
    ConfigOverrides {
        csv_path: args.file.clone(),
        top_n: args.top,
        rolling_window: args.window,
    }
}

/// Build filter criteria from CLI flags.
///
/// Empty `--category` / `--product` lists leave that filter off. `--from`
/// before the data starts at its first day and `--to` after it stops at the
/// last day; a range wholly outside the data stays empty. Unparseable dates
/// are usage errors.
pub fn criteria_from_args(args: &FilterArgs, dataset: &SalesDataset) -> Result<FilterCriteria, AppError> {
    let mut criteria = FilterCriteria::for_dataset(dataset);

    if !args.categories.is_empty() {
        criteria.categories = Some(args.categories.iter().cloned().collect::<BTreeSet<_>>());
    }
    if !args.products.is_empty() {
        criteria.products = Some(args.products.iter().cloned().collect::<BTreeSet<_>>());
    }

    let parse = |raw: &Option<String>, flag: &str| -> Result<Option<chrono::NaiveDate>, AppError> {
        raw.as_deref()
            .map(|s| parse_date(s.trim()).map_err(|e| AppError::input(format!("--{flag}: {e}"))))
            .transpose()
    };
    let from = parse(&args.from, "from")?;
    let to = parse(&args.to, "to")?;

    if let Some(bounds) = dataset.date_bounds() {
        let requested = DateRange::new(from.unwrap_or(bounds.start), to.unwrap_or(bounds.end));
        criteria.date_range = requested.clamp_to(bounds);
    }

    Ok(criteria)
}

/// Rewrite argv so `sales` defaults to `sales tui`.
///
/// Rules:
/// - `sales`                      -> `sales tui`
/// - `sales -f data.csv ...`      -> `sales tui -f data.csv ...`
/// - `sales --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "export" | "sample" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::SaleRecord;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn dataset() -> SalesDataset {
        let row = |day, category: &str, product: &str| SaleRecord {
            date_sold: jan(day),
            category: category.to_string(),
            product_name: product.to_string(),
            price: 10.0,
            quantity_sold: 1,
            total_sales: 10.0,
        };
        SalesDataset::from_records(vec![row(3, "A", "x"), row(5, "B", "y"), row(9, "A", "z")])
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["sales"])), argv(&["sales", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["sales", "-f", "d.csv"])),
            argv(&["sales", "tui", "-f", "d.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(argv(&["sales", "summary"])), argv(&["sales", "summary"]));
        assert_eq!(rewrite_args(argv(&["sales", "--help"])), argv(&["sales", "--help"]));
    }

    #[test]
    fn criteria_default_to_whole_dataset() {
        let ds = dataset();
        let criteria = criteria_from_args(&FilterArgs::default(), &ds).unwrap();
        assert_eq!(criteria, FilterCriteria::for_dataset(&ds));
    }

    #[test]
    fn criteria_dates_are_clamped_to_bounds() {
        let ds = dataset();
        let args = FilterArgs {
            categories: vec!["A".to_string()],
            from: Some("2023-12-01".to_string()),
            to: Some("2024-01-06".to_string()),
            ..FilterArgs::default()
        };
        let criteria = criteria_from_args(&args, &ds).unwrap();
        assert_eq!(criteria.date_range, DateRange::new(jan(3), jan(6)));
        assert_eq!(criteria.categories, Some(BTreeSet::from(["A".to_string()])));
        assert_eq!(criteria.products, None);
    }

    #[test]
    fn range_outside_the_data_matches_nothing() {
        let ds = dataset();
        let args = FilterArgs {
            from: Some("2030-01-01".to_string()),
            to: Some("2030-02-01".to_string()),
            ..FilterArgs::default()
        };
        let criteria = criteria_from_args(&args, &ds).unwrap();
        assert!(!criteria.date_range.is_ordered());

        let view = pipeline::compute(&ds, &criteria, &crate::domain::PipelineOptions::default());
        assert_eq!(view.summary.rows, 0);
        assert!(view.daily_totals.as_ref().unwrap().is_empty());
        assert!(view.top_products.as_ref().unwrap().is_empty());
        assert!(view.correlation.as_ref().unwrap().is_all_undefined());
    }

    #[test]
    fn unparseable_date_is_usage_error() {
        let args = FilterArgs {
            to: Some("soon".to_string()),
            ..FilterArgs::default()
        };
        let err = criteria_from_args(&args, &dataset()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().starts_with("--to:"), "{err}");
    }
}
