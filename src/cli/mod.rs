//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline and the front-ends. Values are checked here only as far as clap
//! can do it; date strings are parsed later against the loaded dataset.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ExportFormat, TOP_N_MAX, TOP_N_MIN};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sales", version, about = "Sales analytics dashboard (CSV-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print KPIs, top products, category shares, correlations and a plot.
    Summary(SummaryArgs),
    /// Write the filtered aggregates to a JSON or CSV file.
    Export(ExportArgs),
    /// Write a deterministic synthetic sales CSV.
    Sample(SampleArgs),
    /// Launch the interactive dashboard.
    ///
    /// Filters given here are the initial state; everything can be changed
    /// from inside the TUI.
    Tui(FilterArgs),
}

/// Data source and filters shared by every data command.
#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    /// Sales CSV (falls back to `SALES_CSV`, then `sales_data.csv`).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Only keep these categories (repeatable).
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Only keep these products (repeatable).
    #[arg(long = "product", value_name = "NAME")]
    pub products: Vec<String>,

    /// First day to include (never earlier than the dataset's first date).
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Last day to include (never later than the dataset's last date).
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Number of products in the ranking (5-20).
    #[arg(long, value_parser = parse_top_n)]
    pub top: Option<usize>,

    /// Rolling-average window in days of data.
    #[arg(long, value_parser = parse_window)]
    pub window: Option<usize>,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Skip the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output file.
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output CSV.
    #[arg(long, value_name = "PATH", default_value = "sales_data.csv")]
    pub out: PathBuf,

    /// Number of sales rows.
    #[arg(long, default_value_t = 1000)]
    pub rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First sale date.
    #[arg(long, value_name = "DATE", default_value = "2024-01-01")]
    pub start: String,

    /// Number of calendar days covered.
    #[arg(long, default_value_t = 90)]
    pub days: u32,
}

fn parse_top_n(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if (TOP_N_MIN..=TOP_N_MAX).contains(&n) {
        Ok(n)
    } else {
        Err(format!("must be between {TOP_N_MIN} and {TOP_N_MAX}"))
    }
}

fn parse_window(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(w) => Ok(w),
        Err(_) => Err(format!("'{s}' is not a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_flags_parse() {
        let cli = Cli::try_parse_from([
            "sales", "summary", "-f", "data.csv", "--category", "A", "--category", "B", "--top", "5",
            "--no-plot",
        ])
        .unwrap();
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.filters.file, Some(PathBuf::from("data.csv")));
        assert_eq!(args.filters.categories, ["A", "B"]);
        assert_eq!(args.filters.top, Some(5));
        assert!(args.no_plot);
    }

    #[test]
    fn top_outside_range_is_rejected() {
        assert!(Cli::try_parse_from(["sales", "summary", "--top", "4"]).is_err());
        assert!(Cli::try_parse_from(["sales", "summary", "--top", "21"]).is_err());
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(Cli::try_parse_from(["sales", "tui", "--window", "0"]).is_err());
    }

    #[test]
    fn export_format_defaults_to_json() {
        let cli = Cli::try_parse_from(["sales", "export", "--out", "x.json"]).unwrap();
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.format, ExportFormat::Json);
    }
}
