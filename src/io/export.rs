//! Export dashboard aggregates to JSON or CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Undefined values are written as `null` (JSON) or an empty cell (CSV), never `0`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::domain::{DailyTotal, DashboardView, ExportFormat};
use crate::error::AppError;

/// Write `view` to `path` in the requested format.
pub fn write_export(path: &Path, view: &DashboardView, format: ExportFormat) -> Result<(), AppError> {
    if format == ExportFormat::Csv {
        // Reject before the file is created.
        daily_series(view)?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export file '{}': {e}", path.display())))?;

    match format {
        ExportFormat::Json => write_dashboard_json(file, view)?,
        ExportFormat::Csv => write_daily_csv(file, view)?,
    }

    info!("wrote {format:?} export to {}", path.display());
    Ok(())
}

/// The full dashboard view as pretty-printed JSON.
pub fn write_dashboard_json<W: Write>(out: W, view: &DashboardView) -> Result<(), AppError> {
    serde_json::to_writer_pretty(out, view)
        .map_err(|e| AppError::input(format!("Failed to write export JSON: {e}")))
}

/// One row per day with its total and rolling average.
pub fn write_daily_csv<W: Write>(out: W, view: &DashboardView) -> Result<(), AppError> {
    let daily = daily_series(view)?;
    let rolling = view.rolling_average.as_deref().unwrap_or(&[]);

    let mut writer = csv::Writer::from_writer(out);
    let header = format!("rolling_avg_{}", view.rolling_window);
    writer
        .write_record(["date", "total_sales", header.as_str()])
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for (i, d) in daily.iter().enumerate() {
        let avg = rolling
            .get(i)
            .and_then(|p| p.average)
            .map(|v| format!("{v:.4}"))
            .unwrap_or_default();
        writer
            .write_record([d.date.to_string(), format!("{:.4}", d.total_sales), avg])
            .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush export CSV: {e}")))
}

fn daily_series(view: &DashboardView) -> Result<&[DailyTotal], AppError> {
    view.daily_totals
        .as_deref()
        .ok_or_else(|| AppError::input("CSV export needs the time series, which is disabled for this run."))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::app::pipeline::compute;
    use crate::domain::{FilterCriteria, PipelineOptions, SaleRecord, SalesDataset};

    fn view(days: u32) -> DashboardView {
        let records = (1..=days)
            .map(|d| SaleRecord {
                date_sold: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                category: "A".to_string(),
                product_name: "P".to_string(),
                price: 1.0,
                quantity_sold: d as i64,
                total_sales: d as f64,
            })
            .collect();
        let ds = SalesDataset::from_records(records);
        let options = PipelineOptions {
            rolling_window: 2,
            ..PipelineOptions::default()
        };
        compute(&ds, &FilterCriteria::for_dataset(&ds), &options)
    }

    #[test]
    fn daily_csv_leaves_undefined_cells_empty() {
        let mut buf = Vec::new();
        write_daily_csv(&mut buf, &view(3)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "date,total_sales,rolling_avg_2\n\
             2024-01-01,1.0000,\n\
             2024-01-02,2.0000,1.5000\n\
             2024-01-03,3.0000,2.5000\n"
        );
    }

    #[test]
    fn json_marks_undefined_as_null() {
        let mut buf = Vec::new();
        write_dashboard_json(&mut buf, &view(1)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(value["rolling_average"][0]["average"].is_null());
        assert!(value["correlation"]["values"][0][0].is_null());
        assert_eq!(value["summary"]["rows"], 1);
    }

    #[test]
    fn rejected_csv_export_creates_no_file() {
        let mut v = view(3);
        v.daily_totals = None;
        v.rolling_average = None;
        let path = std::env::temp_dir().join(format!("sales-dash-rejected-{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let err = write_export(&path, &v, ExportFormat::Csv).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(!path.exists());
    }
}
