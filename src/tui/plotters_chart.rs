//! Plotters-powered daily sales chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels (dates on the x-axis)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description; all series and bounds are computed
/// outside the render call.
pub struct SalesChart<'a> {
    /// Daily totals as `(days since origin, revenue)`.
    pub daily: &'a [(f64, f64)],
    /// Defined rolling-average points, same x units as `daily`.
    pub rolling: &'a [(f64, f64)],
    /// Date at x = 0.
    pub origin: NaiveDate,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub y_label: String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for SalesChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let origin = self.origin;
        let fmt_x = move |v: &f64| {
            let day = origin + Duration::days(v.round() as i64);
            day.format("%m-%d").to_string()
        };

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("date")
                .y_desc(&self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&fmt_x)
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let daily_color = RGBColor(0, 255, 255); // cyan
            let rolling_color = RGBColor(255, 165, 0); // orange

            chart.draw_series(LineSeries::new(self.daily.iter().copied(), &daily_color))?;
            // Circle markers render far too large through this backend; pixels stay crisp.
            chart.draw_series(self.daily.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;
            chart.draw_series(LineSeries::new(self.rolling.iter().copied(), &rolling_color))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
