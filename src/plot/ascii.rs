//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - daily revenue: `o`
//! - rolling average: `-` line (only where defined)
//!
//! The x-axis is calendar days since the first plotted date, so gaps between
//! trading days show up as horizontal gaps.

use chrono::NaiveDate;

use crate::domain::{DailyTotal, RollingPoint};

/// Render daily totals with their rolling average overlaid.
pub fn render_sales_plot(
    daily: &[DailyTotal],
    rolling: &[RollingPoint],
    rolling_window: usize,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some(first), Some(last)) = (daily.first(), daily.last()) else {
        return "Plot: no sales in the selected range\n".to_string();
    };
    let origin = first.date;

    let points: Vec<(f64, f64)> = daily
        .iter()
        .map(|d| (day_offset(origin, d.date), d.total_sales))
        .collect();
    let curve: Vec<(f64, f64)> = rolling
        .iter()
        .filter_map(|p| p.average.map(|avg| (day_offset(origin, p.date), avg)))
        .collect();

    let t_max = day_offset(origin, last.date).max(1.0);
    let (y_min, y_max) = y_range(&points, &curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    draw_curve(&mut grid, &curve, 0.0, t_max, y_min, y_max);

    for &(t, y) in &points {
        let x = map_x(t, 0.0, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        grid[yy][x] = 'o';
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: dates=[{}, {}] | revenue=[{y_min:.2}, {y_max:.2}] | o=daily -=rolling({rolling_window})\n",
        first.date, last.date
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn day_offset(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

fn y_range(points: &[(f64, f64)], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &(_, y) in points.iter().chain(curve) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat series: center it in a unit band.
        Some((min_y - 0.5, max_y + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], t_min: f64, t_max: f64, y_min: f64, y_max: f64) {
    if curve.is_empty() {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in curve {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(n)
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let daily = vec![
            DailyTotal { date: day(0), total_sales: 100.0 },
            DailyTotal { date: day(9), total_sales: 110.0 },
        ];
        let rolling = vec![
            RollingPoint { date: day(0), average: None },
            RollingPoint { date: day(9), average: Some(105.0) },
        ];

        let txt = render_sales_plot(&daily, &rolling, 2, 10, 5);
        let expected = concat!(
            "Plot: dates=[2024-01-01, 2024-01-10] | revenue=[99.50, 110.50] | o=daily -=rolling(2)\n",
            "         o\n",
            "          \n",
            "         -\n",
            "          \n",
            "o         \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_has_placeholder() {
        assert_eq!(render_sales_plot(&[], &[], 7, 40, 10), "Plot: no sales in the selected range\n");
    }

    #[test]
    fn single_day_does_not_panic() {
        let daily = vec![DailyTotal { date: day(3), total_sales: 42.0 }];
        let rolling = vec![RollingPoint { date: day(3), average: None }];
        let txt = render_sales_plot(&daily, &rolling, 7, 20, 6);
        assert_eq!(txt.lines().count(), 7);
        let marks: usize = txt.lines().skip(1).map(|l| l.matches('o').count()).sum();
        assert_eq!(marks, 1);
    }
}
