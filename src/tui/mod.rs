//! Ratatui-based terminal dashboard.
//!
//! The sidebar holds every filter (categories, product, date range, top-N,
//! chart toggles); the main area renders the daily sales chart, the top
//! products bar chart, category shares and the correlation table. Each
//! state change runs [`pipeline::compute`] once and the next frame draws the
//! fresh [`DashboardView`].

use std::collections::BTreeSet;
use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table},
    Terminal,
};

use crate::app::pipeline;
use crate::domain::{
    clamp_top_n, ChartKind, DashboardView, DateRange, FilterCriteria, PipelineOptions, SalesDataset,
};
use crate::error::AppError;
use crate::io::parse_date;
use crate::report::{fmt_amount, fmt_corr, fmt_percent, truncate};

mod plotters_chart;

use plotters_chart::SalesChart;

/// Start the TUI on an already loaded dataset.
pub fn run(dataset: SalesDataset, criteria: FilterCriteria, options: PipelineOptions) -> Result<(), AppError> {
    let mut app = App::new(dataset, criteria, options);

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Which end of the date range is being typed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateField {
    From,
    To,
}

struct App {
    dataset: SalesDataset,
    criteria: FilterCriteria,
    options: PipelineOptions,
    view: DashboardView,
    /// Highlighted row in the category list.
    cursor: usize,
    /// Index into `dataset.products()`; `None` means all products.
    product: Option<usize>,
    editing: Option<DateField>,
    date_input: String,
    status: String,
}

impl App {
    fn new(dataset: SalesDataset, criteria: FilterCriteria, options: PipelineOptions) -> Self {
        let view = pipeline::compute(&dataset, &criteria, &options);
        let product = single_product_index(&criteria, &dataset);
        Self {
            dataset,
            criteria,
            options,
            view,
            cursor: 0,
            product,
            editing: None,
            date_input: String::new(),
            status: "Ready.".to_string(),
        }
    }

    fn recompute(&mut self) {
        self.view = pipeline::compute(&self.dataset, &self.criteria, &self.options);
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press. Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_date_edit(code);
            return false;
        }

        let categories = self.dataset.categories().len();
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.cursor + 1 < categories {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') => {
                let Some(name) = self.dataset.categories().get(self.cursor).cloned() else {
                    return false;
                };
                self.criteria.categories =
                    toggle_category(&self.criteria.categories, self.dataset.categories(), &name);
                self.status = format!("category {name} toggled");
                self.recompute();
            }
            KeyCode::Char('a') => {
                self.criteria.categories = None;
                self.status = "all categories".to_string();
                self.recompute();
            }
            KeyCode::Char('n') => {
                self.criteria.categories = Some(BTreeSet::new());
                self.status = "no categories".to_string();
                self.recompute();
            }
            KeyCode::Char('p') => {
                self.product = next_product(self.product, self.dataset.products().len());
                self.criteria.products = self
                    .product
                    .and_then(|i| self.dataset.products().get(i))
                    .map(|name| BTreeSet::from([name.clone()]));
                self.status = format!("product: {}", self.product_label());
                self.recompute();
            }
            KeyCode::Left | KeyCode::Right => {
                let next = if code == KeyCode::Right {
                    self.options.top_n.saturating_add(1)
                } else {
                    self.options.top_n.saturating_sub(1)
                };
                let next = clamp_top_n(next);
                if next != self.options.top_n {
                    self.options.top_n = next;
                    self.status = format!("top {next} products");
                    self.recompute();
                }
            }
            KeyCode::Char(c @ '1'..='4') => {
                let idx = (c as usize) - ('1' as usize);
                let kind = ChartKind::ALL[idx];
                self.options.charts.toggle(kind);
                let state = if self.options.charts.is_enabled(kind) { "on" } else { "off" };
                self.status = format!("{}: {state}", kind.display_name());
                self.recompute();
            }
            KeyCode::Enter => {
                self.begin_date_edit(DateField::From);
            }
            _ => {}
        }

        false
    }

    fn begin_date_edit(&mut self, field: DateField) {
        let current = match field {
            DateField::From => self.criteria.date_range.start,
            DateField::To => self.criteria.date_range.end,
        };
        self.editing = Some(field);
        self.date_input = current.to_string();
        self.status = "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
    }

    fn handle_date_edit(&mut self, code: KeyCode) {
        let Some(field) = self.editing else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.apply_date_input(field);
                match field {
                    DateField::From => self.begin_date_edit(DateField::To),
                    DateField::To => self.editing = None,
                }
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' || c == '/' {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn apply_date_input(&mut self, field: DateField) {
        let bounds = self.dataset.date_bounds();
        let range = &mut self.criteria.date_range;
        match field {
            DateField::From => {
                range.start = resolve_date_input(&self.date_input, field, bounds.map_or(range.start, |b| b.start), bounds);
            }
            DateField::To => {
                range.end = resolve_date_input(&self.date_input, field, bounds.map_or(range.end, |b| b.end), bounds);
            }
        }
        self.status = format!("dates: {} .. {}", range.start, range.end);
        self.recompute();
    }

    fn product_label(&self) -> String {
        self.product
            .and_then(|i| self.dataset.products().get(i))
            .cloned()
            .unwrap_or_else(|| "all".to_string())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let s = &self.view.summary;
        let dates = match (s.first_date, s.last_date) {
            (Some(first), Some(last)) => format!("{first} .. {last}"),
            _ => "-".to_string(),
        };
        let lines = vec![
            Line::from(vec![
                Span::styled("sales", Style::default().fg(Color::Cyan)),
                Span::raw(" - Sales Dashboard"),
            ]),
            Line::from(Span::styled(
                format!(
                    "rows: {} of {} | revenue: {} | units: {} | products: {} | dates: {dates}",
                    s.rows,
                    self.dataset.len(),
                    fmt_amount(s.total_sales),
                    s.units_sold,
                    s.distinct_products,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(area);

        self.draw_sidebar(frame, columns[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(12)])
            .split(columns[1]);
        self.draw_chart(frame, rows[0]);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(25), Constraint::Percentage(35)])
            .split(rows[1]);
        self.draw_top_products(frame, panels[0]);
        self.draw_shares(frame, panels[1]);
        self.draw_correlation(frame, panels[2]);
    }

    fn draw_sidebar(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(11)])
            .split(area);

        let items: Vec<ListItem> = self
            .dataset
            .categories()
            .iter()
            .map(|c| {
                let mark = if category_selected(&self.criteria.categories, c) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{mark} {}", truncate(c, 22)))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().title("Categories").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ListState::default();
        state.select(Some(self.cursor));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let range = self.criteria.date_range;
        let mut lines = vec![
            Line::from(format!("Product: {}", truncate(&self.product_label(), 20))),
            Line::from(format!("From: {}", range.start)),
            Line::from(format!("To:   {}", range.end)),
            Line::from(format!("Top N: {}", self.options.top_n)),
            Line::from(format!("Window: {}", self.options.rolling_window)),
        ];
        for (i, kind) in ChartKind::ALL.iter().enumerate() {
            let mark = if self.options.charts.is_enabled(*kind) { "x" } else { " " };
            lines.push(Line::from(format!("{} [{mark}] {}", i + 1, kind.display_name())));
        }
        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Filters").borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);

        if let Some(field) = self.editing {
            let label = match field {
                DateField::From => "from",
                DateField::To => "to",
            };
            let hint = Paragraph::new(format!("{label}: {}_", self.date_input))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: chunks[1].x + 1,
                y: chunks[1].y + chunks[1].height.saturating_sub(2),
                width: chunks[1].width.saturating_sub(2),
                height: 1,
            };
            frame.render_widget(Clear, rect);
            frame.render_widget(hint, rect);
        }
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = format!("Daily sales / {}-day rolling average", self.view.rolling_window);
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.view.daily_totals.is_none() {
            frame.render_widget(disabled_hint(ChartKind::TimeSeries), inner);
            return;
        }
        let Some(data) = chart_series(&self.view) else {
            frame.render_widget(empty_hint(), inner);
            return;
        };

        let widget = SalesChart {
            daily: &data.daily,
            rolling: &data.rolling,
            origin: data.origin,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            y_label: "revenue".to_string(),
            fmt_y: fmt_axis_y,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_top_products(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(format!("Top {} products", self.options.top_n))
            .borders(Borders::ALL);
        let Some(top) = &self.view.top_products else {
            frame.render_widget(disabled_hint(ChartKind::TopProducts).block(block), area);
            return;
        };
        if top.is_empty() {
            frame.render_widget(empty_hint().block(block), area);
            return;
        }

        let bars: Vec<Bar> = top
            .iter()
            .map(|p| {
                Bar::default()
                    .value(p.total_sales.max(0.0).round() as u64)
                    .label(Line::from(truncate(&p.product_name, 14)))
                    .text_value(fmt_amount(p.total_sales))
            })
            .collect();
        let chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_shares(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Category share").borders(Borders::ALL);
        let Some(shares) = &self.view.category_shares else {
            frame.render_widget(disabled_hint(ChartKind::CategoryShares).block(block), area);
            return;
        };
        if shares.is_empty() {
            frame.render_widget(empty_hint().block(block), area);
            return;
        }

        let items: Vec<ListItem> = shares
            .iter()
            .map(|c| ListItem::new(format!("{:<14} {:>6}", truncate(&c.category, 14), fmt_percent(c.percent))))
            .collect();
        frame.render_widget(List::new(items).block(block), area);
    }

    fn draw_correlation(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Correlation").borders(Borders::ALL);
        let Some(corr) = &self.view.correlation else {
            frame.render_widget(disabled_hint(ChartKind::Correlation).block(block), area);
            return;
        };

        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain(corr.fields.iter().map(|f| Cell::from(short_label(f.label()))))
                .collect::<Vec<_>>(),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = corr
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let mut cells = vec![Cell::from(short_label(f.label()))];
                cells.extend(corr.values[i].iter().map(|v| Cell::from(fmt_corr(*v))));
                Row::new(cells)
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(8); 4]).header(header).block(block);
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ move  space toggle  a all  n none  p product  Enter dates  ←/→ top-N  1-4 charts  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Flip one category in the selection.
///
/// `None` (filter off) is treated as "every category selected"; a selection
/// that ends up covering all categories collapses back to `None`.
fn toggle_category(
    current: &Option<BTreeSet<String>>,
    all: &[String],
    name: &str,
) -> Option<BTreeSet<String>> {
    let mut selected = current
        .clone()
        .unwrap_or_else(|| all.iter().cloned().collect());
    if !selected.remove(name) {
        selected.insert(name.to_string());
    }

    if all.iter().all(|c| selected.contains(c)) {
        None
    } else {
        Some(selected)
    }
}

fn category_selected(current: &Option<BTreeSet<String>>, name: &str) -> bool {
    current.as_ref().is_none_or(|set| set.contains(name))
}

/// Cycle "all products" -> first product -> ... -> last product -> "all products".
fn next_product(current: Option<usize>, count: usize) -> Option<usize> {
    match current {
        None if count > 0 => Some(0),
        Some(i) if i + 1 < count => Some(i + 1),
        _ => None,
    }
}

fn single_product_index(criteria: &FilterCriteria, dataset: &SalesDataset) -> Option<usize> {
    let set = criteria.products.as_ref()?;
    if set.len() != 1 {
        return None;
    }
    let name = set.iter().next()?;
    dataset.products().iter().position(|p| p == name)
}

/// Turn typed date text into one end of the filter range.
///
/// Unparseable input falls back to `fallback`. A `from` date before the data
/// is moved up to the first day and a `to` date after it down to the last
/// day; a date past the opposite end is kept, so the range empties.
fn resolve_date_input(
    input: &str,
    field: DateField,
    fallback: NaiveDate,
    bounds: Option<DateRange>,
) -> NaiveDate {
    let date = parse_date(input.trim()).unwrap_or(fallback);
    match (bounds, field) {
        (Some(b), DateField::From) => date.max(b.start),
        (Some(b), DateField::To) => date.min(b.end),
        (None, _) => date,
    }
}

struct ChartData {
    origin: NaiveDate,
    daily: Vec<(f64, f64)>,
    rolling: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters (x = days since the first plotted date).
fn chart_series(view: &DashboardView) -> Option<ChartData> {
    let daily = view.daily_totals.as_deref()?;
    let origin = daily.first()?.date;
    let offset = |d: NaiveDate| (d - origin).num_days() as f64;

    let points: Vec<(f64, f64)> = daily.iter().map(|d| (offset(d.date), d.total_sales)).collect();
    let rolling: Vec<(f64, f64)> = view
        .rolling_average
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .filter_map(|p| p.average.map(|avg| (offset(p.date), avg)))
        .collect();

    let x_max = points.last().map_or(0.0, |p| p.0);
    let x_bounds = if x_max > 0.0 { [0.0, x_max] } else { [-1.0, 1.0] };

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in points.iter().chain(&rolling) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        let mid = if y_min.is_finite() { y_min } else { 0.0 };
        y_min = mid - 0.5;
        y_max = mid + 0.5;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    Some(ChartData {
        origin,
        daily: points,
        rolling,
        x_bounds,
        y_bounds: [y_min - pad, y_max + pad],
    })
}

fn disabled_hint(kind: ChartKind) -> Paragraph<'static> {
    let key = ChartKind::ALL.iter().position(|k| *k == kind).map_or(0, |i| i + 1);
    Paragraph::new(format!("{} hidden (press {key})", kind.display_name()))
        .style(Style::default().fg(Color::DarkGray))
}

fn empty_hint() -> Paragraph<'static> {
    Paragraph::new("No sales match the current filters.").style(Style::default().fg(Color::Yellow))
}

fn short_label(label: &str) -> String {
    truncate(label, 8)
}

fn fmt_axis_y(v: f64) -> String {
    format!("{v:.0}")
}
