//! Ratatui-based terminal UI.
//!
//! The screen has a tab bar, a body, and a footer. The `Charts` tab shows the
//! institution filter on the left and the chart grid on the right; moving the
//! mouse over a plot shows a crosshair and a tooltip with the nearest
//! observation of every answer.

use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

use crate::app::pipeline::{Session, build_filter};
use crate::app::state::AppState;
use chrono::NaiveDate;

use crate::chart::{ChartSpec, Hover, Rgb, X_TICK_FORMAT, day_number};
use crate::domain::ViewConfig;
use crate::error::AppError;
use crate::filter::{FilterPanel, SelectionChanged};
use crate::io::ingest::{LoadReport, RowIssue};
use crate::layout::LayoutController;
use crate::tabs::{TabController, TabView};

mod plotters_chart;

use plotters_chart::ApprovalChart;

/// Charts shorter than this (in rows, border included) trigger grid scrolling.
const MIN_CHART_HEIGHT: u16 = 12;
const FILTER_WIDTH: u16 = 28;

/// Start the TUI.
pub fn run(session: Session, config: &ViewConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::render(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(session, &config.initial_selection);
    info!("tui started");
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen, mouse capture) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::render(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(AppError::render(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    }
}

/// Plot rect of a chart as last drawn, used for pointer hit-testing.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    chart: usize,
    rect: Rect,
}

/// Active crosshair + tooltip.
#[derive(Debug, Clone)]
struct HoverTarget {
    chart: usize,
    pointer: Position,
    hover: Hover,
}

struct App {
    state: AppState,
    report: LoadReport,
    filter: FilterPanel,
    selection_rx: Receiver<SelectionChanged>,
    layout: LayoutController,
    tabs: TabController,
    scroll_row: usize,
    hover: Option<HoverTarget>,
    plot_areas: Vec<PlotArea>,
    filter_area: Option<Rect>,
    filter_offset: usize,
    status: String,
}

impl App {
    fn new(session: Session, initial_selection: &[String]) -> Self {
        let Session { state, report } = session;

        let mut filter = build_filter(&state, initial_selection);
        let selection_rx = filter.subscribe();

        let mut layout = LayoutController::new();
        layout.apply(&state, &filter.selection());

        let tabs = TabController::standard();
        filter.set_visible(tabs.filter_visible());

        let status = crate::report::format_load_line(&report);
        Self {
            state,
            report,
            filter,
            selection_rx,
            layout,
            tabs,
            scroll_row: 0,
            hover: None,
            plot_areas: Vec::new(),
            filter_area: None,
            filter_offset: 0,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::render(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::render(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::render(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    needs_redraw = self.handle_mouse(mouse);
                }
                Event::Resize(_, _) => {
                    self.hover = None;
                    needs_redraw = true;
                }
                _ => {}
            }
            self.apply_selection_events();
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => {
                self.tabs.next();
                self.sync_tab();
            }
            KeyCode::BackTab => {
                self.tabs.prev();
                self.sync_tab();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if self.tabs.activate_index(index) {
                    self.sync_tab();
                }
            }
            KeyCode::Up if self.filter.is_visible() => self.filter.move_cursor(-1),
            KeyCode::Down if self.filter.is_visible() => self.filter.move_cursor(1),
            KeyCode::Char(' ') | KeyCode::Enter if self.filter.is_visible() => {
                self.filter.toggle_at_cursor();
            }
            KeyCode::Char('c') if self.filter.is_visible() => self.filter.clear(),
            KeyCode::PageDown => {
                self.scroll_row = self.scroll_row.saturating_add(1);
                self.hover = None;
            }
            KeyCode::PageUp => {
                self.scroll_row = self.scroll_row.saturating_sub(1);
                self.hover = None;
            }
            _ => {}
        }
        false
    }

    /// Returns `true` when the screen needs a redraw.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        let pointer = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let next = self.hover_at(pointer);
                let changed = match (&self.hover, &next) {
                    (None, None) => false,
                    (Some(a), Some(b)) => a.chart != b.chart || a.pointer != b.pointer,
                    _ => true,
                };
                self.hover = next;
                changed
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(area) = self.filter_area else {
                    return false;
                };
                if !self.filter.is_visible() || !area.contains(pointer) {
                    return false;
                }
                let index = self.filter_offset + (pointer.y - area.y) as usize;
                self.filter.toggle(index)
            }
            MouseEventKind::ScrollDown => {
                self.scroll_row = self.scroll_row.saturating_add(1);
                self.hover = None;
                true
            }
            MouseEventKind::ScrollUp => {
                self.scroll_row = self.scroll_row.saturating_sub(1);
                self.hover = None;
                true
            }
            _ => false,
        }
    }

    fn hover_at(&self, pointer: Position) -> Option<HoverTarget> {
        if self.tabs.active_view() != Some(TabView::Charts) {
            return None;
        }
        let area = self.plot_areas.iter().find(|a| a.rect.contains(pointer))?;
        let chart = self.layout.view().charts.get(area.chart)?;
        let px = (pointer.x - area.rect.x) as f64;
        let range = (0.0, area.rect.width.saturating_sub(1) as f64);
        let hover = chart.hover_at(px, range)?;
        Some(HoverTarget {
            chart: area.chart,
            pointer,
            hover,
        })
    }

    /// Re-render the grid once per published selection change.
    fn apply_selection_events(&mut self) {
        while let Ok(event) = self.selection_rx.try_recv() {
            let view = self.layout.apply(&self.state, &event.selected);
            debug!("selection changed: {:?}", event.selected);
            self.status = if event.selected.is_empty() {
                format!("showing all {} institutions", view.charts.len())
            } else {
                format!("showing {} selected", view.charts.len())
            };
            self.scroll_row = 0;
            self.hover = None;
        }
    }

    fn sync_tab(&mut self) {
        self.filter.set_visible(self.tabs.filter_visible());
        self.hover = None;
        if let Some(tab) = self.tabs.active() {
            self.status = format!("tab: {}", tab.title);
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.plot_areas.clear();
        self.filter_area = None;

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
        self.draw_tooltip(frame, size);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<Line> = self
            .tabs
            .tabs()
            .iter()
            .enumerate()
            .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.title)))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tabs.active_index())
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled("approval", Style::default().fg(Color::Cyan))),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_body(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let content = if self.filter.is_visible() {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(FILTER_WIDTH), Constraint::Min(0)])
                .split(area);
            self.draw_filter(frame, chunks[0]);
            chunks[1]
        } else {
            area
        };

        match self.tabs.active_view() {
            Some(TabView::Charts) => self.draw_grid(frame, content),
            Some(TabView::Data) => self.draw_data(frame, content),
            Some(TabView::About) => self.draw_about(frame, content),
            None => {}
        }
    }

    fn draw_filter(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .filter
            .toggles()
            .iter()
            .map(|t| {
                let mark = if t.checked { "[x]" } else { "[ ]" };
                ListItem::new(format!("{mark} {}", t.institution))
            })
            .collect();

        let block = Block::default().title("Filter").borders(Borders::ALL);
        self.filter_area = Some(block.inner(area));

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.filter.cursor()));
        frame.render_stateful_widget(list, area, &mut state);
        self.filter_offset = state.offset();
    }

    fn draw_grid(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let view = self.layout.view().clone();
        if view.charts.is_empty() {
            frame.render_widget(
                Paragraph::new("No institutions to show.")
                    .style(Style::default().fg(Color::Yellow))
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
            return;
        }

        let total_rows = view.rows();
        let visible_rows = ((area.height / MIN_CHART_HEIGHT).max(1) as usize).min(total_rows);
        self.scroll_row = self.scroll_row.min(total_rows - visible_rows);

        let row_rects = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, visible_rows as u32); visible_rows])
            .split(area);

        for (slot, row_rect) in row_rects.iter().enumerate() {
            let row = self.scroll_row + slot;
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, view.columns as u32); view.columns])
                .split(*row_rect);
            for (col, chart) in view.row(row).iter().enumerate() {
                let index = row * view.columns + col;
                self.draw_chart_cell(frame, cells[col], index, chart);
            }
        }

        if total_rows > visible_rows {
            self.status = format!(
                "rows {}-{} of {} (PgUp/PgDn)",
                self.scroll_row + 1,
                self.scroll_row + visible_rows,
                total_rows
            );
        }
    }

    fn draw_chart_cell(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect, index: usize, chart: &ChartSpec) {
        let block = Block::default()
            .title(Line::from(chart.title.clone()).alignment(Alignment::Center))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if inner.height == 0 {
            return;
        }
        frame.render_widget(Paragraph::new(legend(chart)), Rect { height: 1, ..inner });

        let body = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
        let Some((plot, insets)) = chart_layout(body) else {
            frame.render_widget(
                Paragraph::new("resize for chart").style(Style::default().fg(Color::Yellow)),
                body,
            );
            return;
        };

        // Grid lines and tick labels share these.
        let x_ticks = x_axis_ticks(chart, plot);
        let y_ticks = chart
            .y_scale((0.0, 1.0))
            .ticks((plot.height as usize / 3).max(2));
        let crosshair = self
            .hover
            .as_ref()
            .filter(|h| h.chart == index)
            .map(|h| day_number(h.hover.date));

        frame.render_widget(
            ApprovalChart {
                spec: chart,
                crosshair,
                x_ticks: &x_ticks,
                y_ticks: &y_ticks,
            },
            plot,
        );
        draw_axis_ticks(frame, body, plot, insets, chart, &x_ticks, &y_ticks);

        if chart.is_empty() {
            let hint = Paragraph::new("no observations")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(hint, Rect { y: plot.y + plot.height / 2, height: 1, ..plot });
        }

        self.plot_areas.push(PlotArea { chart: index, rect: plot });
    }

    fn draw_tooltip(&self, frame: &mut ratatui::Frame<'_>, screen: Rect) {
        let Some(target) = &self.hover else { return };
        if target.hover.entries.is_empty() {
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        for (i, entry) in target.hover.entries.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            lines.push(Line::from(Span::styled(
                entry.answer.clone(),
                Style::default().fg(term_color(entry.color)).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("Date: {}", entry.date_label())));
            lines.push(Line::from(format!("Value: {}", entry.value_label())));
        }

        let width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16 + 4;
        let height = lines.len() as u16 + 2;
        let rect = tooltip_rect(target.pointer, width, height, screen);

        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL)),
            rect,
        );
    }

    fn draw_data(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = vec![
            Line::from(vec![
                Span::styled("source: ", Style::default().fg(Color::Gray)),
                Span::raw(self.report.source.clone()),
            ]),
            Line::from(Span::styled(
                crate::report::format_load_line(&self.report),
                Style::default().fg(Color::Gray),
            )),
            Line::default(),
        ];

        for s in crate::report::summarize_institutions(&self.state) {
            let range = match (s.first, s.last) {
                (Some(a), Some(b)) => format!("{a} .. {b}"),
                _ => "-".to_string(),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:<28}", s.institution), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!(" {:>6} rows  {range}  ", s.rows)),
                Span::styled(s.answers.join(" / "), Style::default().fg(Color::Gray)),
            ]));
        }

        if !self.report.row_errors.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "Malformed rows",
                Style::default().fg(Color::Yellow),
            )));
            for e in &self.report.row_errors {
                let tag = match e.issue {
                    RowIssue::Excluded => "excluded",
                    RowIssue::Degraded => "degraded",
                };
                lines.push(Line::from(format!("line {:>5} [{tag}] {}", e.line, e.message)));
            }
        }

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Dataset").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_about(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from("Approve / disapprove trend lines with confidence bands, one chart per institution."),
            Line::default(),
            Line::from("Charts tab"),
            Line::from("  ↑/↓ move   Space/Enter toggle   c clear   click a name to toggle"),
            Line::from("  nothing selected shows every institution; at most 2 charts per row"),
            Line::from("  move the mouse over a chart for the crosshair and tooltip"),
            Line::from("  PgUp/PgDn or the wheel scroll rows"),
            Line::default(),
            Line::from("Tab/Shift-Tab or 1-9 switch tabs, q quits."),
        ];
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(Block::default().title("About").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab switch  ↑/↓ move  Space toggle  c clear  PgUp/PgDn scroll  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn legend(chart: &ChartSpec) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, s) in chart.series.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled("━ ", Style::default().fg(term_color(s.color))));
        spans.push(Span::raw(s.answer.clone()));
    }
    Line::from(spans).alignment(Alignment::Center)
}

fn term_color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// Place a `width`×`height` popup right of and above the pointer, kept on screen.
fn tooltip_rect(pointer: Position, width: u16, height: u16, screen: Rect) -> Rect {
    let width = width.min(screen.width);
    let height = height.min(screen.height);
    let mut x = pointer.x.saturating_add(2);
    if x + width > screen.x + screen.width {
        x = pointer.x.saturating_sub(width + 1).max(screen.x);
    }
    let y = pointer
        .y
        .saturating_sub(2)
        .max(screen.y)
        .min((screen.y + screen.height).saturating_sub(height));
    Rect { x, y, width, height }
}

/// Room for one "%b %Y" label plus a gap.
const X_LABEL_SLOT: u16 = 10;

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    bottom: u16,
}

/// Split a chart body into the plot rect plus room for tick labels.
fn chart_layout(body: Rect) -> Option<(Rect, AxisInsets)> {
    let insets = AxisInsets { left: 5, bottom: 1 };
    if body.width <= insets.left + 10 || body.height <= insets.bottom + 3 {
        return None;
    }
    let rect = Rect {
        x: body.x + insets.left,
        y: body.y,
        width: body.width - insets.left - 1,
        height: body.height - insets.bottom,
    };
    Some((rect, insets))
}

fn plot_x_range(plot: Rect) -> (f64, f64) {
    (plot.x as f64, (plot.x + plot.width.saturating_sub(1)) as f64)
}

/// Calendar ticks for a plot: as many as fit side by side as labels.
fn x_axis_ticks(chart: &ChartSpec, plot: Rect) -> Vec<NaiveDate> {
    let count = (plot.width / X_LABEL_SLOT).max(1) as usize;
    chart.time_scale(plot_x_range(plot)).ticks(count)
}

/// One `(column, text)` label per tick, centred under it and kept inside `body`.
fn x_tick_labels(chart: &ChartSpec, plot: Rect, body: Rect, ticks: &[NaiveDate]) -> Vec<(u16, String)> {
    let x_scale = chart.time_scale(plot_x_range(plot));
    let right = body.x + body.width;
    let mut next_free = body.x;
    let mut out = Vec::with_capacity(ticks.len());
    for &date in ticks {
        let label = date.format(X_TICK_FORMAT).to_string();
        let len = label.chars().count() as u16;
        let center = x_scale.scale(date).round() as u16;
        let start = center
            .saturating_sub(len / 2)
            .max(next_free)
            .min(right.saturating_sub(len));
        next_free = start + len + 1;
        out.push((start, label));
    }
    out
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    body: Rect,
    plot: Rect,
    insets: AxisInsets,
    chart: &ChartSpec,
    x_ticks: &[NaiveDate],
    y_ticks: &[f64],
) {
    let style = Style::default().fg(Color::Gray);

    let y = plot.y + plot.height;
    if y < body.y + body.height {
        for (x, label) in x_tick_labels(chart, plot, body, x_ticks) {
            let width = label.chars().count() as u16;
            frame.render_widget(Paragraph::new(label).style(style), Rect { x, y, width, height: 1 });
        }
    }

    // Y labels, right-aligned against the plot.
    let y_scale = chart.y_scale(((plot.y + plot.height - 1) as f64, plot.y as f64));
    for &v in y_ticks {
        let row = y_scale.scale(v).round();
        if !(row >= plot.y as f64 && row < (plot.y + plot.height) as f64) {
            continue;
        }
        let label = format!("{v:.0}");
        let len = (label.len() as u16).min(insets.left - 1);
        let x = plot.x.saturating_sub(len + 1);
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect { x, y: row as u16, width: len, height: 1 },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::session_from_report;
    use crate::io::ingest::parse_csv;
    use ratatui::backend::TestBackend;

    const CSV: &str = "politician/institution,date,answer,pct_estimate,lo,hi
Joe Biden,2024-01-01,Approve,40,38,42
Joe Biden,2024-03-01,Approve,41,39,43
Joe Biden,2024-01-01,Disapprove,55,53,57
Joe Biden,2024-03-01,Disapprove,54,52,56
Congress,2024-01-01,Approve,20,18,22
Congress,2024-03-01,Approve,21,19,23
Supreme Court,2024-01-01,Approve,45,42,48
";

    fn app(selection: &[&str]) -> App {
        let session = session_from_report(parse_csv(CSV.as_bytes(), "test").unwrap());
        let selection: Vec<String> = selection.iter().map(|s| s.to_string()).collect();
        App::new(session, &selection)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn initial_selection_drives_the_first_layout() {
        let app = app(&["Congress"]);
        assert_eq!(app.layout.view().columns, 1);
        assert_eq!(app.layout.view().charts[0].title, "Congress");
    }

    #[test]
    fn toggle_events_rebuild_the_grid() {
        let mut app = app(&[]);
        assert_eq!(app.layout.view().charts.len(), 3);

        app.filter.toggle(2);
        app.apply_selection_events();
        assert_eq!(app.layout.view().columns, 1);
        let before = app.layout.view().charts[0].clone();

        app.filter.toggle(0);
        app.apply_selection_events();
        assert_eq!(app.layout.view().charts.len(), 2);
        assert_eq!(app.layout.view().charts[0].title, "Joe Biden");

        app.filter.toggle(2);
        app.apply_selection_events();
        app.filter.toggle(2);
        app.apply_selection_events();
        let titles: Vec<_> = app.layout.view().charts.iter().map(|c| c.title.clone()).collect();
        assert_eq!(titles, vec!["Joe Biden", "Supreme Court"]);
        assert_eq!(app.layout.view().charts[1], before);
    }

    #[test]
    fn tabs_gate_the_filter_panel() {
        let mut app = app(&[]);
        assert!(app.filter.is_visible());
        app.handle_key(KeyCode::Tab);
        assert!(app.tabs.is_visible("data"));
        assert!(!app.filter.is_visible());
        app.handle_key(KeyCode::Char('1'));
        assert!(app.filter.is_visible());
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn draws_every_tab() {
        let mut app = app(&[]);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal.draw(|f| app.draw(f)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Joe Biden"));
        assert!(text.contains("[ ] Congress"));
        assert_eq!(app.plot_areas.len(), 3);

        app.handle_key(KeyCode::Tab);
        terminal.draw(|f| app.draw(f)).unwrap();
        assert!(screen_text(&terminal).contains("Dataset"));

        app.handle_key(KeyCode::Tab);
        terminal.draw(|f| app.draw(f)).unwrap();
        assert!(screen_text(&terminal).contains("Tab/Shift-Tab"));
    }

    #[test]
    fn pointer_inside_a_plot_shows_a_tooltip_and_leaving_hides_it() {
        let mut app = app(&["Joe Biden"]);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let plot = app.plot_areas[0].rect;
        let inside = MouseEvent {
            kind: MouseEventKind::Moved,
            column: plot.x,
            row: plot.y + 1,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        assert!(app.handle_mouse(inside));
        let hover = app.hover.clone().unwrap();
        assert_eq!(hover.hover.entries.len(), 2);
        assert_eq!(hover.hover.entries[0].date_label(), "Jan 01, 2024");

        terminal.draw(|f| app.draw(f)).unwrap();
        assert!(screen_text(&terminal).contains("Value: 40.0%"));

        let outside = MouseEvent { column: 0, row: 0, ..inside };
        assert!(app.handle_mouse(outside));
        assert!(app.hover.is_none());
    }

    #[test]
    fn pointer_is_ignored_outside_chart_views() {
        let mut app = app(&["Joe Biden"]);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let plot = app.plot_areas[0].rect;

        app.handle_key(KeyCode::Char('2'));
        assert_eq!(app.tabs.active_view(), Some(TabView::Data));
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            column: plot.x + 1,
            row: plot.y + 1,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        app.handle_mouse(moved);
        assert!(app.hover.is_none());
    }

    #[test]
    fn clicking_a_filter_row_toggles_it() {
        let mut app = app(&[]);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let area = app.filter_area.unwrap();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: area.x + 1,
            row: area.y + 1,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        assert!(app.handle_mouse(click));
        app.apply_selection_events();
        assert_eq!(app.filter.selection(), vec!["Congress"]);
        assert_eq!(app.layout.view().charts.len(), 1);
    }

    #[test]
    fn every_grid_tick_gets_a_label() {
        let mut csv = String::from("politician/institution,date,answer,pct_estimate,lo,hi\n");
        for year in [2023, 2024] {
            for month in 1..=12 {
                csv.push_str(&format!("Congress,{year}-{month:02}-01,Approve,20,18,22\n"));
            }
        }
        let session = session_from_report(parse_csv(csv.as_bytes(), "test").unwrap());
        let chart = session.state.chart("Congress");

        let body = Rect::new(10, 5, 51, 12);
        let (plot, _) = chart_layout(body).unwrap();
        assert_eq!(plot.width, 45);

        let ticks = x_axis_ticks(&chart, plot);
        let d = |y, m| NaiveDate::from_ymd_opt(y, m, 1).unwrap();
        assert_eq!(ticks, vec![d(2023, 1), d(2023, 7), d(2024, 1), d(2024, 7)]);

        let labels = x_tick_labels(&chart, plot, body, &ticks);
        let texts: Vec<_> = labels.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["Jan 2023", "Jul 2023", "Jan 2024", "Jul 2024"]);
        for pair in labels.windows(2) {
            assert!(pair[0].0 + 8 < pair[1].0);
        }
        let (last_x, last) = labels.last().unwrap();
        assert!(last_x + last.len() as u16 <= body.x + body.width);
    }

    #[test]
    fn tooltip_stays_on_screen() {
        let screen = Rect::new(0, 0, 80, 24);
        let r = tooltip_rect(Position::new(78, 0), 20, 8, screen);
        assert!(r.x + r.width <= 80);
        assert_eq!(r.y, 0);
        let r = tooltip_rect(Position::new(10, 23), 20, 8, screen);
        assert!(r.y + r.height <= 24);
        assert_eq!(r.x, 12);
    }
}
