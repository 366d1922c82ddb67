//! Ratatui-based dashboard.
//!
//! One tab per view. Mounting a view issues fresh fetches for its resources;
//! results arrive over the loader channel and are drained on every tick.
//! Leaving a view drops its session, so late results for it are discarded.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
};

use crate::app::pipeline::{ViewOutput, shape_states};
use crate::chart::{Binding, PlotModel, bind};
use crate::data::{Fetch, Loader, ResourceSlot, fetcher_for};
use crate::data::loader::Delivery;
use crate::domain::{BucketWidth, DashConfig};
use crate::error::AppError;
use crate::views::{ViewKind, ViewSpec, spec_for};

mod heatmap;
mod plotters_chart;

use heatmap::HeatGridWidget;
use plotters_chart::DashPlottersChart;

const RECOVERY_STEP_DAYS: f64 = 5.0;
const DEPTH_STEP_PCT: f64 = 1.0;

/// Start the dashboard on `start`.
pub fn run(config: DashConfig, start: ViewKind) -> Result<(), AppError> {
    let fetcher: Arc<dyn Fetch> = Arc::from(fetcher_for(&config.source)?);
    tracing::info!(source = %fetcher.describe(), view = start.path(), "starting dashboard");

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, fetcher, start);
    app.event_loop(&mut terminal)
}

/// Owns raw mode and the alternate screen (no scrollback) for its lifetime.
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

/// State of the mounted view. Replaced wholesale on navigation.
struct ViewSession {
    spec: ViewSpec,
    primary: ResourceSlot,
    secondary: Option<ResourceSlot>,
    output: ViewOutput,
    binding: Binding,
    /// Highlighted heat cell `(row, column)`.
    cursor: (usize, usize),
}

impl ViewSession {
    fn mount(kind: ViewKind, loader: &mut Loader, config: &DashConfig) -> Self {
        let spec = spec_for(kind);
        let mut primary = ResourceSlot::new(spec.primary);
        let mut secondary = spec.secondary.map(ResourceSlot::new);

        primary.begin(loader);
        if let Some(slot) = secondary.as_mut() {
            slot.begin(loader);
        }

        let output = shape_states(&spec, primary.state(), secondary.as_ref().map(|s| s.state()), &config.shape);
        let binding = bind(&output.shaped, &spec.chart, &config.shape);
        Self {
            spec,
            primary,
            secondary,
            output,
            binding,
            cursor: (0, 0),
        }
    }

    fn reshape(&mut self, config: &DashConfig) {
        self.output = shape_states(
            &self.spec,
            self.primary.state(),
            self.secondary.as_ref().map(|s| s.state()),
            &config.shape,
        );
        self.rebind(config);
    }

    fn rebind(&mut self, config: &DashConfig) {
        self.binding = bind(&self.output.shaped, &self.spec.chart, &config.shape);
        if let Binding::Heat(model) = &self.binding {
            let rows = model.rows.len().max(1);
            let cols = model.column_labels.len().max(1);
            self.cursor = (self.cursor.0.min(rows - 1), self.cursor.1.min(cols - 1));
        }
    }

    fn reload(&mut self, loader: &mut Loader) {
        self.primary.begin(loader);
        if let Some(slot) = self.secondary.as_mut() {
            slot.begin(loader);
        }
    }

    /// Route a delivery to its slot; the slot drops it unless the ticket is current.
    fn accept(&mut self, delivery: Delivery) -> bool {
        let Delivery { ticket, resource, loaded } = delivery;
        if self.primary.resource() == resource {
            return self.primary.accept(ticket, loaded);
        }
        match self.secondary.as_mut() {
            Some(slot) if slot.resource() == resource => slot.accept(ticket, loaded),
            _ => false,
        }
    }

    fn is_loading(&self) -> bool {
        self.primary.state().is_pending()
    }
}

struct App {
    config: DashConfig,
    loader: Loader,
    session: ViewSession,
    status: String,
}

impl App {
    fn new(config: DashConfig, fetcher: Arc<dyn Fetch>, start: ViewKind) -> Self {
        let mut loader = Loader::new(fetcher);
        let session = ViewSession::mount(start, &mut loader, &config);
        Self {
            status: format!("source: {}", loader.fetcher().describe()),
            config,
            loader,
            session,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.pump() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
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

    /// Apply every delivery that has arrived; `true` when the view changed.
    fn pump(&mut self) -> bool {
        let mut changed = false;
        for delivery in self.loader.drain() {
            changed |= self.apply(delivery);
        }
        changed
    }

    fn apply(&mut self, delivery: Delivery) -> bool {
        let resource = delivery.resource.clone();
        if !self.session.accept(delivery) {
            return false;
        }
        self.session.reshape(&self.config);
        self.status = match self.session.output.messages().first() {
            Some(msg) => msg.clone(),
            None => format!("loaded {resource}"),
        };
        true
    }

    fn navigate(&mut self, kind: ViewKind) {
        tracing::info!(view = kind.path(), "navigate");
        self.session = ViewSession::mount(kind, &mut self.loader, &self.config);
        self.status = format!("{} ({})", self.session.spec.title, kind.path());
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        let kind = self.session.spec.kind;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Right | KeyCode::Tab => self.navigate(kind.next()),
            KeyCode::Left | KeyCode::BackTab => self.navigate(kind.prev()),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if let Some(target) = ViewKind::ALL.get(idx) {
                    self.navigate(*target);
                }
            }
            KeyCode::Char('r') => {
                self.session.reload(&mut self.loader);
                self.session.reshape(&self.config);
                self.status = "reloading…".to_string();
            }
            KeyCode::Char('b') => self.toggle_benchmark(),
            KeyCode::Char('[') => self.adjust_bucket(-1.0),
            KeyCode::Char(']') => self.adjust_bucket(1.0),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Char('l') => self.move_cursor(0, 1),
            _ => {}
        }
        false
    }

    fn toggle_benchmark(&mut self) {
        if self.session.spec.secondary.is_none() {
            self.status = "no benchmark for this view".to_string();
            return;
        }
        self.config.shape.show_benchmark = !self.config.shape.show_benchmark;
        self.session.rebind(&self.config);
        self.status = format!(
            "benchmark: {}",
            if self.config.shape.show_benchmark { "on" } else { "off" }
        );
    }

    fn adjust_bucket(&mut self, dir: f64) {
        let shape = &mut self.config.shape;
        let (target, step, unit) = match self.session.spec.kind {
            ViewKind::Recovery => (&mut shape.recovery_bucket, RECOVERY_STEP_DAYS, "d"),
            ViewKind::RecoveryDepth => (&mut shape.depth_bucket, DEPTH_STEP_PCT, "%"),
            _ => {
                self.status = "no bucket width for this view".to_string();
                return;
            }
        };
        let next = (target.get() + dir * step).max(step);
        if let Some(width) = BucketWidth::new(next) {
            *target = width;
            self.status = format!("bucket width: {next}{unit}");
        }
        self.session.reshape(&self.config);
    }

    fn move_cursor(&mut self, dr: isize, dc: isize) {
        let Binding::Heat(model) = &self.session.binding else {
            return;
        };
        if model.rows.is_empty() {
            return;
        }
        let rows = model.rows.len() as isize;
        let cols = model.column_labels.len().max(1) as isize;
        let (r, c) = self.session.cursor;
        let r = (r as isize + dr).clamp(0, rows - 1) as usize;
        let c = (c as isize + dc).clamp(0, cols - 1) as usize;
        self.session.cursor = (r, c);
        if let Some(cell) = model.rows.get(r).and_then(|(_, cells)| cells.get(c)) {
            self.status = cell.caption.clone();
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
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
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let titles: Vec<Line> = ViewKind::ALL
            .iter()
            .enumerate()
            .map(|(i, k)| Line::from(format!("{} {}", i + 1, k.display_name())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.session.spec.kind.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .divider("|");
        frame.render_widget(tabs, rows[0]);

        let shape = &self.config.shape;
        let info = format!(
            "{} | recovery bucket: {}d | depth bucket: {}% | heat: ±{} | benchmark: {}",
            self.session.spec.kind.path(),
            shape.recovery_bucket.get(),
            shape.depth_bucket.get(),
            crate::views::AxisFormat::Percent0.format(shape.heat_max),
            if shape.show_benchmark { "on" } else { "off" },
        );
        frame.render_widget(
            Paragraph::new(Span::styled(info, Style::default().fg(Color::DarkGray))),
            rows[1],
        );
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let session = &self.session;
        let block = Block::default().title(session.spec.title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if session.is_loading() {
            let msg = Paragraph::new("Loading…").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let mut notes: Vec<Line> = session
            .output
            .messages()
            .into_iter()
            .map(|m| Line::from(Span::styled(m, Style::default().fg(Color::Red))))
            .collect();
        if session.secondary.as_ref().is_some_and(|s| s.state().is_pending()) && self.config.shape.show_benchmark {
            notes.push(Line::from(Span::styled(
                "Loading benchmark…",
                Style::default().fg(Color::Yellow),
            )));
        }
        if session.output.shaped.is_empty() {
            notes.push(Line::from(Span::styled("No data.", Style::default().fg(Color::Gray))));
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(notes.len() as u16), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(Paragraph::new(Text::from(notes)), chunks[0]);

        if session.output.shaped.is_empty() {
            return;
        }

        match &session.binding {
            Binding::Plot(model) => draw_plot(frame, chunks[1], model),
            Binding::Heat(model) => {
                let widget = HeatGridWidget {
                    model,
                    selected: Some(session.cursor),
                };
                frame.render_widget(widget, chunks[1]);
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ view  1-9 jump  b benchmark  r reload  [/] bucket  hjkl cell  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_plot(frame: &mut ratatui::Frame<'_>, area: Rect, model: &PlotModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let (chart_rect, insets) = chart_layout(chunks[0]);
    frame.render_widget(DashPlottersChart { model }, chart_rect);
    if let Some(insets) = insets {
        draw_axis_ticks(frame, chunks[0], chart_rect, insets, model);
    }

    let mut spans: Vec<Span> = Vec::new();
    for (label, c) in &model.legend {
        spans.push(Span::styled("■ ", Style::default().fg(Color::Rgb(c.0, c.1, c.2))));
        spans.push(Span::raw(format!("{label}  ")));
    }
    if let Some(m) = &model.marker {
        spans.push(Span::styled(
            format!("✕ {}", m.label),
            Style::default().fg(Color::Rgb(m.color.0, m.color.1, m.color.2)),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 10,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(frame: &mut ratatui::Frame<'_>, inner: Rect, chart: Rect, insets: AxisInsets, model: &PlotModel) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);
    let [x0, x1] = model.x_bounds;
    let [y0, y1] = model.y_bounds;

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let label = model.x_axis.format(x0 + u * (x1 - x0));
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label_len = label.chars().count() as u16;
        let start = x.saturating_sub(label_len / 2).max(inner.x);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 || label.is_empty() {
            continue;
        }
        let width = label_len.min(inner.x + inner.width - start);
        frame.render_widget(Paragraph::new(label).style(style), Rect { x: start, y, width, height: 1 });
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let label = model.y_format.format(y0 + u * (y1 - y0));
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label_len = label.chars().count() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(Paragraph::new(label).style(style), Rect { x: start, y, width: label_len, height: 1 });
    }

    let x_label = Paragraph::new(model.x_label.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(model.y_label.as_str())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
