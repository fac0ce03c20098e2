//! Main application state and TUI event loop for the dashboard.
//!
//! [`App`] owns the theme, the active page, the selected date range and the
//! last snapshot received from the runtime. Key presses that change the range
//! are published on a `watch` channel; snapshots flow back on an `mpsc` one.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dashboard_core::time_utils::shift_months;
use dashboard_data::analysis::DashboardSnapshot;
use dashboard_data::filter::DateRange;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::{mpsc, watch};

use crate::components::header::Header;
use crate::pages::{self, Page};
use crate::themes::Theme;

// ── Action ────────────────────────────────────────────────────────────────────

/// Outcome of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// The selected range changed and a new snapshot is needed.
    Recompute(DateRange),
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub page: Page,
    /// How many entries each ranking shows.
    pub top: usize,
    /// Orders purchase-date span; date edits are clamped into it.
    pub bounds: Option<(NaiveDate, NaiveDate)>,
    /// Currently selected range.
    pub range: DateRange,
    pub should_quit: bool,
    /// Most recent snapshot, `None` until the first one arrives.
    pub last_snapshot: Option<DashboardSnapshot>,
}

impl App {
    pub fn new(
        theme_name: &str,
        top: usize,
        range: DateRange,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            page: Page::Orders,
            top,
            bounds,
            range,
            should_quit: false,
            last_snapshot: None,
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the interactive dashboard.
    ///
    /// Range changes are published on `requests`; snapshots are drained from
    /// `snapshots` without blocking. Uses `crossterm::event::poll` with a
    /// 250 ms timeout so the loop stays on the current thread.
    ///
    /// The loop exits on `q`, `Q`, `Ctrl+C`, or when the runtime hangs up.
    pub async fn run(
        mut self,
        requests: watch::Sender<DateRange>,
        mut snapshots: mpsc::Receiver<DashboardSnapshot>,
    ) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if self.dispatch_key(key, &requests) {
                            break Ok(());
                        }
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            // Drain any pending snapshots (non-blocking).
            loop {
                match snapshots.try_recv() {
                    Ok(snapshot) => self.update_from_snapshot(snapshot),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── State transitions ─────────────────────────────────────────────────────

    /// Apply a key press to the app state.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                Action::Quit
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                Action::Quit
            }
            KeyCode::Tab | KeyCode::Right => {
                self.page = self.page.next();
                Action::None
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.page = self.page.previous();
                Action::None
            }
            KeyCode::Char('[') => self.shift_range(-1, 0),
            KeyCode::Char(']') => self.shift_range(1, 0),
            KeyCode::Char('{') => self.shift_range(0, -1),
            KeyCode::Char('}') => self.shift_range(0, 1),
            KeyCode::Char('r') | KeyCode::Char('R') => match self.bounds {
                Some((min, max)) => self.set_range(DateRange::new(min, max)),
                None => Action::None,
            },
            _ => Action::None,
        }
    }

    /// Apply `key` and publish any range change on `requests`.
    ///
    /// The channel holds only the newest range, so rapid edits replace each
    /// other instead of queueing. Returns `true` when the app should quit.
    pub fn dispatch_key(&mut self, key: KeyEvent, requests: &watch::Sender<DateRange>) -> bool {
        match self.handle_key(key) {
            Action::Quit => true,
            Action::Recompute(range) => {
                requests.send_replace(range);
                false
            }
            Action::None => false,
        }
    }

    /// Store an incoming snapshot.
    pub fn update_from_snapshot(&mut self, snapshot: DashboardSnapshot) {
        tracing::debug!(
            rows = snapshot.metadata.filtered_rows.total(),
            "snapshot received"
        );
        self.last_snapshot = Some(snapshot);
    }

    /// `true` while the displayed snapshot is for an older range.
    pub fn is_stale(&self) -> bool {
        match &self.last_snapshot {
            Some(s) => s.metadata.range != self.range,
            None => true,
        }
    }

    fn shift_range(&mut self, start_months: i32, end_months: i32) -> Action {
        let shifted = DateRange::new(
            shift_months(self.range.start, start_months),
            shift_months(self.range.end, end_months),
        );
        self.set_range(shifted)
    }

    fn set_range(&mut self, range: DateRange) -> Action {
        let range = match self.bounds {
            Some((min, max)) => range.clamp_to(min, max),
            None => range,
        };
        if range == self.range {
            return Action::None;
        }
        self.range = range;
        Action::Recompute(range)
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header = Header::new(self.range, self.bounds, self.page, &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        match &self.last_snapshot {
            None => pages::render_loading(frame, body_area, &self.theme),
            Some(snapshot) if snapshot.is_empty() => {
                pages::render_no_data(frame, body_area, snapshot, &self.theme)
            }
            Some(snapshot) => pages::render_page(
                frame,
                body_area,
                self.page,
                snapshot,
                &self.theme,
                self.top,
            ),
        }

        let mut footer = vec![Span::styled(
            "Tab/←→ page  [ ] start ±1 month  { } end ±1 month  r reset  q quit",
            self.theme.dim,
        )];
        if self.is_stale() && self.last_snapshot.is_some() {
            footer.push(Span::styled("  updating…", self.theme.info));
        }
        frame.render_widget(Paragraph::new(Line::from(footer)), footer_area);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
