//! Interactive application state around a [`Dashboard`].
//!
//! The dashboard owns the market state; this layer adds what only the terminal
//! needs: which panel has focus, cursors, overlays and the frame counter.

use crate::cli::Args;
use crate::config::{Config, parse_color};
use crate::dashboard::{Dashboard, StateChange};
use crate::models::{MarketIndex, StockRecord};
use crate::simulator::RandomJitter;
use anyhow::{Result, bail};
use chrono::{DateTime, Local, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::style::Color;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Dashboard driven by a real random source.
pub type LiveDashboard = Dashboard<RandomJitter<StdRng>>;

/// Panel receiving keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Watchlist,
    Search,
}

/// Colors for the UI, resolved from config.
#[derive(Debug, Clone, Copy)]
pub struct UiColors {
    pub gain: Color,
    pub loss: Color,
    pub neutral: Color,
    pub header_bg: Color,
    pub selected_bg: Color,
    pub border: Color,
}

impl Default for UiColors {
    fn default() -> Self {
        Self {
            gain: Color::Green,
            loss: Color::Red,
            neutral: Color::White,
            header_bg: Color::DarkGray,
            selected_bg: Color::Rgb(40, 40, 60),
            border: Color::DarkGray,
        }
    }
}

impl UiColors {
    fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            gain: parse_color(&config.colors.gain, defaults.gain),
            loss: parse_color(&config.colors.loss, defaults.loss),
            neutral: parse_color(&config.colors.neutral, defaults.neutral),
            header_bg: parse_color(&config.colors.header, defaults.header_bg),
            selected_bg: defaults.selected_bg,
            border: parse_color(&config.colors.border, defaults.border),
        }
    }

    /// Color for a signed change.
    pub fn for_change(&self, change: f64) -> Color {
        if change > 0.0 {
            self.gain
        } else if change < 0.0 {
            self.loss
        } else {
            self.neutral
        }
    }
}

/// Application state.
pub struct App {
    /// Market state
    pub dashboard: LiveDashboard,
    /// Market overview rows
    pub markets: Vec<MarketIndex>,
    /// Panel with keyboard focus
    pub focus: Focus,
    /// Highlighted watchlist row
    pub watch_cursor: usize,
    /// Highlighted search result
    pub result_cursor: usize,
    /// Number of frames (batch) or ticks (interactive) so far
    pub iteration: u64,
    /// Maximum iterations (0 = infinite)
    pub max_iterations: u64,
    /// Is the app running
    pub running: bool,
    /// Message to display in a popup
    pub error: Option<String>,
    /// Show help overlay
    pub show_help: bool,
    /// Show prediction summary
    pub show_predictions: bool,
    /// Show price chart
    pub show_chart: bool,
    /// Show market overview
    pub show_market_overview: bool,
    /// Batch mode (non-interactive)
    pub batch_mode: bool,
    /// Resolved colors
    pub colors: UiColors,
    changes: broadcast::Receiver<StateChange>,
    dirty: bool,
    clock_second: i64,
}

impl App {
    /// Create a new application from CLI args and config.
    pub fn new(args: &Args, config: &Config) -> Result<Self> {
        let catalog = config.catalog()?;

        let rng = match args.seed.or(config.general.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut dashboard =
            Dashboard::new(catalog, RandomJitter::new(rng), config.general.history_len)?;

        if let Some(symbol) = &args.select {
            if !dashboard.select_symbol(symbol) {
                bail!("Unknown symbol for --select: {}", symbol);
            }
        }

        for symbol in args.watch.iter().flatten() {
            if dashboard.catalog().find(symbol).is_none() {
                bail!("Unknown symbol for --watch: {}", symbol);
            }
            dashboard.add_symbol(symbol);
        }

        let mut focus = Focus::Watchlist;
        if let Some(query) = &args.search {
            dashboard.search(query);
            focus = Focus::Search;
        }

        let changes = dashboard.subscribe();

        Ok(Self {
            dashboard,
            markets: config.markets(),
            focus,
            watch_cursor: 0,
            result_cursor: 0,
            iteration: 0,
            max_iterations: args.iterations,
            running: true,
            error: None,
            show_help: false,
            show_predictions: config.display.show_predictions,
            show_chart: config.display.show_chart && !args.no_chart,
            show_market_overview: config.display.show_market_overview,
            batch_mode: args.batch,
            colors: UiColors::from_config(config),
            changes,
            dirty: true,
            clock_second: Utc::now().timestamp(),
        })
    }

    /// Drain change notifications and report whether a redraw is needed.
    pub fn take_redraw(&mut self) -> bool {
        loop {
            match self.changes.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => self.dirty = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        std::mem::take(&mut self.dirty)
    }

    /// Force a redraw on the next frame.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Run a scheduled tick if one is due, and redraw when the clock moves on.
    pub fn on_timer(&mut self, now: std::time::Instant) {
        if self.dashboard.advance(now) {
            self.iteration += 1;
        }

        let second = Utc::now().timestamp();
        if second != self.clock_second {
            self.clock_second = second;
            self.dirty = true;
        }
    }

    /// Give focus to the search box.
    pub fn focus_search(&mut self) {
        self.focus = Focus::Search;
    }

    /// Return focus to the watchlist, keeping the query.
    pub fn leave_search(&mut self) {
        self.focus = Focus::Watchlist;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Watchlist => Focus::Search,
            Focus::Search => Focus::Watchlist,
        };
    }

    /// Append a character to the query and re-run the search.
    pub fn push_char(&mut self, c: char) {
        let mut query = self.dashboard.query().to_string();
        query.push(c);
        self.run_search(&query);
    }

    /// Remove the last character of the query and re-run the search.
    pub fn pop_char(&mut self) {
        let mut query = self.dashboard.query().to_string();
        if query.pop().is_some() {
            self.run_search(&query);
        }
    }

    fn run_search(&mut self, query: &str) {
        self.dashboard.search(query);
        self.result_cursor = 0;
    }

    /// Move the cursor of the focused list up.
    pub fn select_up(&mut self) {
        let cursor = self.cursor_mut();
        *cursor = cursor.saturating_sub(1);
    }

    /// Move the cursor of the focused list down.
    pub fn select_down(&mut self) {
        let len = self.focused_len();
        let cursor = self.cursor_mut();
        if *cursor + 1 < len {
            *cursor += 1;
        }
    }

    pub fn select_top(&mut self) {
        *self.cursor_mut() = 0;
    }

    pub fn select_bottom(&mut self) {
        let last = self.focused_len().saturating_sub(1);
        *self.cursor_mut() = last;
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.focus {
            Focus::Watchlist => &mut self.watch_cursor,
            Focus::Search => &mut self.result_cursor,
        }
    }

    fn focused_len(&self) -> usize {
        match self.focus {
            Focus::Watchlist => self.dashboard.watchlist().len(),
            Focus::Search => self.dashboard.search_results().len(),
        }
    }

    /// The row under the cursor of the focused list.
    pub fn highlighted(&self) -> Option<&StockRecord> {
        match self.focus {
            Focus::Watchlist => self.dashboard.watchlist().get(self.watch_cursor),
            Focus::Search => self.dashboard.search_results().get(self.result_cursor),
        }
    }

    /// Select the highlighted row.
    pub fn activate(&mut self) {
        if let Some(stock) = self.highlighted().cloned() {
            self.dashboard.select(stock);
        }
    }

    /// Pin the current selection to the watchlist.
    pub fn add_selection_to_watchlist(&mut self) {
        let stock = self.dashboard.selection().clone();
        if !self.dashboard.add_to_watchlist(stock) {
            self.error = Some(format!(
                "{} is already on your watchlist",
                self.dashboard.selection().symbol
            ));
        }
    }

    /// Toggle help display.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Quit the application and stop the simulator.
    pub fn quit(&mut self) {
        self.running = false;
        self.dashboard.stop();
    }

    /// Check if max iterations reached.
    pub fn should_quit(&self) -> bool {
        !self.running || (self.max_iterations > 0 && self.iteration >= self.max_iterations)
    }

    /// Age of the last tick at `now`, e.g. "1m 5s ago".
    pub fn last_tick_label(&self, now: DateTime<Utc>) -> String {
        match self.dashboard.last_tick() {
            Some(t) => {
                let age = (now - t).to_std().unwrap_or_default();
                let whole = std::time::Duration::from_secs(age.as_secs());
                format!("{} ago", humantime::format_duration(whole))
            }
            None => "never".to_string(),
        }
    }

    /// Local wall clock for the header.
    pub fn clock_label(now: DateTime<Utc>) -> String {
        now.with_timezone(&Local).format("%H:%M:%S").to_string()
    }

    /// Human readable tick period, e.g. "3s".
    pub fn tick_period_label(&self) -> String {
        humantime::format_duration(self.dashboard.simulator().period()).to_string()
    }
}
