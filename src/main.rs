//! Stonkdash - a terminal stock dashboard with simulated live prices.

mod app;
mod catalog;
mod cli;
mod config;
mod dashboard;
mod error;
mod export;
mod models;
mod prediction;
mod search;
mod simulator;
mod ui;
mod watchlist;

use anyhow::Result;
use app::App;
use cli::Args;
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    if args.init_config {
        let Some(path) = Config::default_config_path() else {
            anyhow::bail!("Could not determine a config directory");
        };
        Config::write_sample(&path)?;
        println!("Wrote sample config to {}", path.display());
        return Ok(());
    }

    // Load configuration
    let config = if let Some(ref path) = args.config {
        Config::load(path)?
    } else {
        Config::load_or_default()
    };

    if args.verbose {
        eprintln!(
            "Config: {}",
            args.config
                .clone()
                .or_else(Config::default_config_path)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "defaults".to_string())
        );
        match args.seed.or(config.general.seed) {
            Some(seed) => eprintln!("Simulator seed: {}", seed),
            None => eprintln!("Simulator seed: random"),
        }
    }

    // Create application state
    let mut app = match App::new(&args, &config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if error::is_catalog_error(&e) {
                eprintln!();
                eprintln!("Check the [[catalog]] entries of your config file.");
                eprintln!("Sample config:");
                eprintln!("{}", config::sample_config());
            }
            std::process::exit(1);
        }
    };

    if args.verbose {
        eprintln!(
            "Catalog: {} stocks, watchlist: {}, simulator: {}",
            app.dashboard.catalog().len(),
            app.dashboard.watchlist().len(),
            if app.dashboard.is_simulating() {
                "running"
            } else {
                "stopped"
            }
        );
    }

    if let Some(format) = args.export {
        print!("{}", export::export_snapshot(&app.dashboard, format)?);
        return Ok(());
    }

    // Run in batch mode or interactive mode
    if app.batch_mode {
        run_batch(&mut app).await
    } else {
        run_interactive(&mut app).await
    }
}

/// Run in batch mode, one frame per simulator period.
async fn run_batch(app: &mut App) -> Result<()> {
    loop {
        ui::render_batch(app);
        app.iteration += 1;

        if app.should_quit() {
            break;
        }

        tokio::time::sleep(app.dashboard.simulator().period()).await;
        app.dashboard.tick();
    }

    app.dashboard.stop();
    Ok(())
}

/// Restores the terminal even when the main loop bails out early.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    }
}

/// Run in interactive mode with TUI.
async fn run_interactive(app: &mut App) -> Result<()> {
    let guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app).await;

    app.dashboard.stop();
    drop(guard);
    terminal.show_cursor()?;

    result
}

/// Main application loop.
async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let poll_rate = Duration::from_millis(100);

    loop {
        if app.take_redraw() {
            terminal.draw(|f| ui::render(f, app))?;
        }

        let timeout = app
            .dashboard
            .simulator()
            .time_until_next(Instant::now())
            .map_or(poll_rate, |left| left.min(poll_rate));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(app, key.code, key.modifiers);
                    app.mark_dirty();
                }
                Event::Resize(_, _) => app.mark_dirty(),
                _ => {}
            }
        }

        if app.should_quit() {
            break;
        }

        app.on_timer(Instant::now());
    }

    Ok(())
}

/// Handle keyboard input.
fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    // Close help overlay on any key
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Clear notice on any key
    if app.error.is_some() {
        app.error = None;
        return;
    }

    match app.focus {
        app::Focus::Search => handle_search_key(app, code),
        app::Focus::Watchlist => handle_browse_key(app, code),
    }
}

/// Keys while typing in the search box.
fn handle_search_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.leave_search(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Enter => app.activate(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Up => app.select_up(),
        KeyCode::Down => app.select_down(),
        KeyCode::Char(c) => app.push_char(c),
        _ => {}
    }
}

/// Keys while browsing the watchlist.
fn handle_browse_key(app: &mut App, code: KeyCode) {
    match code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_up(),
        KeyCode::Down | KeyCode::Char('j') => app.select_down(),
        KeyCode::Home | KeyCode::Char('g') => app.select_top(),
        KeyCode::End | KeyCode::Char('G') => app.select_bottom(),
        KeyCode::Tab => app.toggle_focus(),

        // Actions
        KeyCode::Enter => app.activate(),
        KeyCode::Char('/') => app.focus_search(),
        KeyCode::Char('a') => app.add_selection_to_watchlist(),
        KeyCode::Char('h') | KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}
