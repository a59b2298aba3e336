//! netpulse: a live network speed panel for the terminal, written in Rust.
//!
//! Features:
//!   - Download/upload rates refreshed every interval
//!   - Online/offline indicator from the default route
//!   - Cumulative totals and a download sparkline
//!   - Countdown sessions with pause/resume
//!   - `--plain` line output for scripts
//!
//! Keybindings: Press F1 or '?' for help.

mod app;
mod args;
mod color_scheme;
mod config;
mod error;
mod input;
#[cfg(feature = "logging")]
mod logging;
mod plain;
mod session;
mod system;
mod ui;

use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::{App, Request};
use args::Args;
use config::{NetpulseConfig, MAX_COUNTDOWN_SECS, MAX_INTERVAL_MS, MIN_INTERVAL_MS};
use system::counters::SysinfoCounters;
use system::reachability::DefaultRouteProbe;
use system::sampler::{Monitor, Reading};

/// How long to wait for a key before redrawing
const EVENT_POLL_MS: u64 = 50;

fn main() -> Result<()> {
    let args = Args::parse();

    #[cfg(all(feature = "logging", debug_assertions))]
    {
        logging::init_logger(log::LevelFilter::Debug, std::ffi::OsStr::new("debug.log"))?;
    }

    let config_path = args.config.clone().or_else(config::default_config_path);
    let mut config = config_path
        .as_deref()
        .map(NetpulseConfig::load)
        .unwrap_or_default();
    apply_overrides(&mut config, &args);

    if args.plain {
        return plain::run(&config, args.count);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, &config, config_path.as_deref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Command-line values win over the settings file.
fn apply_overrides(config: &mut NetpulseConfig, args: &Args) {
    if let Some(interval) = args.interval {
        let ms = u64::try_from(interval.as_millis()).unwrap_or(MAX_INTERVAL_MS);
        config.update_interval_ms = ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
    }
    if !args.interfaces.is_empty() {
        config.interfaces = args.interfaces.clone();
    }
    if let Some(countdown) = args.countdown {
        // Round up so `-t 500ms` still runs a (one second) countdown
        let secs = countdown
            .as_secs()
            .saturating_add(u64::from(countdown.subsec_nanos() > 0));
        config.countdown_secs = secs.min(MAX_COUNTDOWN_SECS);
    }
}

/// Main application loop
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, config: &NetpulseConfig,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut app = App::new(config);
    let mut monitor = Monitor::new();
    let (tx, rx): (Sender<Reading>, Receiver<Reading>) = mpsc::channel();

    // Open straight into a running session
    app.start_session(Local::now());

    let result = event_loop(terminal, &mut app, &mut monitor, &tx, &rx, config_path);

    if app.settings_dirty {
        save_settings(&app, config_path);
    }
    monitor.stop();
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App, monitor: &mut Monitor,
    tx: &Sender<Reading>, rx: &Receiver<Reading>, config_path: Option<&Path>,
) -> Result<()> {
    loop {
        for request in app.take_requests() {
            handle_request(app, monitor, tx, request, config_path)?;
        }

        while let Ok(reading) = rx.try_recv() {
            app.apply_reading(reading, Local::now());
        }
        app.check_expiry(Local::now());
        // Expiry may have queued a stop
        for request in app.take_requests() {
            handle_request(app, monitor, tx, request, config_path)?;
        }

        // Draw
        terminal.draw(|f| ui::draw(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        // Handle events with short timeout for responsiveness
        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    // On Windows, crossterm fires Press and Release; only handle Press
                    if key.kind == KeyEventKind::Press {
                        input::handle_input(app, key);
                        if app.should_quit {
                            return Ok(());
                        }
                    }
                }
                Event::Resize(_, _) => {
                    // Terminal resize - will be handled on next draw
                }
                _ => {}
            }
        }
    }
}

fn handle_request(
    app: &mut App, monitor: &mut Monitor, tx: &Sender<Reading>, request: Request,
    config_path: Option<&Path>,
) -> Result<()> {
    match request {
        Request::StartMonitor => {
            // A stop followed by a start within one frame: restart cleanly
            if monitor.is_running() {
                log::debug!("restarting sampler");
                monitor.stop();
            }
            monitor
                .start(
                    app.interval(),
                    SysinfoCounters::new(app.interfaces.clone()),
                    DefaultRouteProbe,
                    tx.clone(),
                )
                .context("unable to start the sampler")?;
        }
        Request::StopMonitor => monitor.stop(),
        Request::SetInterval(interval) => monitor.set_interval(interval)?,
        Request::SaveConfig => {
            if save_settings(app, config_path) {
                app.settings_dirty = false;
            }
        }
    }
    Ok(())
}

/// Write the current settings; failures are logged, never fatal.
fn save_settings(app: &App, config_path: Option<&Path>) -> bool {
    let Some(path) = config_path else {
        log::warn!("no config directory; settings not saved");
        return false;
    };
    match NetpulseConfig::from_app(app).save(path) {
        Ok(()) => {
            log::info!("settings saved to {}", path.display());
            true
        }
        Err(err) => {
            log::warn!("unable to save settings: {err:#}");
            false
        }
    }
}
