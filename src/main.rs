#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::fs::{self, File, OpenOptions};
use std::io::{self, stdout};
use std::path::Path;
use std::sync::Mutex;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;
use tracing_subscriber::EnvFilter;

use intake::config::IntakeConfig;
use intake::storage::RequestStore;
use intake::tui::{App, AppError};

const LOG_FILE: &str = "intake.log";

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = IntakeConfig::load().map_err(AppError::from)?;
    let store = match &config.data_dir {
        Some(dir) => RequestStore::with_path(dir),
        None => RequestStore::new(),
    }
    .map_err(AppError::from)?;
    init_tracing(store.base_path(), &config.log_filter)?;
    info!(data_dir = %store.base_path().display(), "starting intake");

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(store, config);
    let result = runtime.block_on(app.run(&mut terminal));

    let restore_result = restore_terminal();
    match result {
        Err(e) => Err(e.into()),
        Ok(()) => restore_result.map_err(Into::into),
    }
}

/// Sends `tracing` output to `intake.log` in the data directory; the
/// terminal belongs to the TUI.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn init_tracing(data_dir: &Path, default_filter: &str) -> Result<(), AppError> {
    fs::create_dir_all(data_dir)?;
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))?;
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn restore_terminal() -> Result<(), io::Error> {
    let raw_result = disable_raw_mode();
    let screen_result = execute!(stdout(), LeaveAlternateScreen);
    raw_result.and(screen_result)
}
