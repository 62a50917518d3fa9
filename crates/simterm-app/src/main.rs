//! simterm entry point.
//!
//! Runs the line editor on the host terminal with the example commands
//! registered. The optional config path comes from the first argument or
//! the `SIMTERM_CONFIG` env var. Escape or Ctrl+C quits.

use std::cell::RefCell;
use std::fs::File;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};

use simterm_backend_crossterm::CrosstermBackend;
use simterm_terminal::{CommandRegistry, LineEditor, register_builtins};
use simterm_types::config::TerminalConfig;

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SIMTERM_CONFIG").ok())
        .map(PathBuf::from);
    let config = match &config_path {
        Some(path) => TerminalConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TerminalConfig::default(),
    };

    init_logging(&config)?;
    if let Some(path) = &config_path {
        log::info!("Loaded config from {}", path.display());
    }

    let cwd = Rc::new(RefCell::new(std::env::current_dir()?));
    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry, &cwd)?;
    log::info!("Registered {} commands", registry.len());

    let backend = CrosstermBackend::new().context("opening terminal")?;
    let mut editor = LineEditor::new(backend, registry, &config);
    editor.add_exit_listener(|| log::info!("Exit requested"));
    editor.run()?;
    Ok(())
}

/// Set up env_logger. The shell owns the screen, so output goes to the
/// configured log file when there is one.
fn init_logging(config: &TerminalConfig) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter(config)),
    );
    if let Some(path) = &config.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Filter used when `RUST_LOG` is unset. Without a log file, stderr is the
/// raw-mode screen, so logging stays off.
fn default_filter(config: &TerminalConfig) -> &str {
    if config.log_file.is_some() {
        &config.log_filter
    } else {
        "off"
    }
}
