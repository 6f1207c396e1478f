//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so interactive runs log to a file; text and JSON runs
//! log to stderr.

use crate::cli::Cli;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn filter(args: &Cli) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level))
}

/// Default log file: `<cache dir>/unclog/unclog.log`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("unclog").join("unclog.log"))
}

pub fn init(args: &Cli) -> Result<()> {
    let interactive = !args.json && !args.text && cfg!(feature = "tui");

    if !interactive {
        return tracing_subscriber::fmt()
            .with_env_filter(filter(args))
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!("init logging: {e}"));
    }

    let Some(path) = args.log_file.clone().or_else(default_log_path) else {
        // Nowhere to write without corrupting the screen.
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create log directory {}", dir.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(args))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("init logging: {e}"))
}
