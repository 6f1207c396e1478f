use crate::model::ClientConfig;
use crate::notifier::Notifier;
use crate::session::SessionController;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

/// What a non-interactive run does once the session has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliAction {
    Status,
    Enable,
    Disable,
    Authorize,
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "unclog",
    version,
    about = "Check and toggle Unclog contact labeling for your Gmail account"
)]
pub struct Cli {
    /// Base URL of the Unclog service
    #[arg(long, default_value = "https://unclog.appspot.com")]
    pub base_url: String,

    /// Print the session as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print a text summary and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Action to perform in --text/--json mode
    #[arg(long, value_enum, default_value_t = CliAction::Status)]
    pub action: CliAction,

    /// Give up on a request after this long (no limit by default)
    #[arg(long)]
    pub request_timeout: Option<humantime::Duration>,

    /// Refuse enable/disable while another such request is outstanding
    #[arg(long)]
    pub in_flight_guard: bool,

    /// Check enable/disable responses and keep the previous state on failure
    #[arg(long)]
    pub validate_responses: bool,

    /// Seed the session cookie (name=value), e.g. copied from a browser after authorizing
    #[arg(long)]
    pub session_cookie: Option<String>,

    /// Print the authorization URL instead of opening a browser
    #[arg(long)]
    pub no_browser: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log file used while the TUI owns the terminal
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}

pub async fn run(args: Cli) -> Result<()> {
    if args.action != CliAction::Status && !args.json && !args.text {
        return Err(anyhow::anyhow!(
            "--action only applies to --text or --json runs; use the keyboard in the TUI."
        ));
    }

    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_once(args).await;
        }
    }

    run_once(args).await
}

/// Build a `ClientConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> ClientConfig {
    ClientConfig {
        base_url: args.base_url.clone(),
        user_agent: format!("unclog/{}", env!("CARGO_PKG_VERSION")),
        request_timeout: args.request_timeout.map(Duration::from),
        in_flight_guard: args.in_flight_guard,
        validate_responses: args.validate_responses,
        session_cookie: args.session_cookie.clone(),
        open_browser: !args.no_browser,
    }
}

/// Load once, perform the requested action, print the result and exit.
async fn run_once(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let (out_tx, out_handle) = spawn_output_writer();

    let notifier = Notifier::new();
    let session =
        SessionController::new(&cfg, notifier.clone()).context("failed to create client")?;

    let res = perform(&args, &cfg, &session, &out_tx).await;

    // Whatever the alert slot holds at the end is the user-facing error.
    let alert = notifier.current();
    if alert.visible {
        if let Some(text) = alert.text {
            let _ = out_tx.send(OutputLine::Stderr(text));
        }
    }

    if res.is_ok() {
        let snapshot = session.snapshot();
        if args.json {
            let out = serde_json::to_string_pretty(&snapshot)?;
            let _ = out_tx.send(OutputLine::Stdout(out));
        } else {
            let summary = crate::text_summary::build_text_summary(&snapshot);
            for line in summary.lines {
                let _ = out_tx.send(OutputLine::Stdout(line));
            }
        }
    }

    drop(out_tx);
    let _ = out_handle.await;
    res
}

async fn perform(
    args: &Cli,
    cfg: &ClientConfig,
    session: &SessionController,
    out_tx: &mpsc::UnboundedSender<OutputLine>,
) -> Result<()> {
    session.load().await.context("could not load account state")?;

    match args.action {
        CliAction::Status => {}
        CliAction::Enable => session.enable().await.context("enable failed")?,
        CliAction::Disable => session.disable().await.context("disable failed")?,
        CliAction::Authorize => {
            let handoff = session.authorize()?;
            let info = crate::orchestrator::hand_off(&handoff, cfg.open_browser);
            let _ = out_tx.send(OutputLine::Stderr(info.to_message()));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
