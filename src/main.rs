mod backend;
mod cli;
mod error;
mod logging;
mod model;
mod notifier;
mod orchestrator;
mod session;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;
mod view;

#[cfg(test)]
#[path = "tests/mock_backend.rs"]
mod mock_backend;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_non_tui = args.json || args.text;

    logging::init(&args)?;

    let res = cli::run(args).await;
    // Explicitly exit with code 0 on success, especially for non-TUI modes
    if res.is_ok() && is_non_tui {
        std::process::exit(0);
    }
    res
}
