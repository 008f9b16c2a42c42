//! Fhembot CLI entry point.
//!
//! Binary name: `fhembot`
//!
//! Parses CLI arguments, initializes tracing, then dispatches to the
//! requested command. `serve` runs the assistant until interrupted;
//! `check` validates the deployment and exits.

mod check;
mod cli;
mod http;
mod serve;
mod state;

use std::path::PathBuf;

use clap::Parser;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    fhembot_observe::tracing_setup::init_tracing(cli.log_filter(), cli.otel)
        .map_err(|e| anyhow::anyhow!(e))?;

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(fhembot_infra::config::resolve_data_dir);

    let result = run_command(cli, data_dir).await;

    // Flush buffered spans before the process exits.
    fhembot_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run_command(cli: Cli, data_dir: PathBuf) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve => {
            let state = AppState::init(cli.config.as_deref(), data_dir).await?;
            serve::run(state).await
        }
        Commands::Check => check::run(cli.config.as_deref(), &data_dir).await,
    }
}
