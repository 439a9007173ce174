//! ## grindvakt-cli
//! **Operational entrypoint for the trust filter**
//!
//! Two modes: `run` bridges an untrusted capture interface to a trusted
//! egress interface with live enforcement, `replay` pushes recorded frames
//! through the same pipeline offline.

use clap::Parser;
use grindvakt_telemetry::logging::EventLogger;

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    EventLogger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(run_args) => commands::run_live_mode(run_args).await,
        Commands::Replay(replay_args) => commands::run_replay_mode(replay_args).await,
    }
}
