use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use grindvakt_config::GrindvaktConfig;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run live enforcement between the ingress and egress interfaces
    Run(RunArgs),
    /// Replay hex-encoded frames from a file through the pipeline
    Replay(ReplayArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Configuration file (defaults to config/grindvakt.yaml + environment)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the ingress (capture) interface
    #[arg(short, long)]
    pub interface: Option<String>,
    /// Override the egress (forwarding) interface
    #[arg(short, long)]
    pub egress: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// File of whitespace-separated hex-encoded frames
    pub frames: PathBuf,
    /// Configuration file (defaults to config/grindvakt.yaml + environment)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn load_config(path: &Option<PathBuf>) -> anyhow::Result<GrindvaktConfig> {
    let config = match path {
        Some(path) => GrindvaktConfig::load_from_path(path)?,
        None => GrindvaktConfig::load()?,
    };
    Ok(config)
}

pub async fn run_live_mode(args: RunArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.config)?;
    if let Some(interface) = args.interface {
        config.capture.ingress_interface = interface;
    }
    if let Some(egress) = args.egress {
        config.capture.egress_interface = egress;
    }

    grindvakt_engine::run_live(config).await?;
    Ok(())
}

pub async fn run_replay_mode(args: ReplayArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let stats = grindvakt_engine::run_replay(config, &args.frames).await?;
    info!(
        "Replay finished: {} frames, {} accepted",
        stats.total, stats.accepted
    );
    Ok(())
}
