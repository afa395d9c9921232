mod cli;
mod commands;

use std::process::ExitCode;

use cli::{Cli, Commands};
use commands::{inspect, locate, lookup, normalize};
use tracing_subscriber::EnvFilter;

/// RUST_LOG wins; otherwise each -v raises the level one step from warn.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub async fn run() -> anyhow::Result<ExitCode> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Lookup(args) => lookup::run(&cli, args).await,
        Commands::Locate(args) => locate::run(&cli, args),
        Commands::Normalize(args) => normalize::run(&cli, args),
        Commands::Inspect => inspect::run(&cli),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> { run().await }
