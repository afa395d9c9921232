use std::process::ExitCode;

use anyhow::Result;
use district_lookup::{Normalize, Normalizer};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::NormalizeArgs) -> Result<ExitCode> {
    let config = cli.config()?;
    let normalizer = Normalizer::select(config.normalizer)?;

    tracing::info!(strategy = normalizer.name(), "normalizing address");
    println!("{}", normalizer.normalize(&args.address));
    Ok(ExitCode::SUCCESS)
}
