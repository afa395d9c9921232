use std::process::ExitCode;

use anyhow::Result;
use district_lookup::{Coordinate, ReferenceData};

use super::lookup::{print_json, print_summary};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::LocateArgs) -> Result<ExitCode> {
    let config = cli.config()?;
    let reference = ReferenceData::load(&config)?;

    let result = reference.locate(Coordinate::new(args.lon, args.lat));

    let query = format!("{}, {}", args.lon, args.lat);
    if args.summary {
        print_summary(&query, &result);
    } else {
        print_json(&query, &result)?;
    }

    Ok(if result.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
