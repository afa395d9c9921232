use std::process::ExitCode;

use anyhow::Result;
use district_lookup::ReferenceData;

pub fn run(cli: &crate::cli::Cli) -> Result<ExitCode> {
    let config = cli.config()?;
    let reference = ReferenceData::load(&config)?;

    println!("districts:      {} ({})", reference.len(), config.districts_path.display());
    println!("school entries: {} ({})", reference.schools().len(), config.schools_path.display());

    match reference.bounds() {
        Some(rect) => println!(
            "bounds:         [{:.6}, {:.6}] - [{:.6}, {:.6}]",
            rect.min().x, rect.min().y, rect.max().x, rect.max().y,
        ),
        None => println!("bounds:         (none)"),
    }

    let unnamed = reference.all_features().iter().filter(|f| f.id().is_none()).count();
    if unnamed > 0 {
        println!("without id:     {unnamed}");
    }

    let missing = reference.missing_school_entries();
    println!("missing schools: {}", missing.len());
    for id in &missing {
        println!("  {id}");
    }

    Ok(ExitCode::SUCCESS)
}
