use std::{process::ExitCode, sync::Arc};

use anyhow::Result;
use district_lookup::{DistrictLookup, LookupError, LookupResult, Normalize, ReferenceData, respond};
use serde_json::json;

pub async fn run(cli: &crate::cli::Cli, args: &crate::cli::LookupArgs) -> Result<ExitCode> {
    let config = cli.config()?;
    let reference = Arc::new(ReferenceData::load(&config)?);
    let service = Arc::new(DistrictLookup::from_config(&config, reference)?);

    tracing::info!(addresses = args.addresses.len(), strategy = service.normalizer().name(), "looking up addresses");
    let results = service.lookup_all(args.addresses.clone()).await;

    let mut all_ok = true;
    for (address, result) in args.addresses.iter().zip(&results) {
        all_ok &= result.is_ok();
        if args.summary {
            print_summary(address, result);
        } else {
            print_json(address, result)?;
        }
    }

    Ok(if all_ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// One JSON object per line: the query, the transport status code and the payload.
pub(crate) fn print_json(query: &str, result: &Result<LookupResult, LookupError>) -> Result<()> {
    let (status, payload) = respond(result);
    println!("{}", serde_json::to_string(&json!({
        "query": query,
        "status": status.code(),
        "response": payload,
    }))?);
    Ok(())
}

/// Human-readable panel: district name and id, the three school levels and the location.
pub(crate) fn print_summary(query: &str, result: &Result<LookupResult, LookupError>) {
    println!("{query}");
    match result {
        Ok(found) => {
            let name = found.property("NAME").or_else(|| found.property("name"));
            println!("  District:          {}", name.as_deref().unwrap_or("No district name found"));
            println!("  District ID:       {}", found.district_id().as_deref().unwrap_or("N/A"));
            for (label, key) in [("Elementary School", "elementary"), ("Middle School", "middle"), ("High School", "high")] {
                println!("  {:<18} {}", format!("{label}:"), found.property(key).as_deref().unwrap_or("N/A"));
            }
            println!("  Location:          {:.6}, {:.6}", found.location.lat, found.location.lon);
        }
        Err(err) => {
            println!("  Error ({}): {err}", err.status().code());
        }
    }
    println!();
}
