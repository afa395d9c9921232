use std::path::PathBuf;

use anyhow::Result;
use district_lookup::{Config, NormalizerChoice};

/// School district lookup CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "district-lookup", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// TOML config file; flags below override its values
    #[arg(short, long, global = true, env = "DISTRICT_LOOKUP_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// District polygons (GeoJSON FeatureCollection)
    #[arg(long, global = true, env = "DISTRICT_LOOKUP_DISTRICTS", value_hint = clap::ValueHint::FilePath)]
    pub districts: Option<PathBuf>,

    /// District identifier -> school names table (JSON)
    #[arg(long, global = true, env = "DISTRICT_LOOKUP_SCHOOLS", value_hint = clap::ValueHint::FilePath)]
    pub schools: Option<PathBuf>,

    /// Geocoding search endpoint
    #[arg(long, global = true, env = "DISTRICT_LOOKUP_ENDPOINT", value_hint = clap::ValueHint::Url)]
    pub endpoint: Option<String>,

    /// Client identifier sent to the geocoding provider
    #[arg(long, global = true, env = "DISTRICT_LOOKUP_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Geocoding timeout in seconds
    #[arg(long, global = true, env = "DISTRICT_LOOKUP_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Address normalizer: auto, pattern or structured
    #[arg(long, global = true, env = "DISTRICT_LOOKUP_NORMALIZER")]
    pub normalizer: Option<NormalizerChoice>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Resolve one or more addresses to their school district
    Lookup(LookupArgs),

    /// Resolve a longitude/latitude pair without geocoding
    Locate(LocateArgs),

    /// Print the normalized form of an address
    Normalize(NormalizeArgs),

    /// Summarize the loaded reference data
    Inspect,
}

#[derive(clap::Args, Debug)]
pub struct LookupArgs {
    /// Free-text postal addresses, e.g. "9200 Inverness Ln NW, Ramsey, MN 55303"
    #[arg(required = true)]
    pub addresses: Vec<String>,

    /// Print a human-readable summary instead of JSON
    #[arg(long)]
    pub summary: bool,
}

#[derive(clap::Args, Debug)]
pub struct LocateArgs {
    /// Longitude in decimal degrees (WGS84)
    #[arg(allow_negative_numbers = true)]
    pub lon: f64,

    /// Latitude in decimal degrees (WGS84)
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,

    /// Print a human-readable summary instead of JSON
    #[arg(long)]
    pub summary: bool,
}

#[derive(clap::Args, Debug)]
pub struct NormalizeArgs {
    /// Free-text postal address
    pub address: String,
}

impl Cli {
    /// Defaults, then the config file, then command-line flags.
    pub fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::default(),
        };

        if let Some(path) = &self.districts { config.districts_path = path.clone(); }
        if let Some(path) = &self.schools { config.schools_path = path.clone(); }
        if let Some(endpoint) = &self.endpoint { config.geocoder.endpoint = endpoint.clone(); }
        if let Some(user_agent) = &self.user_agent { config.geocoder.user_agent = user_agent.clone(); }
        if let Some(timeout) = self.timeout { config.geocoder.timeout_secs = timeout; }
        if let Some(normalizer) = self.normalizer { config.normalizer = normalizer; }

        config.validate()?;
        Ok(config)
    }
}
