use std::{path::{Path, PathBuf}, str::FromStr, time::Duration};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::common::read_file_string;

/// Which address normalizer strategy to use for the life of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizerChoice {
    /// Structured parser when its self-test passes, pattern rules otherwise.
    #[default]
    Auto,
    Pattern,
    Structured,
}

impl FromStr for NormalizerChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "pattern" => Ok(Self::Pattern),
            "structured" => Ok(Self::Structured),
            other => bail!("unknown normalizer {other:?} (expected auto, pattern or structured)"),
        }
    }
}

/// Geocoding provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Search endpoint of a Nominatim-compatible provider.
    pub endpoint: String,
    /// Client identifier sent as `User-Agent` on every request.
    pub user_agent: String,
    /// Upper bound on a single geocoding call.
    pub timeout_secs: u64,
    /// Optional `countrycodes` filter, e.g. `"us"`.
    pub country_codes: Option<String>,
    /// Optional cap on the number of candidates requested.
    pub limit: Option<u32>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: "district-lookup-prod".to_string(),
            timeout_secs: 10,
            country_codes: None,
            limit: None,
        }
    }
}

impl GeocoderConfig {
    #[inline] pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

/// Process configuration. Every field has a default; a TOML file may override any subset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub districts_path: PathBuf,
    pub schools_path: PathBuf,
    /// Minimum address length, in characters after trimming.
    pub min_address_len: usize,
    pub normalizer: NormalizerChoice,
    pub geocoder: GeocoderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            districts_path: PathBuf::from("data/school_districts.geojson"),
            schools_path: PathBuf::from("data/school_lookup.json"),
            min_address_len: 5,
            normalizer: NormalizerChoice::default(),
            geocoder: GeocoderConfig::default(),
        }
    }
}

impl Config {
    /// Read a TOML config file; missing keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = read_file_string(path)?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no lookup could work with.
    pub fn validate(&self) -> Result<()> {
        if self.geocoder.endpoint.trim().is_empty() {
            bail!("geocoder endpoint must not be empty");
        }
        if self.geocoder.user_agent.trim().is_empty() {
            bail!("geocoder user_agent must not be empty");
        }
        if self.geocoder.timeout_secs == 0 {
            bail!("geocoder timeout_secs must be at least 1");
        }
        Ok(())
    }
}
