use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::{
    config::Config,
    error::{LookupError, Status},
    geocode::{Coordinate, Geocoder, NominatimClient},
    normalize::{Normalize, Normalizer},
    reference::ReferenceData,
};
use super::LookupResult;

/// Runs one address through normalize -> geocode -> resolve -> enrich.
///
/// Holds only read-only state, so a single instance (usually behind an `Arc`)
/// serves any number of concurrent lookups.
#[derive(Debug)]
pub struct DistrictLookup<G> {
    reference: Arc<ReferenceData>,
    normalizer: Normalizer,
    geocoder: G,
    min_address_len: usize,
}

impl DistrictLookup<NominatimClient> {
    /// Wire the Nominatim adapter and the configured normalizer around shared reference data.
    pub fn from_config(config: &Config, reference: Arc<ReferenceData>) -> Result<Self> {
        let normalizer = Normalizer::select(config.normalizer)?;
        let geocoder = NominatimClient::new(&config.geocoder)
            .context("Failed to build geocoding client")?;
        Ok(Self::new(reference, normalizer, geocoder, config.min_address_len))
    }
}

impl<G: Geocoder> DistrictLookup<G> {
    pub fn new(reference: Arc<ReferenceData>, normalizer: Normalizer, geocoder: G, min_address_len: usize) -> Self {
        Self { reference, normalizer, geocoder, min_address_len }
    }

    #[inline] pub fn reference(&self) -> &ReferenceData { &self.reference }

    #[inline] pub fn normalizer(&self) -> &Normalizer { &self.normalizer }

    /// Reject addresses shorter than the minimum length (in characters, after trimming).
    pub fn validate<'a>(&self, address: &'a str) -> Result<&'a str, LookupError> {
        let trimmed = address.trim();
        if trimmed.chars().count() < self.min_address_len {
            return Err(LookupError::Validation("invalid address".to_string()));
        }
        Ok(trimmed)
    }

    /// Resolve a free-text address to its district. Provider failures are surfaced
    /// immediately; there are no retries at this layer.
    pub async fn lookup(&self, address: &str) -> Result<LookupResult, LookupError> {
        let address = self.validate(address)?;

        let normalized = self.normalizer.normalize(address);
        tracing::debug!(raw = %address, normalized = %normalized, strategy = self.normalizer.name(), "address normalized");

        let coord = self.geocoder.geocode(&normalized).await?;
        tracing::debug!(lon = coord.lon, lat = coord.lat, "address geocoded");

        self.locate(coord)
    }

    /// Resolve and enrich an already-known coordinate, skipping the provider.
    pub fn locate(&self, coord: Coordinate) -> Result<LookupResult, LookupError> {
        let result = self.reference.locate(coord)?;
        tracing::debug!(district_id = result.district_id().as_deref().unwrap_or(""), "district resolved");
        Ok(result)
    }
}

impl<G: Geocoder + 'static> DistrictLookup<G> {
    /// Look up many addresses concurrently, one task per address.
    /// Results come back in input order; a task that dies yields `LookupError::Internal`.
    pub async fn lookup_all(self: &Arc<Self>, addresses: Vec<String>) -> Vec<Result<LookupResult, LookupError>> {
        let handles: Vec<_> = addresses.into_iter()
            .map(|address| {
                let lookup = Arc::clone(self);
                tokio::spawn(async move { lookup.lookup(&address).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.unwrap_or_else(|e| Err(LookupError::Internal(e.to_string()))));
        }
        results
    }
}

/// Classify a lookup outcome and build its response payload for the transport layer.
pub fn respond(result: &Result<LookupResult, LookupError>) -> (Status, Value) {
    match result {
        Ok(found) => match found.to_json() {
            Ok(payload) => (Status::Success, payload),
            Err(e) => {
                let err = LookupError::Internal(e.to_string());
                (err.status(), err.to_json())
            }
        },
        Err(err) => (err.status(), err.to_json()),
    }
}
