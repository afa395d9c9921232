use std::path::Path;

use anyhow::{Context, Result, anyhow};
use geo::Rect;
use serde_json::Value;

use crate::{
    common::{read_file_bytes, read_json_bytes, read_json_file, to_multipolygon},
    config::Config,
    geom::Geometries,
};
use super::{DistrictFeature, SchoolEntry, SchoolTable};

/// Immutable reference data: district polygons in canonical order plus the school table.
/// Built once at startup and shared read-only (e.g. behind an `Arc`) by every request.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    features: Vec<DistrictFeature>,
    geoms: Geometries,
    schools: SchoolTable,
}

impl ReferenceData {
    /// Build the store from already-parsed parts. Feature order is the canonical match order.
    pub fn from_parts(features: Vec<DistrictFeature>, schools: SchoolTable) -> Result<Self> {
        let shapes = features.iter().enumerate()
            .map(|(i, feature)| to_multipolygon(feature.geometry())
                .with_context(|| format!("district feature {i}")))
            .collect::<Result<Vec<_>>>()?;

        let geoms = Geometries::new(shapes);
        debug_assert_eq!(geoms.len(), features.len());
        Ok(Self { geoms, features, schools })
    }

    /// Load the districts GeoJSON and the school table named by the config.
    /// Any unreadable or malformed input is fatal.
    pub fn load(config: &Config) -> Result<Self> {
        Self::read_from_files(&config.districts_path, &config.schools_path)
    }

    /// Load the districts GeoJSON file and the school table JSON file.
    pub fn read_from_files(districts_path: &Path, schools_path: &Path) -> Result<Self> {
        let districts = read_file_bytes(districts_path)?;
        let features = read_features(&districts)
            .with_context(|| format!("Failed to load districts from {}", districts_path.display()))?;

        let schools = read_json_file(schools_path)
            .and_then(|value| SchoolTable::from_json(&value))
            .with_context(|| format!("Failed to load school table from {}", schools_path.display()))?;

        let data = Self::from_parts(features, schools)?;
        data.log_summary();
        Ok(data)
    }

    /// Parse districts and school table from in-memory JSON bytes.
    pub fn from_geojson_bytes(districts: &[u8], schools: &[u8]) -> Result<Self> {
        let features = read_features(districts).context("Failed to parse districts GeoJSON")?;
        let schools = SchoolTable::from_json(&read_json_bytes(schools)?)
            .context("Failed to parse school table")?;
        Self::from_parts(features, schools)
    }

    /// All district features, in canonical order.
    #[inline] pub fn all_features(&self) -> &[DistrictFeature] { &self.features }

    /// The school entry for a district identifier; None means no schools are known.
    #[inline] pub fn schools_for(&self, id: &str) -> Option<&SchoolEntry> { self.schools.get(id) }

    #[inline] pub fn schools(&self) -> &SchoolTable { &self.schools }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub(crate) fn geoms(&self) -> &Geometries { &self.geoms }

    /// Bounding rectangle of every district.
    #[inline] pub fn bounds(&self) -> Option<Rect<f64>> { self.geoms.bounds() }

    /// District identifiers that have no school table entry, in canonical order.
    pub fn missing_school_entries(&self) -> Vec<String> {
        self.features.iter()
            .filter_map(DistrictFeature::id)
            .filter(|id| !self.schools.contains(id))
            .collect()
    }

    fn log_summary(&self) {
        if self.is_empty() {
            tracing::warn!("district collection is empty; every lookup will report DistrictNotFound");
        }
        let bounds = self.bounds().map(|r| [r.min().x, r.min().y, r.max().x, r.max().y]);
        tracing::info!(
            districts = self.len(),
            school_entries = self.schools.len(),
            missing_school_entries = self.missing_school_entries().len(),
            ?bounds,
            "reference data loaded"
        );
    }
}

/// Parse a GeoJSON FeatureCollection into district features, preserving order.
fn read_features(bytes: &[u8]) -> Result<Vec<DistrictFeature>> {
    let value = read_json_bytes(bytes)?;
    if value.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(anyhow!("expected a GeoJSON FeatureCollection"));
    }
    let features = value.get("features").and_then(Value::as_array)
        .ok_or_else(|| anyhow!("FeatureCollection has no \"features\" array"))?;

    features.iter().enumerate()
        .map(|(i, feature)| DistrictFeature::from_geojson(feature)
            .with_context(|| format!("invalid district feature at index {i}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn districts_json() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "UNSDLEA": "00001", "NAME": "West" },
                    "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]] }
                },
                {
                    "type": "Feature",
                    "properties": { "GEOID": "00002", "NAME": "East" },
                    "geometry": { "type": "MultiPolygon", "coordinates": [[[[1, 0], [2, 0], [2, 1], [1, 1], [1, 0]]]] }
                }
            ]
        })
    }

    #[test]
    fn parses_bytes_in_order() {
        let districts = serde_json::to_vec(&districts_json()).unwrap();
        let schools = br#"{ "00001": { "high": "West High" } }"#;
        let data = ReferenceData::from_geojson_bytes(&districts, schools).unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data.all_features()[0].id().as_deref(), Some("00001"));
        assert_eq!(data.all_features()[1].name(), Some("East"));
        assert_eq!(data.schools_for("00001").unwrap().get("high"), Some("West High"));
        assert!(data.schools_for("00002").is_none());
        assert_eq!(data.missing_school_entries(), vec!["00002".to_string()]);
        assert_eq!(data.geoms().len(), 2);
    }

    #[test]
    fn reads_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let districts = dir.path().join("districts.geojson");
        let schools = dir.path().join("schools.json");
        fs::write(&districts, serde_json::to_vec(&districts_json()).unwrap()).unwrap();
        fs::write(&schools, "{}").unwrap();

        let data = ReferenceData::read_from_files(&districts, &schools).unwrap();
        assert_eq!(data.len(), 2);
        assert!(data.schools().is_empty());
        let bounds = data.bounds().unwrap();
        assert_eq!((bounds.min().x, bounds.max().x), (0.0, 2.0));
    }

    #[test]
    fn malformed_inputs_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let districts = dir.path().join("districts.geojson");
        let schools = dir.path().join("schools.json");
        fs::write(&schools, "{}").unwrap();

        fs::write(&districts, "{ not json").unwrap();
        assert!(ReferenceData::read_from_files(&districts, &schools).is_err());

        fs::write(&districts, r#"{ "type": "Feature" }"#).unwrap();
        assert!(ReferenceData::read_from_files(&districts, &schools).is_err());

        let mut bad = districts_json();
        bad["features"][1]["geometry"] = json!({ "type": "LineString", "coordinates": [[0, 0], [1, 1]] });
        fs::write(&districts, serde_json::to_vec(&bad).unwrap()).unwrap();
        let err = ReferenceData::read_from_files(&districts, &schools).unwrap_err();
        assert!(format!("{err:#}").contains("index 1"));

        fs::write(&districts, serde_json::to_vec(&districts_json()).unwrap()).unwrap();
        fs::write(&schools, "[]").unwrap();
        assert!(ReferenceData::read_from_files(&districts, &schools).is_err());

        assert!(ReferenceData::read_from_files(&dir.path().join("missing.geojson"), &schools).is_err());
    }

    #[test]
    fn empty_collection_is_allowed() {
        let data = ReferenceData::from_geojson_bytes(
            br#"{ "type": "FeatureCollection", "features": [] }"#, b"{}",
        ).unwrap();
        assert!(data.is_empty());
        assert!(data.bounds().is_none());
    }
}
