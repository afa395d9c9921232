use anyhow::{Context, Result, anyhow};
use geo::Geometry;
use serde_json::{Map, Value};

use crate::common::read_geometry;

/// Property keys checked, in priority order, for a district's canonical identifier.
pub(crate) const ID_KEYS: [&str; 3] = ["UNSDLEA", "GEOID", "DISTRICTID"];

/// Property keys checked, in priority order, for a district's display name.
const NAME_KEYS: [&str; 2] = ["NAME", "name"];

/// One school district boundary with its attribute properties.
#[derive(Debug, Clone)]
pub struct DistrictFeature {
    geometry: Geometry<f64>,
    properties: Map<String, Value>,
}

impl DistrictFeature {
    /// Build a feature from a Polygon or MultiPolygon and its properties.
    pub fn new(geometry: Geometry<f64>, properties: Map<String, Value>) -> Self {
        Self { geometry, properties }
    }

    /// Parse a GeoJSON `Feature` object.
    pub(crate) fn from_geojson(feature: &Value) -> Result<Self> {
        let geometry = feature.get("geometry")
            .filter(|geometry| !geometry.is_null())
            .ok_or_else(|| anyhow!("feature has no geometry"))?;
        let geometry = read_geometry(geometry).context("invalid feature geometry")?;

        let properties = match feature.get("properties") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(properties)) => properties.clone(),
            Some(other) => return Err(anyhow!("feature properties must be an object, got {other}")),
        };

        Ok(Self { geometry, properties })
    }

    #[inline] pub fn geometry(&self) -> &Geometry<f64> { &self.geometry }

    #[inline] pub fn properties(&self) -> &Map<String, Value> { &self.properties }

    /// The canonical district identifier, or None if no identifier property is set.
    pub fn id(&self) -> Option<String> { district_id(&self.properties) }

    /// The district display name (`NAME`, then `name`).
    pub fn name(&self) -> Option<&str> {
        NAME_KEYS.iter()
            .filter_map(|key| self.properties.get(*key).and_then(Value::as_str))
            .find(|name| !name.trim().is_empty())
    }
}

/// Extract the district identifier from a property mapping: the first present,
/// non-empty value of `UNSDLEA`, `GEOID`, `DISTRICTID`. Numbers are stringified.
pub fn district_id(properties: &Map<String, Value>) -> Option<String> {
    ID_KEYS.iter()
        .filter_map(|key| properties.get(*key))
        .find_map(scalar_to_string)
}

/// Render a scalar JSON value as a non-empty string; null, empty and nested values yield None.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
