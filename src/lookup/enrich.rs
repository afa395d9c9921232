use anyhow::Result;
use geo::Geometry;
use serde_json::{Map, Value, json};

use crate::{
    common::write_geometry,
    geocode::Coordinate,
    reference::{DistrictFeature, ReferenceData, district_id},
};

/// The outcome of a successful lookup: the matched district with school names merged
/// into its properties, plus the coordinate the address resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub properties: Map<String, Value>,
    pub geometry: Geometry<f64>,
    pub location: Coordinate,
}

impl LookupResult {
    /// The matched district's identifier.
    pub fn district_id(&self) -> Option<String> { district_id(&self.properties) }

    /// A merged property rendered as text (strings as-is, other scalars stringified).
    pub fn property(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Success payload: `{ district: { properties, geometry }, location: { lon, lat } }`.
    pub fn to_json(&self) -> Result<Value> {
        Ok(json!({
            "district": {
                "properties": self.properties,
                "geometry": write_geometry(&self.geometry)?,
            },
            "location": self.location,
        }))
    }
}

impl ReferenceData {
    /// Merge the district's properties with its school entry. School fields only fill
    /// keys the district does not already carry; a missing entry adds nothing.
    pub fn enrich(&self, feature: &DistrictFeature, location: Coordinate) -> LookupResult {
        let mut properties = feature.properties().clone();

        match feature.id() {
            Some(id) => match self.schools_for(&id) {
                Some(entry) => {
                    for (level, school) in entry.iter() {
                        if !properties.contains_key(level) {
                            properties.insert(level.to_string(), Value::String(school.to_string()));
                        }
                    }
                }
                None => tracing::debug!(district_id = %id, "no school entry for district"),
            },
            None => tracing::debug!("matched district has no identifier"),
        }

        LookupResult { properties, geometry: feature.geometry().clone(), location }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{SchoolEntry, SchoolTable};
    use geo::{LineString, MultiPolygon, Polygon};

    fn feature(properties: Value) -> DistrictFeature {
        let ring = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        DistrictFeature::new(
            Geometry::MultiPolygon(MultiPolygon(vec![Polygon::new(ring, vec![])])),
            properties.as_object().cloned().unwrap(),
        )
    }

    fn reference(feature: &DistrictFeature) -> ReferenceData {
        let schools = SchoolTable::new([(
            "2703180".to_string(),
            SchoolEntry::new([("elementary", "Ramsey Elementary"), ("middle", "Ramsey Middle"), ("NAME", "Not A District Name")]),
        )]);
        ReferenceData::from_parts(vec![feature.clone()], schools).unwrap()
    }

    #[test]
    fn merges_school_fields() {
        let district = feature(json!({ "UNSDLEA": "2703180", "NAME": "Anoka-Hennepin" }));
        let result = reference(&district).enrich(&district, Coordinate::new(0.5, 0.5));

        assert_eq!(result.district_id().as_deref(), Some("2703180"));
        assert_eq!(result.property("elementary").as_deref(), Some("Ramsey Elementary"));
        assert_eq!(result.property("middle").as_deref(), Some("Ramsey Middle"));
        assert_eq!(result.property("high"), None);
        // existing keys are never overwritten by school fields
        assert_eq!(result.property("NAME").as_deref(), Some("Anoka-Hennepin"));
        assert_eq!(result.properties.len(), 4);
    }

    #[test]
    fn missing_entry_leaves_properties_unchanged() {
        let district = feature(json!({ "GEOID": "9999999", "NAME": "Elsewhere", "AREA": 12.5 }));
        let result = reference(&district).enrich(&district, Coordinate::new(0.5, 0.5));
        assert_eq!(&result.properties, district.properties());
        assert_eq!(result.property("AREA").as_deref(), Some("12.5"));
    }

    #[test]
    fn no_identifier_leaves_properties_unchanged() {
        let district = feature(json!({ "NAME": "Unnumbered" }));
        let result = reference(&district).enrich(&district, Coordinate::new(0.5, 0.5));
        assert_eq!(&result.properties, district.properties());
        assert_eq!(result.district_id(), None);
    }

    #[test]
    fn json_payload_shape() {
        let district = feature(json!({ "UNSDLEA": "2703180" }));
        let payload = reference(&district)
            .enrich(&district, Coordinate::new(-93.3, 45.26))
            .to_json()
            .unwrap();

        assert_eq!(payload["location"], json!({ "lon": -93.3, "lat": 45.26 }));
        assert_eq!(payload["district"]["properties"]["middle"], "Ramsey Middle");
        assert_eq!(payload["district"]["geometry"]["type"], "MultiPolygon");
        assert_eq!(payload["district"]["geometry"]["coordinates"][0][0][1], json!([1.0, 0.0]));
    }
}
