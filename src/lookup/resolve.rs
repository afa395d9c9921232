use crate::{error::LookupError, geocode::Coordinate, reference::{DistrictFeature, ReferenceData}};
use super::LookupResult;

impl ReferenceData {
    /// The first district, in canonical order, whose boundary contains the coordinate.
    /// A coordinate on a district edge counts as inside; no match is `None`, not an error.
    pub fn resolve(&self, coord: Coordinate) -> Option<&DistrictFeature> {
        let idx = self.geoms().first_containing(coord.to_point())?;
        self.all_features().get(idx)
    }

    /// Resolve and enrich a known coordinate. Out-of-range coordinates are rejected
    /// up front; a valid one outside every district is `DistrictNotFound`.
    pub fn locate(&self, coord: Coordinate) -> Result<LookupResult, LookupError> {
        if !coord.is_valid() {
            return Err(LookupError::Validation(format!("invalid coordinate: {}, {}", coord.lon, coord.lat)));
        }
        let feature = self.resolve(coord).ok_or_else(|| {
            tracing::debug!(lon = coord.lon, lat = coord.lat, "no district contains coordinate");
            LookupError::DistrictNotFound
        })?;
        Ok(self.enrich(feature, coord))
    }
}
