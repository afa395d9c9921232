mod nominatim;

use async_trait::async_trait;
use geo::Point;
use serde::Serialize;

pub use nominatim::NominatimClient;

use crate::error::GeocodeError;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self { Self { lon, lat } }

    /// True when both ordinates are finite and inside the WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    #[inline] pub fn to_point(self) -> Point<f64> { Point::new(self.lon, self.lat) }
}

/// Resolves a normalized address to a coordinate via some provider.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError>;
}

#[async_trait]
impl<G: Geocoder + ?Sized> Geocoder for std::sync::Arc<G> {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        (**self).geocode(address).await
    }
}
