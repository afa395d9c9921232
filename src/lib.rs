#![doc = "District lookup public API"]
mod common;
mod config;
mod error;
mod geocode;
mod geom;
mod lookup;
mod normalize;
mod reference;

#[doc(inline)]
pub use config::{Config, GeocoderConfig, NormalizerChoice};

#[doc(inline)]
pub use error::{GeocodeError, LookupError, Status};

#[doc(inline)]
pub use geocode::{Coordinate, Geocoder, NominatimClient};

#[doc(inline)]
pub use lookup::{DistrictLookup, LookupResult, respond};

#[doc(inline)]
pub use normalize::{AddressComponents, Normalize, Normalizer, PatternNormalizer, StructuredNormalizer};

#[doc(inline)]
pub use reference::{DistrictFeature, ReferenceData, SchoolEntry, SchoolTable, district_id};
