mod district;
mod schools;
mod store;

pub use district::{DistrictFeature, district_id};
pub use schools::{SchoolEntry, SchoolTable};
pub use store::ReferenceData;
