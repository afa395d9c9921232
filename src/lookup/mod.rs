mod enrich;
mod orchestrator;
mod resolve;

pub use enrich::LookupResult;
pub use orchestrator::{DistrictLookup, respond};
