mod geojson;
mod json;

pub(crate) use geojson::*;
pub(crate) use json::*;
