use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::common::read_file_bytes;

/// Reads a JSON document from the file at `path`.
pub(crate) fn read_json_file(path: &Path) -> Result<Value> {
    let bytes = read_file_bytes(path)?;
    read_json_bytes(&bytes)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))
}

/// Reads a JSON document from bytes.
pub(crate) fn read_json_bytes(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).context("Failed to parse JSON bytes")
}
