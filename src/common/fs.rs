use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Error unless the file already exists.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Path exists but is not a file: {}", path.display());
    }
    Ok(())
}

/// Read the whole file into memory, checking that it exists first.
pub(crate) fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    require_file_exists(path)?;
    fs::read(path).with_context(|| format!("Failed to read file {}", path.display()))
}

/// Read the whole file as UTF-8 text, checking that it exists first.
pub(crate) fn read_file_string(path: &Path) -> Result<String> {
    require_file_exists(path)?;
    fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
