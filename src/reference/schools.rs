use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, anyhow, bail};
use serde_json::Value;

use super::district::scalar_to_string;

/// School names for one district, keyed by level (`elementary`, `middle`, `high`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolEntry {
    schools: BTreeMap<String, String>,
}

impl SchoolEntry {
    pub fn new<K: Into<String>, V: Into<String>>(schools: impl IntoIterator<Item = (K, V)>) -> Self {
        Self { schools: schools.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// School name for the given level, if present.
    pub fn get(&self, level: &str) -> Option<&str> {
        self.schools.get(level).map(String::as_str)
    }

    /// Iterate `(level, school name)` pairs in level order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.schools.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline] pub fn len(&self) -> usize { self.schools.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.schools.is_empty() }
}

/// Mapping from district identifier to the schools serving that district.
#[derive(Debug, Clone, Default)]
pub struct SchoolTable {
    entries: HashMap<String, SchoolEntry>,
}

impl SchoolTable {
    pub fn new(entries: impl IntoIterator<Item = (String, SchoolEntry)>) -> Self {
        Self { entries: entries.into_iter().collect() }
    }

    /// Parse a JSON object of the form `{ "<district id>": { "<level>": "<school>", ... }, ... }`.
    /// Null school values are dropped; numbers and booleans are stringified.
    pub(crate) fn from_json(value: &Value) -> Result<Self> {
        let table = value.as_object()
            .ok_or_else(|| anyhow!("school table must be a JSON object keyed by district identifier"))?;

        let mut entries = HashMap::with_capacity(table.len());
        for (id, schools) in table {
            let id = id.trim();
            if id.is_empty() {
                bail!("school table has an empty district identifier");
            }
            let schools = schools.as_object()
                .ok_or_else(|| anyhow!("school entry for district {id} must be an object"))?;

            let mut entry = BTreeMap::new();
            for (level, name) in schools {
                match name {
                    Value::Null => continue,
                    Value::Array(_) | Value::Object(_) => {
                        bail!("school {level:?} for district {id} must be a string")
                    }
                    scalar => {
                        if let Some(name) = scalar_to_string(scalar) {
                            entry.insert(level.clone(), name);
                        }
                    }
                }
            }
            entries.insert(id.to_string(), SchoolEntry { schools: entry });
        }

        Ok(Self { entries })
    }

    /// Look up the schools for a district identifier.
    pub fn get(&self, id: &str) -> Option<&SchoolEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
