//! Manual dependency mapping: user-maintained overrides for packages the
//! registries cannot answer for.

use crate::domain::model::Ecosystem;
use crate::utils::error::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct MappingEntry {
    pub dependency_name: String,
    pub dependency_type: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub documentation_url: String,
}

/// Lookup table keyed "<ecosystem>:<name>", both lowercased.
#[derive(Debug, Default)]
pub struct MappingTable {
    entries: HashMap<String, MappingEntry>,
}

impl MappingTable {
    /// Load the mapping CSV. A missing file is normal (first run) and yields
    /// an empty table; malformed rows are skipped with a warning.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No mapping file at {}", path.display());
            return Ok(Self::default());
        }

        let mut reader = csv::Reader::from_path(path)?;
        let mut entries = HashMap::new();
        for row in reader.deserialize::<MappingEntry>() {
            match row {
                Ok(entry) => {
                    let key = format!(
                        "{}:{}",
                        entry.dependency_type.to_lowercase(),
                        entry.dependency_name.to_lowercase()
                    );
                    entries.insert(key, entry);
                }
                Err(e) => tracing::warn!("Skipping malformed mapping row: {}", e),
            }
        }
        tracing::info!("Loaded {} entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    pub fn get(&self, ecosystem: Ecosystem, name: &str) -> Option<&MappingEntry> {
        self.entries
            .get(&format!("{}:{}", ecosystem.key(), name.to_lowercase()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
