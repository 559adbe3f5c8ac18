use crate::error::{Result, SortError};
use log::warn;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Owner, group, and base path configured for one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyEntry {
    pub owner: String,
    pub group: String,
    pub base_path: PathBuf,
}

/// Region-keyed placement policy, loaded once at startup
///
/// The side-car file holds one whitespace-separated record per line:
///
/// ```text
/// <regionKey> <owner> <group> <basePath>
/// ```
///
/// Lines that do not fit the schema (including blank lines and `#` comments)
/// are skipped with a warning rather than faulting the run. Lookups never
/// write the table back.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable(HashMap<String, PolicyEntry>);

impl PolicyTable {
    /// Loads the policy table from its side-car file
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SortError::Config(format!("cannot read policy file {}: {}", path.display(), e))
        })?;
        Ok(Self::parse(&text))
    }

    /// Parses policy records from text, skipping malformed lines
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(region), Some(owner), Some(group), Some(base)) => {
                    entries.insert(
                        region.to_string(),
                        PolicyEntry {
                            owner: owner.to_string(),
                            group: group.to_string(),
                            base_path: PathBuf::from(base),
                        },
                    );
                }
                _ => {
                    warn!("skipping malformed policy line {}: {:?}", lineno + 1, line);
                }
            }
        }
        Self(entries)
    }

    /// Looks up the entry for a region, if configured
    pub fn lookup(&self, region: &str) -> Option<&PolicyEntry> {
        self.0.get(region)
    }

    /// Number of configured regions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no regions are configured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, PolicyEntry)> for PolicyTable {
    fn from_iter<I: IntoIterator<Item = (String, PolicyEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
