//! Region hierarchy loaded from the JMA `areas.json` document.
//!
//! Only the top-level `centers` mapping is read. Each center carries a
//! display `name` and a `children` list whose entries are either bare area
//! code strings or objects with a `code` field.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::{ForecastError, Result};
use crate::types::{AreaCode, ChildArea, Region};

#[derive(Debug, Deserialize)]
struct AreasDocument {
    centers: BTreeMap<String, CenterEntry>,
}

#[derive(Debug, Deserialize)]
struct CenterEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    children: Vec<serde_json::Value>,
}

/// Read-only mapping from region key to [`Region`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionCatalog {
    regions: BTreeMap<String, Region>,
}

impl RegionCatalog {
    /// Load the catalog from a file.
    ///
    /// # Errors
    /// Returns [`ForecastError::Io`] if the file cannot be read and
    /// [`ForecastError::Parse`] if it is not JSON with a `centers` object.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ForecastError::Io(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_json_str(&content)?;
        debug!(path = %path.display(), regions = catalog.len(), "Loaded region catalog");
        Ok(catalog)
    }

    /// Parse the catalog from a JSON string.
    ///
    /// # Errors
    /// Returns [`ForecastError::Parse`] if the content is not JSON with a
    /// `centers` object.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: AreasDocument = serde_json::from_str(content)
            .map_err(|e| ForecastError::Parse(format!("Invalid region file: {e}")))?;

        let regions = document
            .centers
            .into_iter()
            .map(|(key, entry)| {
                let children = entry
                    .children
                    .into_iter()
                    .filter_map(|value| match serde_json::from_value::<ChildArea>(value) {
                        Ok(child) => Some(child.code()),
                        Err(_) => {
                            debug!(region = %key, "Skipping child entry without a code");
                            None
                        }
                    })
                    .collect::<Vec<AreaCode>>();
                let name = entry.name.unwrap_or_else(|| key.clone());
                (key.clone(), Region::new(key, name, children))
            })
            .collect();

        Ok(Self { regions })
    }

    /// Returns the region with the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Region> {
        self.regions.get(key)
    }

    /// Returns the region with the given key, or [`ForecastError::RegionNotFound`].
    ///
    /// # Errors
    /// Fails when the key is not in the catalog.
    pub fn require(&self, key: &str) -> Result<&Region> {
        self.get(key)
            .ok_or_else(|| ForecastError::RegionNotFound(key.to_string()))
    }

    /// Iterates over regions ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns true if the catalog has no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "centers": {
            "010100": {"name": "北海道地方", "children": ["011000", "012000"]},
            "010300": {"name": "関東甲信地方", "children": [{"code": "130000", "name": "東京都"}, "140000"]},
            "010900": {"children": ["471000", 42, {"name": "no code"}]}
        },
        "offices": {}
    }"#;

    #[test]
    fn test_every_center_is_present() {
        let catalog = RegionCatalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.get("010100").is_some());
        assert!(catalog.get("010300").is_some());
        assert!(catalog.get("010900").is_some());
    }

    #[test]
    fn test_children_preserved_in_order() {
        let catalog = RegionCatalog::from_json_str(SAMPLE).unwrap();
        let hokkaido = catalog.get("010100").unwrap();
        assert_eq!(hokkaido.name, "北海道地方");
        assert_eq!(
            hokkaido.children,
            vec![AreaCode::new("011000"), AreaCode::new("012000")]
        );

        let kanto = catalog.get("010300").unwrap();
        assert_eq!(
            kanto.children,
            vec![AreaCode::new("130000"), AreaCode::new("140000")]
        );
    }

    #[test]
    fn test_unusable_children_skipped_and_name_defaults_to_key() {
        let catalog = RegionCatalog::from_json_str(SAMPLE).unwrap();
        let okinawa = catalog.get("010900").unwrap();
        assert_eq!(okinawa.name, "010900");
        assert_eq!(okinawa.children, vec![AreaCode::new("471000")]);
    }

    #[test]
    fn test_missing_centers_is_parse_error() {
        let err = RegionCatalog::from_json_str(r#"{"offices": {}}"#).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = RegionCatalog::from_json_str("not json").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_require_unknown_region() {
        let catalog = RegionCatalog::from_json_str(SAMPLE).unwrap();
        assert!(matches!(
            catalog.require("999999"),
            Err(ForecastError::RegionNotFound(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = RegionCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RegionCatalog::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ForecastError::Io(_)));
    }
}
