//! Persistent per-package settings
//!
//! Settings live in a single flat JSON document keyed by
//! `"<namespace>.<package>"`, so unrelated tools sharing the document never
//! collide with our records.

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::{SETTINGS_NAMESPACE, settings_path};
use crate::error::StoreError;

/// Outcome of an update check, as persisted per package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    /// Whether `latest` is newer than `current`.
    pub update_available: bool,
    /// Version the registry's dist-tag resolved to.
    pub latest: String,
    /// Version that was installed when the check ran.
    pub current: String,
    /// When the check ran, in milliseconds since the UNIX epoch.
    pub last_update_check: i64,
}

/// Document key under which a package's record is stored.
pub fn namespaced_key(package: &str) -> String {
    format!("{SETTINGS_NAMESPACE}.{package}")
}

/// Trait for reading and writing per-package settings records.
#[cfg_attr(test, automock)]
pub trait SettingsStore: Send + Sync {
    /// Merges `patch` into the package's record, creating it if absent.
    /// Fields not named in `patch` keep their stored values.
    fn set(&self, package: &str, patch: &Map<String, Value>) -> Result<(), StoreError>;

    /// Reads a single field of the package's record.
    fn get(&self, package: &str, field: &str) -> Result<Option<Value>, StoreError>;

    /// Replaces the package's record wholesale.
    fn save_record(&self, package: &str, record: &UpdateRecord) -> Result<(), StoreError>;

    /// Reads the package's record, if one has been saved.
    fn load_record(&self, package: &str) -> Result<Option<UpdateRecord>, StoreError>;
}

/// [`SettingsStore`] backed by a JSON file on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store at the default settings path.
    pub fn new() -> Self {
        Self {
            path: settings_path(),
        }
    }

    /// Creates a store at a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&text) {
            Ok(document) => Ok(document),
            Err(e) => {
                // An unreadable document is abandoned rather than kept fatal,
                // the next write rebuilds it
                warn!(
                    "Settings document at {:?} is not valid JSON, treating as empty: {}",
                    self.path, e
                );
                Ok(Map::new())
            }
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let text = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for JsonFileStore {
    fn set(&self, package: &str, patch: &Map<String, Value>) -> Result<(), StoreError> {
        let mut document = self.read_document()?;

        let record = document
            .entry(namespaced_key(package))
            .or_insert_with(|| Value::Object(Map::new()));
        if !record.is_object() {
            *record = Value::Object(Map::new());
        }
        if let Value::Object(fields) = record {
            for (field, value) in patch {
                fields.insert(field.clone(), value.clone());
            }
        }

        self.write_document(&document)
    }

    fn get(&self, package: &str, field: &str) -> Result<Option<Value>, StoreError> {
        let document = self.read_document()?;

        Ok(document
            .get(&namespaced_key(package))
            .and_then(|record| record.get(field))
            .cloned())
    }

    fn save_record(&self, package: &str, record: &UpdateRecord) -> Result<(), StoreError> {
        let mut document = self.read_document()?;
        document.insert(namespaced_key(package), serde_json::to_value(record)?);
        self.write_document(&document)
    }

    fn load_record(&self, package: &str) -> Result<Option<UpdateRecord>, StoreError> {
        let document = self.read_document()?;

        match document.get(&namespaced_key(package)) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }
}
