//! Dashboard document on disk.
//!
//! The header configuration lives under the `cch` member of the dashboard
//! JSON document. Saving rewrites only that member and leaves every other
//! member of the document as it was.

use cch_schema::DefaultTable;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{ConfigStore, StoreError};
use crate::root::RootConfig;

/// Member of the dashboard document holding the header configuration.
pub const CCH_KEY: &str = "cch";

/// Store backed by a dashboard JSON file and an optional TOML defaults file.
#[derive(Debug, Clone)]
pub struct DashboardFileStore {
    path: PathBuf,
    defaults_path: Option<PathBuf>,
}

impl DashboardFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            defaults_path: None,
        }
    }

    /// Read host defaults from a flat TOML table applied over the builtin
    /// table.
    pub fn with_defaults_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.defaults_path = Some(path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the dashboard document. A missing file reads as an empty
    /// document.
    fn read_document(&self) -> Result<Map<String, Value>, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "dashboard file missing, starting empty");
            return Ok(Map::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| StoreError::Io(e.to_string()))?;
        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::Parse(
                "dashboard document is not a JSON object".to_string(),
            )),
            Err(e) => Err(StoreError::Parse(format!("JSON parse error: {}", e))),
        }
    }

    fn parse_config(document: &Map<String, Value>) -> Result<RootConfig, StoreError> {
        match document.get(CCH_KEY) {
            None | Some(Value::Null) => Ok(RootConfig::default()),
            Some(raw) => serde_json::from_value(raw.clone())
                .map_err(|e| StoreError::Parse(format!("{}: {}", CCH_KEY, e))),
        }
    }

    /// Write through a sibling temporary file so readers never see a
    /// partially written document.
    fn write_document(&self, document: Map<String, Value>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&Value::Object(document))
            .map_err(|e| StoreError::Parse(format!("JSON serialization failed: {}", e)))?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "dashboard.json".to_string());
        let tmp = self.path.with_file_name(format!(".{}.tmp", file_name));

        fs::write(&tmp, json).map_err(|e| StoreError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            StoreError::Io(e.to_string())
        })
    }
}

impl ConfigStore for DashboardFileStore {
    fn load_current(&self) -> Result<RootConfig, StoreError> {
        let document = self.read_document()?;
        Self::parse_config(&document)
    }

    fn save(&mut self, config: &RootConfig) -> Result<(), StoreError> {
        let mut document = self.read_document()?;
        let value = serde_json::to_value(config)
            .map_err(|e| StoreError::Parse(format!("JSON serialization failed: {}", e)))?;
        document.insert(CCH_KEY.to_string(), value);
        self.write_document(document)?;

        // A save only counts if reading the document back yields what was written.
        let stored = Self::parse_config(&self.read_document()?)?;
        if &stored != config {
            return Err(StoreError::Rejected(
                "stored configuration does not match the saved one".to_string(),
            ));
        }

        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    fn defaults(&self) -> Result<DefaultTable, StoreError> {
        let builtin = DefaultTable::builtin();
        let Some(path) = &self.defaults_path else {
            return Ok(builtin);
        };

        let contents = fs::read_to_string(path).map_err(|e| StoreError::Io(e.to_string()))?;
        let defaults = builtin
            .with_overrides_toml(&contents)
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        debug!(path = %path.display(), "loaded host defaults");
        Ok(defaults)
    }
}
