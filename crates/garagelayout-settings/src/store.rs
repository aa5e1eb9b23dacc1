//! Site snapshot persistence.
//!
//! The whole site is written as one JSON document
//! `{"garages": [...], "timestamp": <ms since epoch>}` after every change and
//! read back once at startup. Failures are logged by the `persist` and
//! `load_on_startup` entry points and never reach the editor.

use chrono::Utc;
use garagelayout_core::{Garage, Site};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::StorageResult;

/// Storage key; also the snapshot's file stem.
pub const STORAGE_KEY: &str = "garagelayout-site-config";

/// Stored document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSite {
    #[serde(default)]
    pub garages: Vec<Garage>,
    /// Milliseconds since the Unix epoch at save time.
    #[serde(default)]
    pub timestamp: i64,
}

impl StoredSite {
    pub fn into_site(self) -> Site {
        Site {
            garages: self.garages,
        }
    }
}

/// File-backed snapshot store.
#[derive(Debug, Clone)]
pub struct SiteStore {
    path: PathBuf,
}

impl SiteStore {
    /// Store inside `directory`.
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            path: directory.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Store inside the configured storage directory.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.storage.directory)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the snapshot stamped with the current time.
    pub fn save(&self, site: &Site) -> StorageResult<StoredSite> {
        let stored = StoredSite {
            garages: site.garages.clone(),
            timestamp: Utc::now().timestamp_millis(),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(&stored)?)?;
        tracing::debug!("Saved site snapshot to {}", self.path.display());
        Ok(stored)
    }

    /// Reads the snapshot, `None` when nothing has been stored yet.
    pub fn load(&self) -> StorageResult<Option<StoredSite>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Saves after a change, logging instead of failing.
    pub fn persist(&self, site: &Site) -> bool {
        match self.save(site) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Failed to save site snapshot: {}", e);
                false
            }
        }
    }

    /// Startup load. The stored site is returned only when `current` has no
    /// devices yet, so edits made before the load are never overwritten.
    pub fn load_on_startup(&self, current: &Site) -> Option<Site> {
        if current.has_devices() {
            tracing::info!("Current site already has devices; ignoring stored snapshot");
            return None;
        }
        match self.load() {
            Ok(Some(stored)) => {
                tracing::info!(
                    "Loaded site snapshot with {} garages (saved at {})",
                    stored.garages.len(),
                    stored.timestamp
                );
                Some(stored.into_site())
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Failed to load site snapshot: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garagelayout_core::{DeviceType, Level, NewDevice};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn site_with_device() -> Site {
        let mut level = Level::new("L1", "Ground");
        level
            .devices
            .push(NewDevice::new(DeviceType::CamDome, "Dome").build("dev-1", "G", "Ground"));
        let mut garage = Garage::new("g1", "G");
        garage.levels.push(level);
        Site {
            garages: vec![garage],
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = SiteStore::new(dir.path());
        let site = site_with_device();
        let saved = store.save(&site).unwrap();
        assert!(saved.timestamp > 0);

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.into_site(), site);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert!(raw["garages"].is_array());
        assert!(raw["timestamp"].is_i64());
    }

    #[test]
    fn test_startup_load_respects_existing_devices() {
        let dir = TempDir::new().unwrap();
        let store = SiteStore::new(dir.path());
        let stored = site_with_device();
        store.save(&stored).unwrap();

        assert_eq!(store.load_on_startup(&Site::default()), Some(stored.clone()));
        assert_eq!(store.load_on_startup(&stored), None);
    }

    #[test]
    fn test_missing_or_corrupt_snapshot_is_ignored() {
        let dir = TempDir::new().unwrap();
        let store = SiteStore::new(dir.path());
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.load_on_startup(&Site::default()), None);

        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_err());
        assert_eq!(store.load_on_startup(&Site::default()), None);
    }
}
