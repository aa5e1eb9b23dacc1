//! GarageLayout Settings Crate
//!
//! Handles application configuration and persistence of the site snapshot.

pub mod config;
pub mod error;
pub mod store;

pub use config::{CanvasSettings, Config, ExportSettings, StorageSettings};
pub use error::{
    ConfigError, SettingsError, SettingsResult, StorageError, StorageResult,
};
pub use store::{SiteStore, StoredSite, STORAGE_KEY};
