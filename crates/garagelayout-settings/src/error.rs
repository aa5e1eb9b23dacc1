//! Error types for the settings crate.
//!
//! Configuration problems surface as [`SettingsError`]; snapshot storage
//! problems as [`StorageError`], which callers usually log and ignore.

use std::io;
use thiserror::Error;

/// Config file failures and rejected values.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Failed to save config: {0}")]
    SaveError(String),

    /// Rejected by [`crate::Config::validate`].
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// A `.json` config that does not parse.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A `.toml` config that does not parse.
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Problems locating or recognizing the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Extension other than `json` or `toml`.
    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

/// Snapshot store failures. Logged by the store's lenient entry points.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Snapshot I/O error: {0}")]
    IoError(#[from] io::Error),

    /// The stored document is not a valid site.
    #[error("Snapshot is not a valid site: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

pub type StorageResult<T> = Result<T, StorageError>;
