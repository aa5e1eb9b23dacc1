//! Reading configuration files and writing generated documents to disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use garagelayout_core::Site;

use crate::camera_hub::{generate_camera_hub_config, CAMERA_HUB_FILE};
use crate::devices_config::{generate_devices_config, DEVICES_CONFIG_FILE};
use crate::fli::generate_fli_configs;

/// Reads a file as UTF-8 text.
pub fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Writes `content` to `dir/file_name`, creating `dir` if needed.
pub fn write_document(dir: impl AsRef<Path>, file_name: &str, content: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    let path = dir.join(file_name);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(path)
}

/// Writes the DevicesConfig, the CameraHub config and one FLI document per
/// FLI camera into `dir`. Returns the written paths in that order.
pub fn export_all(site: &Site, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut written = vec![
        write_document(dir, DEVICES_CONFIG_FILE, &generate_devices_config(site)?)?,
        write_document(dir, CAMERA_HUB_FILE, &generate_camera_hub_config(site)?)?,
    ];
    for (file_name, xml) in generate_fli_configs(site.all_devices())? {
        written.push(write_document(dir, &file_name, &xml)?);
    }
    tracing::info!("Exported {} configuration files to {}", written.len(), dir.display());
    Ok(written)
}
