//! # GarageLayout Devices
//!
//! XML configuration codec for the on-site control stack:
//! - `DevicesConfig`: every device with address and coarse type, both ways
//! - `CameraHubConfig`: camera stream settings, both ways
//! - FLI plugin documents, one per FLI camera, write only
//!
//! Parsers come in two forms. The `try_*` functions return [`XmlError`];
//! the plain ones log the failure and return no devices.

pub mod camera_hub;
pub mod devices_config;
pub mod error;
pub mod export;
pub mod fli;
pub mod placement;
mod tree;

pub use camera_hub::{
    extract_ip, extract_port, generate_camera_hub_config, generate_camera_hub_config_for,
    parse_camera_hub_config, rtsp_url, try_parse_camera_hub_config, CAMERA_HUB_FILE,
};
pub use devices_config::{
    generate_devices_config, generate_devices_config_for, parse_devices_config,
    try_parse_devices_config, DEVICES_CONFIG_FILE,
};
pub use error::{XmlError, XmlResult};
pub use export::{export_all, read_text_file, write_document};
pub use fli::{fli_file_name, generate_fli_config, generate_fli_configs};
pub use placement::ImportPlacement;
