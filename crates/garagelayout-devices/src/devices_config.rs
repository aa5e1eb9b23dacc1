//! `DevicesConfig` documents: a flat list of every device with its address
//! and coarse type.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Devices>
//!   <Device>
//!     <Name>Entry1</Name>
//!     <IPAddress>10.16.6.45</IPAddress>
//!     <Port>554</Port>
//!     <Type>CAMERA</Type>
//!   </Device>
//! </Devices>
//! ```

use garagelayout_core::data::device::{DEFAULT_CAMERA_PORT, DEFAULT_STATIC_SIGN_PORT};
use garagelayout_core::{Device, DeviceFamily, DeviceType, IdGenerator, NewDevice, Site};

use crate::error::{XmlError, XmlResult};
use crate::placement::ImportPlacement;
use crate::tree::{self, XmlDoc};

/// Default file name for the document.
pub const DEVICES_CONFIG_FILE: &str = "DevicesConfig.xml";

const ROOT: &str = "Devices";

/// `Type` tag for a device family.
pub fn type_tag(family: DeviceFamily) -> &'static str {
    match family {
        DeviceFamily::Camera => "CAMERA",
        DeviceFamily::Sign => "SIGNCONTROLLER",
        DeviceFamily::Sensor => "SENSOR",
    }
}

/// Device type an imported `Type` tag becomes.
pub fn device_type_for_tag(tag: &str) -> Option<DeviceType> {
    match tag.trim().to_ascii_uppercase().as_str() {
        "CAMERA" => Some(DeviceType::CamFli),
        "SIGNCONTROLLER" => Some(DeviceType::SignLed),
        "SENSOR" => Some(DeviceType::SensorSpace),
        _ => None,
    }
}

/// Port written when the device has none.
fn fallback_port(family: DeviceFamily) -> &'static str {
    match family {
        DeviceFamily::Sign => DEFAULT_STATIC_SIGN_PORT,
        _ => DEFAULT_CAMERA_PORT,
    }
}

/// Generates the document for every device of every garage and level.
pub fn generate_devices_config(site: &Site) -> XmlResult<String> {
    generate_devices_config_for(site.all_devices())
}

/// Generates the document for an explicit device list.
pub fn generate_devices_config_for<'a>(
    devices: impl IntoIterator<Item = &'a Device>,
) -> XmlResult<String> {
    let mut doc = XmlDoc::new()?;
    doc.open(ROOT)?;
    let mut count = 0usize;
    for device in devices {
        let family = device.family();
        let (ip, port) = device.address().unwrap_or(("", ""));
        let port = if port.trim().is_empty() {
            fallback_port(family)
        } else {
            port
        };
        doc.open("Device")?;
        doc.field("Name", &device.name)?;
        doc.field("IPAddress", ip)?;
        doc.field("Port", port)?;
        doc.field("Type", type_tag(family))?;
        doc.close("Device")?;
        count += 1;
    }
    doc.close(ROOT)?;
    tracing::debug!("Generated DevicesConfig with {} devices", count);
    doc.finish()
}

/// Parses a document into new devices, failing on malformed input.
///
/// Each `<Device>` gets a fresh id from `ids` and a position from
/// `placement`. Entries with an unknown `Type` are skipped.
pub fn try_parse_devices_config(
    xml: &str,
    ids: &mut IdGenerator,
    placement: ImportPlacement,
) -> XmlResult<Vec<Device>> {
    let root = tree::parse(xml)?;
    if root.name != ROOT {
        return Err(XmlError::UnexpectedRoot {
            expected: ROOT.to_string(),
            found: root.name,
        });
    }

    let mut placer = placement.placer();
    let mut devices = Vec::new();
    for node in root.children_named("Device") {
        let tag = node.child_text("Type");
        let Some(device_type) = device_type_for_tag(&tag) else {
            tracing::warn!("Skipping device with unknown type '{}'", tag);
            continue;
        };
        let mut port = node.child_text("Port");
        if port.is_empty() {
            port = fallback_port(device_type.family()).to_string();
        }
        let (x, y) = placer.next_position();
        let device = NewDevice::new(device_type, node.child_text("Name"))
            .at(x, y)
            .with_address(node.child_text("IPAddress"), port)
            .build(ids.next_id(), "", "");
        devices.push(device);
    }
    tracing::info!("Parsed {} devices from DevicesConfig", devices.len());
    Ok(devices)
}

/// Parses a document, logging malformed input and returning no devices.
pub fn parse_devices_config(
    xml: &str,
    ids: &mut IdGenerator,
    placement: ImportPlacement,
) -> Vec<Device> {
    match try_parse_devices_config(xml, ids, placement) {
        Ok(devices) => devices,
        Err(e) => {
            tracing::error!("Failed to parse DevicesConfig: {}", e);
            Vec::new()
        }
    }
}
