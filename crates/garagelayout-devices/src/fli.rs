//! Per-camera FLI plugin documents. These are write-only.

use garagelayout_core::{sanitize_file_name, Device, DeviceType};

use crate::error::XmlResult;
use crate::tree::XmlDoc;

/// Fixed plugin settings written after the camera name, in document order.
pub const FLI_PLUGIN_SETTINGS: [(&str, &str); 7] = [
    ("PluginType", "FLI"),
    ("Enabled", "true"),
    ("DetectionZone", "FULL"),
    ("ConfidenceThreshold", "0.75"),
    ("MinTrackFrames", "3"),
    ("EventCooldownSeconds", "2"),
    ("ReportOccupancy", "true"),
];

/// `<PluginConfig>` document for one camera.
pub fn generate_fli_config(camera_name: &str) -> XmlResult<String> {
    let mut doc = XmlDoc::new()?;
    doc.open("PluginConfig")?;
    doc.field("CameraName", camera_name)?;
    for (name, value) in FLI_PLUGIN_SETTINGS {
        doc.field(name, value)?;
    }
    doc.close("PluginConfig")?;
    doc.finish()
}

/// File name for a camera's plugin document, e.g. `FLI_Entry_1.xml`.
pub fn fli_file_name(camera_name: &str) -> String {
    format!("FLI_{}.xml", sanitize_file_name(camera_name))
}

/// `(file name, document)` for every FLI camera in `devices`.
pub fn generate_fli_configs<'a>(
    devices: impl IntoIterator<Item = &'a Device>,
) -> XmlResult<Vec<(String, String)>> {
    devices
        .into_iter()
        .filter(|d| d.device_type == DeviceType::CamFli)
        .map(|d| Ok((fli_file_name(&d.name), generate_fli_config(&d.name)?)))
        .collect()
}
