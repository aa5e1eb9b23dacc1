//! Device markers: cameras, occupancy sensors and signs.
//!
//! Cameras hold a normalized list of one or two [`Stream`]s. Stored
//! snapshots carry the first stream twice, once as flat top-level fields and
//! once as a nested `stream1` block; [`DeviceRecord`] reconciles the two on
//! the JSON boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::element::{FlowDirection, SpotType};
use super::lenient;
use crate::error::LayoutError;

/// Flow destination sentinel for vehicles leaving through the garage entry.
pub const GARAGE_ENTRY: &str = "garage-entry";
/// Flow destination sentinel for vehicles leaving through the garage exit.
pub const GARAGE_EXIT: &str = "garage-exit";

/// Default RTSP port for cameras.
pub const DEFAULT_CAMERA_PORT: &str = "554";
/// Default port for designable and LED signs.
pub const DEFAULT_SIGN_PORT: &str = "80";
/// Default port for static sign controllers.
pub const DEFAULT_STATIC_SIGN_PORT: &str = "10001";
/// Default display status for static signs.
pub const DEFAULT_DISPLAY_STATUS: &str = "OPEN";

/// Concrete device type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceType {
    CamDome,
    CamPtz,
    CamLpr,
    CamFli,
    CamPeople,
    SensorSpace,
    SignDesignable,
    SignStatic,
    SignLed,
}

/// Device family derived from the type prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    Camera,
    Sensor,
    Sign,
}

impl DeviceType {
    /// All known device types in palette order.
    pub const ALL: [DeviceType; 9] = [
        Self::CamDome,
        Self::CamPtz,
        Self::CamLpr,
        Self::CamFli,
        Self::CamPeople,
        Self::SensorSpace,
        Self::SignDesignable,
        Self::SignStatic,
        Self::SignLed,
    ];

    pub fn family(self) -> DeviceFamily {
        match self {
            Self::CamDome | Self::CamPtz | Self::CamLpr | Self::CamFli | Self::CamPeople => {
                DeviceFamily::Camera
            }
            Self::SensorSpace => DeviceFamily::Sensor,
            Self::SignDesignable | Self::SignStatic | Self::SignLed => DeviceFamily::Sign,
        }
    }

    /// The type tag as stored, e.g. `cam-fli`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CamDome => "cam-dome",
            Self::CamPtz => "cam-ptz",
            Self::CamLpr => "cam-lpr",
            Self::CamFli => "cam-fli",
            Self::CamPeople => "cam-people",
            Self::SensorSpace => "sensor-space",
            Self::SignDesignable => "sign-designable",
            Self::SignStatic => "sign-static",
            Self::SignLed => "sign-led",
        }
    }

    /// The part after the family prefix, e.g. `fli` for `cam-fli`.
    pub fn suffix(self) -> &'static str {
        let tag = self.as_str();
        tag.split_once('-').map(|(_, rest)| rest).unwrap_or(tag)
    }

    /// Default port for a freshly created device of this type.
    pub fn default_port(self) -> &'static str {
        match self {
            Self::SignStatic => DEFAULT_STATIC_SIGN_PORT,
            Self::SignDesignable | Self::SignLed => DEFAULT_SIGN_PORT,
            _ => DEFAULT_CAMERA_PORT,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or(LayoutError::UnknownType(tag))
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera => write!(f, "camera"),
            Self::Sensor => write!(f, "sensor"),
            Self::Sign => write!(f, "sign"),
        }
    }
}

/// Camera lens configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HardwareType {
    #[default]
    SingleLens,
    DualLens,
}

/// One camera video stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stream {
    #[serde(deserialize_with = "lenient::text")]
    pub ip_address: String,
    #[serde(deserialize_with = "lenient::text")]
    pub port: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    pub direction: FlowDirection,
    /// Degrees, 0 = up.
    pub rotation: f64,
    pub flow_destination: String,
}

impl Default for Stream {
    fn default() -> Self {
        Self {
            ip_address: String::new(),
            port: DEFAULT_CAMERA_PORT.to_string(),
            external_url: None,
            direction: FlowDirection::In,
            rotation: 0.0,
            flow_destination: GARAGE_ENTRY.to_string(),
        }
    }
}

impl Stream {
    /// Creates a stream with the given address and default orientation.
    pub fn with_address(ip_address: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            port: port.into(),
            ..Self::default()
        }
    }

    /// Applies a stream patch.
    pub fn apply(&mut self, patch: &StreamPatch) {
        if let Some(ip) = &patch.ip_address {
            self.ip_address = ip.clone();
        }
        if let Some(port) = &patch.port {
            self.port = port.clone();
        }
        if let Some(url) = &patch.external_url {
            self.external_url = url.clone();
        }
        if let Some(direction) = patch.direction {
            self.direction = direction;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(dest) = &patch.flow_destination {
            self.flow_destination = dest.clone();
        }
    }
}

/// Override state of a sign. Only `auto` has a known meaning; any other
/// value is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OverrideState {
    #[default]
    Auto,
    Other(String),
}

impl From<String> for OverrideState {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("auto") {
            Self::Auto
        } else {
            Self::Other(value)
        }
    }
}

impl From<OverrideState> for String {
    fn from(value: OverrideState) -> Self {
        match value {
            OverrideState::Auto => "auto".to_string(),
            OverrideState::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub hardware_type: HardwareType,
    /// One stream, or two when `hardware_type` is dual-lens.
    pub streams: Vec<Stream>,
    pub view_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignConfig {
    pub ip_address: String,
    pub port: String,
    pub override_state: OverrideState,
    /// Designable signs only.
    pub preview_url: Option<String>,
    /// Static signs only: ids of the levels this sign reflects.
    pub display_mapping: Vec<String>,
    /// Static signs only.
    pub display_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorConfig {
    pub serial_address: String,
    pub spot_number: Option<u32>,
    pub parking_type: SpotType,
    pub sensor_image: Option<String>,
    pub garage_name: String,
    pub level_name: String,
}

/// Family-specific device fields.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceConfig {
    Camera(CameraConfig),
    Sign(SignConfig),
    Sensor(SensorConfig),
}

impl DeviceConfig {
    /// Defaults for a new device of `device_type`.
    pub fn default_for(device_type: DeviceType) -> Self {
        match device_type.family() {
            DeviceFamily::Camera => Self::Camera(CameraConfig {
                hardware_type: HardwareType::SingleLens,
                streams: vec![Stream::default()],
                view_image: None,
            }),
            DeviceFamily::Sign => Self::Sign(SignConfig {
                ip_address: String::new(),
                port: device_type.default_port().to_string(),
                override_state: OverrideState::Auto,
                preview_url: None,
                display_mapping: Vec::new(),
                display_status: (device_type == DeviceType::SignStatic)
                    .then(|| DEFAULT_DISPLAY_STATUS.to_string()),
            }),
            DeviceFamily::Sensor => Self::Sensor(SensorConfig {
                serial_address: String::new(),
                spot_number: None,
                parking_type: SpotType::Regular,
                sensor_image: None,
                garage_name: String::new(),
                level_name: String::new(),
            }),
        }
    }
}

/// A device marker on a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DeviceRecord", into = "DeviceRecord")]
pub struct Device {
    pub id: String,
    pub device_type: DeviceType,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub config: DeviceConfig,
}

impl Device {
    /// Creates a device with per-type defaults.
    pub fn new(
        id: impl Into<String>,
        device_type: DeviceType,
        name: impl Into<String>,
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            id: id.into(),
            device_type,
            name: name.into(),
            x,
            y,
            config: DeviceConfig::default_for(device_type),
        }
    }

    pub fn family(&self) -> DeviceFamily {
        self.device_type.family()
    }

    pub fn camera(&self) -> Option<&CameraConfig> {
        match &self.config {
            DeviceConfig::Camera(c) => Some(c),
            _ => None,
        }
    }

    pub fn sign(&self) -> Option<&SignConfig> {
        match &self.config {
            DeviceConfig::Sign(s) => Some(s),
            _ => None,
        }
    }

    pub fn sensor(&self) -> Option<&SensorConfig> {
        match &self.config {
            DeviceConfig::Sensor(s) => Some(s),
            _ => None,
        }
    }

    /// First camera stream, if any.
    pub fn primary_stream(&self) -> Option<&Stream> {
        self.camera().and_then(|c| c.streams.first())
    }

    /// Network address of the device. Cameras report their first stream.
    /// Sensors have no network address.
    pub fn address(&self) -> Option<(&str, &str)> {
        match &self.config {
            DeviceConfig::Camera(c) => c
                .streams
                .first()
                .map(|s| (s.ip_address.as_str(), s.port.as_str())),
            DeviceConfig::Sign(s) => Some((s.ip_address.as_str(), s.port.as_str())),
            DeviceConfig::Sensor(_) => None,
        }
    }

    /// Facing of the device in degrees. Only cameras have one.
    pub fn rotation(&self) -> f64 {
        self.primary_stream().map(|s| s.rotation).unwrap_or(0.0)
    }

    /// Applies a shallow field merge. Fields for another family are ignored.
    pub fn apply(&mut self, patch: &DevicePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        match &mut self.config {
            DeviceConfig::Camera(cam) => {
                if let Some(hw) = patch.hardware_type {
                    cam.hardware_type = hw;
                }
                let wanted = match cam.hardware_type {
                    HardwareType::SingleLens => 1,
                    HardwareType::DualLens => 2,
                };
                cam.streams.resize_with(wanted, Stream::default);
                if let Some(first) = cam.streams.first_mut() {
                    if let Some(ip) = &patch.ip_address {
                        first.ip_address = ip.clone();
                    }
                    if let Some(port) = &patch.port {
                        first.port = port.clone();
                    }
                    if let Some(p) = &patch.stream1 {
                        first.apply(p);
                    }
                }
                if let (Some(second), Some(p)) = (cam.streams.get_mut(1), &patch.stream2) {
                    second.apply(p);
                }
                if let Some(image) = &patch.view_image {
                    cam.view_image = image.clone();
                }
            }
            DeviceConfig::Sign(sign) => {
                if let Some(ip) = &patch.ip_address {
                    sign.ip_address = ip.clone();
                }
                if let Some(port) = &patch.port {
                    sign.port = port.clone();
                }
                if let Some(state) = &patch.override_state {
                    sign.override_state = state.clone();
                }
                if let Some(url) = &patch.preview_url {
                    sign.preview_url = url.clone();
                }
                if let Some(mapping) = &patch.display_mapping {
                    sign.display_mapping = mapping.clone();
                }
                if let Some(status) = &patch.display_status {
                    sign.display_status = Some(status.clone());
                }
            }
            DeviceConfig::Sensor(sensor) => {
                if let Some(serial) = &patch.serial_address {
                    sensor.serial_address = serial.clone();
                }
                if let Some(number) = patch.spot_number {
                    sensor.spot_number = number;
                }
                if let Some(kind) = patch.parking_type {
                    sensor.parking_type = kind;
                }
                if let Some(image) = &patch.sensor_image {
                    sensor.sensor_image = image.clone();
                }
            }
        }
    }

    pub fn merged(&self, patch: &DevicePatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

/// Patch for one camera stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamPatch {
    pub ip_address: Option<String>,
    pub port: Option<String>,
    pub external_url: Option<Option<String>>,
    pub direction: Option<FlowDirection>,
    pub rotation: Option<f64>,
    pub flow_destination: Option<String>,
}

/// Shallow field patch for a device.
///
/// `ip_address`/`port` address a sign, or a camera's first stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DevicePatch {
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub ip_address: Option<String>,
    pub port: Option<String>,
    pub hardware_type: Option<HardwareType>,
    pub stream1: Option<StreamPatch>,
    pub stream2: Option<StreamPatch>,
    pub view_image: Option<Option<String>>,
    pub override_state: Option<OverrideState>,
    pub preview_url: Option<Option<String>>,
    pub display_mapping: Option<Vec<String>>,
    pub display_status: Option<String>,
    pub serial_address: Option<String>,
    pub spot_number: Option<Option<u32>>,
    pub parking_type: Option<SpotType>,
    pub sensor_image: Option<Option<String>>,
}

impl DevicePatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }
}

/// Add Device form input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDevice {
    pub device_type: DeviceType,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub ip_address: String,
    /// `None` picks the per-type default port.
    pub port: Option<String>,
}

impl NewDevice {
    pub fn new(device_type: DeviceType, name: impl Into<String>) -> Self {
        Self {
            device_type,
            name: name.into(),
            x: 0.0,
            y: 0.0,
            ip_address: String::new(),
            port: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_address(mut self, ip_address: impl Into<String>, port: impl Into<String>) -> Self {
        self.ip_address = ip_address.into();
        self.port = Some(port.into());
        self
    }

    /// Builds the device. Sensors capture the names of the garage and level
    /// they are created on.
    pub fn build(self, id: impl Into<String>, garage_name: &str, level_name: &str) -> Device {
        let mut device = Device::new(id, self.device_type, self.name, self.x, self.y);
        let port = self
            .port
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| self.device_type.default_port().to_string());
        match &mut device.config {
            DeviceConfig::Camera(cam) => {
                cam.streams = vec![Stream::with_address(self.ip_address, port)];
            }
            DeviceConfig::Sign(sign) => {
                sign.ip_address = self.ip_address;
                sign.port = port;
            }
            DeviceConfig::Sensor(sensor) => {
                sensor.garage_name = garage_name.to_string();
                sensor.level_name = level_name.to_string();
            }
        }
        device
    }
}

/// Stored JSON shape of a device: flat fields plus optional nested streams.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceRecord {
    id: String,
    #[serde(rename = "type")]
    device_type: Option<DeviceType>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,

    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    ip_address: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    external_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    direction: Option<FlowDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flow_destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hardware_type: Option<HardwareType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stream1: Option<Stream>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stream2: Option<Stream>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    view_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    override_state: Option<OverrideState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_mapping: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_status: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    serial_address: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    spot_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parking_type: Option<SpotType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sensor_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    garage_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    level_name: Option<String>,
}

impl DeviceRecord {
    /// First stream: flat fields win, `stream1` fills the gaps.
    fn first_stream(&self) -> Stream {
        let nested = self.stream1.clone().unwrap_or_default();
        Stream {
            ip_address: self.ip_address.clone().unwrap_or(nested.ip_address),
            port: self.port.clone().unwrap_or(nested.port),
            external_url: self.external_url.clone().or(nested.external_url),
            direction: self.direction.unwrap_or(nested.direction),
            rotation: self.rotation.unwrap_or(nested.rotation),
            flow_destination: self
                .flow_destination
                .clone()
                .unwrap_or(nested.flow_destination),
        }
    }
}

impl From<DeviceRecord> for Device {
    fn from(record: DeviceRecord) -> Self {
        // Records without a type tag predate the sign/sensor families.
        let device_type = record.device_type.unwrap_or(DeviceType::CamDome);
        let config = match device_type.family() {
            DeviceFamily::Camera => {
                let hardware_type = record.hardware_type.unwrap_or_default();
                let mut streams = vec![record.first_stream()];
                if hardware_type == HardwareType::DualLens {
                    streams.push(record.stream2.clone().unwrap_or_default());
                }
                DeviceConfig::Camera(CameraConfig {
                    hardware_type,
                    streams,
                    view_image: record.view_image,
                })
            }
            DeviceFamily::Sign => DeviceConfig::Sign(SignConfig {
                ip_address: record.ip_address.unwrap_or_default(),
                port: record
                    .port
                    .unwrap_or_else(|| device_type.default_port().to_string()),
                override_state: record.override_state.unwrap_or_default(),
                preview_url: record.preview_url,
                display_mapping: record.display_mapping.unwrap_or_default(),
                display_status: match device_type {
                    DeviceType::SignStatic => Some(
                        record
                            .display_status
                            .unwrap_or_else(|| DEFAULT_DISPLAY_STATUS.to_string()),
                    ),
                    _ => record.display_status,
                },
            }),
            DeviceFamily::Sensor => DeviceConfig::Sensor(SensorConfig {
                serial_address: record.serial_address.unwrap_or_default(),
                spot_number: record.spot_number,
                parking_type: record.parking_type.unwrap_or_default(),
                sensor_image: record.sensor_image,
                garage_name: record.garage_name.unwrap_or_default(),
                level_name: record.level_name.unwrap_or_default(),
            }),
        };
        Device {
            id: record.id,
            device_type,
            name: record.name,
            x: record.x,
            y: record.y,
            config,
        }
    }
}

impl From<Device> for DeviceRecord {
    fn from(device: Device) -> Self {
        let mut record = DeviceRecord {
            id: device.id,
            device_type: Some(device.device_type),
            name: device.name,
            x: device.x,
            y: device.y,
            ..DeviceRecord::default()
        };
        match device.config {
            DeviceConfig::Camera(cam) => {
                let mut streams = cam.streams.into_iter();
                if let Some(first) = streams.next() {
                    record.ip_address = Some(first.ip_address.clone());
                    record.port = Some(first.port.clone());
                    record.external_url = first.external_url.clone();
                    record.direction = Some(first.direction);
                    record.rotation = Some(first.rotation);
                    record.flow_destination = Some(first.flow_destination.clone());
                    record.stream1 = Some(first);
                }
                record.stream2 = streams.next();
                record.hardware_type = Some(cam.hardware_type);
                record.view_image = cam.view_image;
            }
            DeviceConfig::Sign(sign) => {
                record.ip_address = Some(sign.ip_address);
                record.port = Some(sign.port);
                record.override_state = Some(sign.override_state);
                record.preview_url = sign.preview_url;
                if device.device_type == DeviceType::SignStatic
                    || !sign.display_mapping.is_empty()
                {
                    record.display_mapping = Some(sign.display_mapping);
                }
                record.display_status = sign.display_status;
            }
            DeviceConfig::Sensor(sensor) => {
                record.serial_address = Some(sensor.serial_address);
                record.spot_number = sensor.spot_number;
                record.parking_type = Some(sensor.parking_type);
                record.sensor_image = sensor.sensor_image;
                record.garage_name = Some(sensor.garage_name);
                record.level_name = Some(sensor.level_name);
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_tags() {
        assert_eq!("cam-fli".parse::<DeviceType>().unwrap(), DeviceType::CamFli);
        assert_eq!(DeviceType::SignStatic.to_string(), "sign-static");
        assert_eq!(DeviceType::CamPeople.suffix(), "people");
        assert_eq!(DeviceType::SensorSpace.family(), DeviceFamily::Sensor);
        assert!("cam-thermal".parse::<DeviceType>().is_err());
    }

    #[test]
    fn test_sign_port_defaults() {
        let led = NewDevice::new(DeviceType::SignLed, "S1").build("d1", "G", "L");
        assert_eq!(led.address(), Some(("", "80")));
        let fixed = NewDevice::new(DeviceType::SignStatic, "S2").build("d2", "G", "L");
        assert_eq!(fixed.address(), Some(("", "10001")));
        assert_eq!(
            fixed.sign().unwrap().display_status.as_deref(),
            Some("OPEN")
        );
        assert_eq!(fixed.sign().unwrap().override_state, OverrideState::Auto);
    }

    #[test]
    fn test_sensor_captures_location_names() {
        let sensor = NewDevice::new(DeviceType::SensorSpace, "P-1").build("d3", "North", "Level 2");
        let cfg = sensor.sensor().unwrap();
        assert_eq!(cfg.garage_name, "North");
        assert_eq!(cfg.level_name, "Level 2");
        assert_eq!(sensor.address(), None);
    }

    #[test]
    fn test_reads_stream1_when_flat_fields_absent() {
        let json = r#"{
            "id": "cam-1", "type": "cam-lpr", "name": "Gate", "x": 40, "y": 60,
            "hardwareType": "dual-lens",
            "stream1": {"ipAddress": "10.0.0.5", "port": "8554", "direction": "out", "rotation": 90, "flowDestination": "garage-exit"},
            "stream2": {"ipAddress": "10.0.0.6", "port": 554}
        }"#;
        let device: Device = serde_json::from_str(json).unwrap();
        let cam = device.camera().unwrap();
        assert_eq!(cam.streams.len(), 2);
        assert_eq!(cam.streams[0].ip_address, "10.0.0.5");
        assert_eq!(cam.streams[0].port, "8554");
        assert_eq!(cam.streams[0].direction, FlowDirection::Out);
        assert_eq!(cam.streams[0].flow_destination, GARAGE_EXIT);
        assert_eq!(cam.streams[1].port, "554");
        assert_eq!(device.rotation(), 90.0);
    }

    #[test]
    fn test_flat_fields_win_over_stream1() {
        let json = r#"{"id":"c","type":"cam-fli","name":"n","x":0,"y":0,
            "ipAddress":"1.1.1.1","port":"554","stream1":{"ipAddress":"2.2.2.2","port":"9"}}"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.address(), Some(("1.1.1.1", "554")));
    }

    #[test]
    fn test_writes_flat_and_stream1() {
        let device = NewDevice::new(DeviceType::CamFli, "Entry1")
            .with_address("10.16.6.45", "554")
            .build("d1", "G", "L");
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["ipAddress"], "10.16.6.45");
        assert_eq!(json["stream1"]["ipAddress"], "10.16.6.45");
        assert_eq!(json["stream1"]["port"], "554");
        assert_eq!(json["type"], "cam-fli");
        assert!(json.get("stream2").is_none());

        let back: Device = serde_json::from_value(json).unwrap();
        assert_eq!(back, device);
    }

    #[test]
    fn test_patch_switches_to_dual_lens() {
        let device = Device::new("c", DeviceType::CamDome, "Dome", 0.0, 0.0);
        let patched = device.merged(&DevicePatch {
            hardware_type: Some(HardwareType::DualLens),
            stream2: Some(StreamPatch {
                rotation: Some(180.0),
                ..Default::default()
            }),
            serial_address: Some("ignored".into()),
            ..Default::default()
        });
        let cam = patched.camera().unwrap();
        assert_eq!(cam.streams.len(), 2);
        assert_eq!(cam.streams[1].rotation, 180.0);
        assert_eq!(patched.name, "Dome");
    }

    #[test]
    fn test_override_state_preserves_unknown_values() {
        let state: OverrideState = serde_json::from_str(r#""FULL""#).unwrap();
        assert_eq!(state, OverrideState::Other("FULL".to_string()));
        assert_eq!(serde_json::to_string(&OverrideState::Auto).unwrap(), r#""auto""#);
    }
}
