//! Data models for GarageLayout
//!
//! Provides the site tree and the element and device types stored in it.

pub mod device;
pub mod element;
pub mod lenient;
pub mod site;

pub use device::{
    CameraConfig, Device, DeviceConfig, DeviceFamily, DevicePatch, DeviceType, HardwareType,
    NewDevice, OverrideState, SensorConfig, SignConfig, Stream, StreamPatch, GARAGE_ENTRY,
    GARAGE_EXIT,
};
pub use element::{
    CurveDirection, ElementKind, ElementType, FlowDirection, LaneDirection, LayoutElement,
    LayoutElementPatch, SpotType,
};
pub use site::{Garage, Level, LevelSummary, Site, UNRESOLVED};
