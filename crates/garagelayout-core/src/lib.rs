//! # GarageLayout Core
//!
//! Core types for GarageLayout.
//! Provides the site model (garages, levels, layout elements, devices),
//! deterministic id generation, and the shared error types.

pub mod data;
pub mod error;
pub mod files;
pub mod ids;

pub use data::{
    CameraConfig, CurveDirection, Device, DeviceConfig, DeviceFamily, DevicePatch, DeviceType,
    ElementKind, ElementType, FlowDirection, Garage, HardwareType, LaneDirection, LayoutElement,
    LayoutElementPatch, Level, LevelSummary, NewDevice, OverrideState, SensorConfig, SignConfig,
    Site, SpotType, Stream, StreamPatch, GARAGE_ENTRY, GARAGE_EXIT, UNRESOLVED,
};

pub use error::{Error, LayoutError, Result};
pub use files::sanitize_file_name;
pub use ids::IdGenerator;
