//! Site tree: garages → levels → {layout elements, devices}.
//!
//! Updates are functional: each `Site` updater takes `&self` and returns a
//! new snapshot. Missing garages, levels or ids leave the snapshot unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::device::{Device, DeviceFamily, DevicePatch, GARAGE_ENTRY, GARAGE_EXIT};
use super::element::{ElementKind, LayoutElement, LayoutElementPatch, SpotType};
use super::lenient;

/// Label used for references that no longer resolve.
pub const UNRESOLVED: &str = "(unresolved)";

/// The whole site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(default)]
    pub garages: Vec<Garage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Garage {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub levels: Vec<Level>,
    /// Contact entries, carried through untouched.
    #[serde(default)]
    pub contacts: Vec<serde_json::Value>,
}

/// One floor of a garage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LevelRecord", into = "LevelRecord")]
pub struct Level {
    pub id: String,
    pub name: String,
    pub total_spots: u32,
    pub ev_spots: u32,
    pub ada_spots: u32,
    /// Background image as a data URL.
    pub bg_image: Option<String>,
    /// Set by auto-layout when the layout is taller than the viewport.
    pub canvas_height: Option<f64>,
    pub layout_elements: Vec<LayoutElement>,
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LevelRecord {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    total_spots: u32,
    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    ev_spots: u32,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    ada_spots: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32", skip_serializing)]
    handicap_spots: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bg_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    canvas_height: Option<f64>,
    #[serde(default)]
    layout_elements: Vec<LayoutElement>,
    #[serde(default)]
    devices: Vec<Device>,
}

impl From<LevelRecord> for Level {
    fn from(r: LevelRecord) -> Self {
        Level {
            id: r.id,
            name: r.name,
            total_spots: r.total_spots,
            ev_spots: r.ev_spots,
            ada_spots: r.ada_spots.or(r.handicap_spots).unwrap_or(0),
            bg_image: r.bg_image,
            canvas_height: r.canvas_height,
            layout_elements: r.layout_elements,
            devices: r.devices,
        }
    }
}

impl From<Level> for LevelRecord {
    fn from(l: Level) -> Self {
        LevelRecord {
            id: l.id,
            name: l.name,
            total_spots: l.total_spots,
            ev_spots: l.ev_spots,
            ada_spots: Some(l.ada_spots),
            handicap_spots: None,
            bg_image: l.bg_image,
            canvas_height: l.canvas_height,
            layout_elements: l.layout_elements,
            devices: l.devices,
        }
    }
}

/// Per-level counts used by the stats bar and the CLI summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelSummary {
    pub spots: usize,
    pub ev: usize,
    pub ada: usize,
    pub lanes: usize,
    pub cameras: usize,
    pub sensors: usize,
    pub signs: usize,
}

impl fmt::Display for LevelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Spots: {} | EV: {} | ADA: {} | Cameras: {} | Sensors: {} | Signs: {}",
            self.spots, self.ev, self.ada, self.cameras, self.sensors, self.signs
        )
    }
}

impl Level {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            total_spots: 0,
            ev_spots: 0,
            ada_spots: 0,
            bg_image: None,
            canvas_height: None,
            layout_elements: Vec::new(),
            devices: Vec::new(),
        }
    }

    pub fn element(&self, id: &str) -> Option<&LayoutElement> {
        self.layout_elements.iter().find(|e| e.id == id)
    }

    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// Counts spots by type and devices by family.
    pub fn summary(&self) -> LevelSummary {
        let mut summary = LevelSummary::default();
        for element in &self.layout_elements {
            match &element.kind {
                ElementKind::Spot { spot_type, .. } => {
                    summary.spots += 1;
                    match spot_type {
                        SpotType::Ev => summary.ev += 1,
                        SpotType::Ada => summary.ada += 1,
                        SpotType::Regular => {}
                    }
                }
                ElementKind::Lane { .. } => summary.lanes += 1,
                _ => {}
            }
        }
        for device in &self.devices {
            match device.family() {
                DeviceFamily::Camera => summary.cameras += 1,
                DeviceFamily::Sensor => summary.sensors += 1,
                DeviceFamily::Sign => summary.signs += 1,
            }
        }
        summary
    }
}

impl Garage {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            levels: Vec::new(),
            contacts: Vec::new(),
        }
    }

    pub fn level(&self, id: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn level_mut(&mut self, id: &str) -> Option<&mut Level> {
        self.levels.iter_mut().find(|l| l.id == id)
    }

    /// Appends a new level with a fresh id and returns the id.
    pub fn add_level(&mut self, name: impl Into<String>) -> String {
        let id = Uuid::new_v4().to_string();
        self.levels.push(Level::new(id.clone(), name));
        id
    }

    /// The garage's levels other than `level_id`, as ramp targets.
    pub fn other_levels<'a>(&'a self, level_id: &'a str) -> impl Iterator<Item = &'a Level> + 'a {
        self.levels.iter().filter(move |l| l.id != level_id)
    }

    /// Flow destination choices for a camera on `level_id` as `(value, label)`.
    pub fn flow_destination_options(&self, level_id: &str) -> Vec<(String, String)> {
        let mut options = vec![
            (GARAGE_ENTRY.to_string(), "Garage Entry".to_string()),
            (GARAGE_EXIT.to_string(), "Garage Exit".to_string()),
        ];
        options.extend(
            self.other_levels(level_id)
                .map(|l| (l.id.clone(), l.name.clone())),
        );
        options
    }

    /// Display label for a flow destination or ramp target.
    pub fn destination_label(&self, reference: &str) -> String {
        match reference {
            GARAGE_ENTRY => "Garage Entry".to_string(),
            GARAGE_EXIT => "Garage Exit".to_string(),
            id => self
                .level(id)
                .map(|l| l.name.clone())
                .unwrap_or_else(|| UNRESOLVED.to_string()),
        }
    }
}

impl Site {
    pub fn garage(&self, id: &str) -> Option<&Garage> {
        self.garages.iter().find(|g| g.id == id)
    }

    pub fn garage_mut(&mut self, id: &str) -> Option<&mut Garage> {
        self.garages.iter_mut().find(|g| g.id == id)
    }

    pub fn level(&self, garage_id: &str, level_id: &str) -> Option<&Level> {
        self.garage(garage_id)?.level(level_id)
    }

    pub fn level_mut(&mut self, garage_id: &str, level_id: &str) -> Option<&mut Level> {
        self.garage_mut(garage_id)?.level_mut(level_id)
    }

    /// Appends a new garage with a fresh id and returns the id.
    pub fn add_garage(&mut self, name: impl Into<String>, address: impl Into<String>) -> String {
        let id = Uuid::new_v4().to_string();
        let mut garage = Garage::new(id.clone(), name);
        garage.address = address.into();
        self.garages.push(garage);
        id
    }

    /// Removes a level. Returns false when it did not exist.
    pub fn remove_level(&mut self, garage_id: &str, level_id: &str) -> bool {
        let Some(garage) = self.garage_mut(garage_id) else {
            return false;
        };
        let before = garage.levels.len();
        garage.levels.retain(|l| l.id != level_id);
        garage.levels.len() != before
    }

    /// Every device of every garage and level, in order.
    pub fn all_devices(&self) -> impl Iterator<Item = &Device> {
        self.garages
            .iter()
            .flat_map(|g| g.levels.iter())
            .flat_map(|l| l.devices.iter())
    }

    pub fn has_devices(&self) -> bool {
        self.all_devices().next().is_some()
    }

    /// Returns a new snapshot with `f` applied to one level.
    pub fn map_level(
        &self,
        garage_id: &str,
        level_id: &str,
        f: impl FnOnce(&mut Level),
    ) -> Site {
        let mut next = self.clone();
        if let Some(level) = next.level_mut(garage_id, level_id) {
            f(level);
        }
        next
    }

    pub fn update_device(
        &self,
        garage_id: &str,
        level_id: &str,
        device_id: &str,
        patch: &DevicePatch,
    ) -> Site {
        self.map_level(garage_id, level_id, |level| {
            if let Some(device) = level.devices.iter_mut().find(|d| d.id == device_id) {
                device.apply(patch);
            }
        })
    }

    pub fn update_layout_element(
        &self,
        garage_id: &str,
        level_id: &str,
        element_id: &str,
        patch: &LayoutElementPatch,
    ) -> Site {
        self.map_level(garage_id, level_id, |level| {
            if let Some(element) = level
                .layout_elements
                .iter_mut()
                .find(|e| e.id == element_id)
            {
                element.apply(patch);
            }
        })
    }

    pub fn delete_layout_element(&self, garage_id: &str, level_id: &str, element_id: &str) -> Site {
        self.map_level(garage_id, level_id, |level| {
            level.layout_elements.retain(|e| e.id != element_id);
        })
    }

    pub fn add_layout_element(
        &self,
        garage_id: &str,
        level_id: &str,
        element: LayoutElement,
    ) -> Site {
        self.map_level(garage_id, level_id, |level| {
            level.layout_elements.push(element);
        })
    }

    pub fn add_device(&self, garage_id: &str, level_id: &str, device: Device) -> Site {
        self.map_level(garage_id, level_id, |level| level.devices.push(device))
    }

    pub fn remove_device(&self, garage_id: &str, level_id: &str, device_id: &str) -> Site {
        self.map_level(garage_id, level_id, |level| {
            level.devices.retain(|d| d.id != device_id);
        })
    }
}
