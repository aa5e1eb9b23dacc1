//! Interactive editor state.
//!
//! The editor owns the current [`Site`] snapshot, the `(garage, level)`
//! being edited, the active tool and the selection. Pointer events from the
//! canvas arrive as method calls; each one produces a new site snapshot via
//! the pure updaters on [`Site`]. Every entry point is a silent no-op when no
//! garage and level are selected.

pub mod handles;
pub mod notice;
pub mod properties;
pub mod tools;

pub use handles::{handle_positions, resize, Handle};
pub use notice::{Notice, Severity};
pub use properties::{fields_for, PropertyEdit, PropertyField};
pub use tools::{Selected, Tool};

use garagelayout_core::{
    Device, DeviceConfig, DevicePatch, ElementType, Garage, IdGenerator, LayoutElement,
    LayoutElementPatch, LayoutError, Level, NewDevice, Site,
};
use std::collections::HashSet;

use crate::autolayout::{self, AutoLayoutParams};
use crate::grid::{self, smart_snap};

/// Editor state for one site.
#[derive(Debug, Clone)]
pub struct Editor {
    site: Site,
    garage_id: Option<String>,
    level_id: Option<String>,
    active_tool: Tool,
    selection: Selected,
    element_ids: IdGenerator,
    device_ids: IdGenerator,
    revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Site::default())
    }
}

impl Editor {
    pub fn new(site: Site) -> Self {
        let element_ids = IdGenerator::for_site("el", &site);
        let device_ids = IdGenerator::for_site("dev", &site);
        Self {
            site,
            garage_id: None,
            level_id: None,
            active_tool: Tool::None,
            selection: Selected::None,
            element_ids,
            device_ids,
            revision: 0,
        }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn into_site(self) -> Site {
        self.site
    }

    /// Replaces the whole site, e.g. after loading a stored snapshot.
    pub fn replace_site(&mut self, site: Site) {
        self.element_ids = IdGenerator::for_site("el", &site);
        self.device_ids = IdGenerator::for_site("dev", &site);
        self.site = site;
        self.selection = Selected::None;
        self.bump();
    }

    /// Incremented on every change to the site.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    fn set_site(&mut self, site: Site) {
        if site != self.site {
            self.site = site;
            self.bump();
        }
    }

    /// Selects the garage and level to edit. Returns false when either
    /// does not exist.
    pub fn select_level(&mut self, garage_id: &str, level_id: &str) -> bool {
        if self.site.level(garage_id, level_id).is_none() {
            return false;
        }
        self.garage_id = Some(garage_id.to_string());
        self.level_id = Some(level_id.to_string());
        self.selection = Selected::None;
        self.active_tool = Tool::None;
        true
    }

    fn location(&self) -> Option<(String, String)> {
        Some((self.garage_id.clone()?, self.level_id.clone()?))
    }

    pub fn current_garage(&self) -> Option<&Garage> {
        self.site.garage(self.garage_id.as_deref()?)
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.site
            .level(self.garage_id.as_deref()?, self.level_id.as_deref()?)
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    /// Handles a click on a tool button.
    pub fn toggle_tool(&mut self, tool: Tool) {
        self.active_tool = self.active_tool.toggled(tool);
    }

    pub fn selection(&self) -> &Selected {
        &self.selection
    }

    pub fn select_device(&mut self, device_id: &str) {
        if let Some(device) = self.current_level().and_then(|l| l.device(device_id)) {
            self.selection = Selected::Device(device.clone());
        }
    }

    pub fn select_layout_element(&mut self, element_id: &str) {
        if let Some(element) = self.current_level().and_then(|l| l.element(element_id)) {
            self.selection = Selected::LayoutElement(element.clone());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selected::None;
    }

    /// Handles a click on the canvas background.
    ///
    /// `tool_target` is true for the placement surface that is only active
    /// while a tool is armed. With a tool armed, a new element is placed at
    /// the snapped cursor and the tool is released. Otherwise the selection
    /// is cleared. Returns the id of a placed element.
    pub fn click_background(&mut self, x: f64, y: f64, tool_target: bool) -> Option<String> {
        match (tool_target, self.active_tool.element_type()) {
            (true, Some(element_type)) => {
                let id = self.place_element(element_type, x, y);
                self.active_tool = Tool::None;
                id
            }
            _ => {
                self.clear_selection();
                None
            }
        }
    }

    /// Places a new element with default dimensions at the snapped position.
    pub fn place_element(&mut self, element_type: ElementType, x: f64, y: f64) -> Option<String> {
        let (garage_id, level_id) = self.location()?;
        let level = self.current_level()?;
        let snap = smart_snap(&level.layout_elements, x, y, None, element_type);
        let id = self.element_ids.next_id();
        let element = LayoutElement::new(
            id.clone(),
            element_type,
            snap.x,
            snap.y,
            snap.rotation_or(0.0),
        );
        tracing::debug!("Placed {} {} at ({}, {})", element_type, id, snap.x, snap.y);
        let site = self.site.add_layout_element(&garage_id, &level_id, element);
        self.set_site(site);
        Some(id)
    }

    /// Shallow-merges `patch` into a device of the current level.
    pub fn update_device(&mut self, device_id: &str, patch: &DevicePatch) {
        let Some((garage_id, level_id)) = self.location() else {
            return;
        };
        let site = self
            .site
            .update_device(&garage_id, &level_id, device_id, patch);
        self.set_site(site);
        if let Selected::Device(selected) = &mut self.selection {
            if selected.id == device_id {
                selected.apply(patch);
            }
        }
    }

    /// Shallow-merges `patch` into a layout element of the current level and
    /// keeps the selection copy in step.
    pub fn update_layout_element(&mut self, element_id: &str, patch: &LayoutElementPatch) {
        let Some((garage_id, level_id)) = self.location() else {
            return;
        };
        let site = self
            .site
            .update_layout_element(&garage_id, &level_id, element_id, patch);
        self.set_site(site);
        if let Selected::LayoutElement(selected) = &mut self.selection {
            if selected.id == element_id {
                selected.apply(patch);
            }
        }
    }

    /// Applies a property panel edit to the selected layout element.
    pub fn edit_selected(&mut self, edit: &PropertyEdit) {
        let Some(id) = self.selection.layout_element().map(|e| e.id.clone()) else {
            return;
        };
        self.update_layout_element(&id, &edit.to_patch());
    }

    pub fn delete_layout_element(&mut self, element_id: &str) {
        let Some((garage_id, level_id)) = self.location() else {
            return;
        };
        let site = self
            .site
            .delete_layout_element(&garage_id, &level_id, element_id);
        self.set_site(site);
        self.selection = Selected::None;
    }

    /// Delete action: removes the selected layout element, if any.
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selection.layout_element().map(|e| e.id.clone()) {
            self.delete_layout_element(&id);
        }
    }

    /// Drag-end for a device: both axes snap to the grid.
    pub fn end_device_drag(&mut self, device_id: &str, x: f64, y: f64) {
        let patch = DevicePatch::position(grid::snap_to_grid(x), grid::snap_to_grid(y));
        self.update_device(device_id, &patch);
    }

    /// Drag-end for a layout element: re-runs smart snap excluding itself.
    pub fn end_element_drag(&mut self, element_id: &str, x: f64, y: f64) {
        let Some(level) = self.current_level() else {
            return;
        };
        let Some(element) = level.element(element_id) else {
            return;
        };
        let snap = smart_snap(
            &level.layout_elements,
            x,
            y,
            Some(element_id),
            element.element_type(),
        );
        let mut patch = LayoutElementPatch::position(snap.x, snap.y);
        patch.rotation = snap.rotation;
        self.update_layout_element(element_id, &patch);
    }

    /// Drags a resize handle of the selected layout element.
    pub fn resize_selected(&mut self, handle: Handle, dx: f64, dy: f64) {
        let Some(selected) = self.selection.layout_element() else {
            return;
        };
        let Some(element) = self.current_level().and_then(|l| l.element(&selected.id)) else {
            return;
        };
        let id = element.id.clone();
        let patch = resize(element, handle, dx, dy);
        self.update_layout_element(&id, &patch);
    }

    /// Adds a device from the Add Device form. Returns its id.
    pub fn add_device(&mut self, form: NewDevice) -> Option<String> {
        let (garage_id, level_id) = self.location()?;
        let garage_name = self.current_garage()?.name.clone();
        let level_name = self.current_level()?.name.clone();
        let id = self.device_ids.next_id();
        let device = form.build(id.clone(), &garage_name, &level_name);
        tracing::info!("Added {} {} to {}", device.device_type, id, level_name);
        let site = self.site.add_device(&garage_id, &level_id, device);
        self.set_site(site);
        Some(id)
    }

    /// Removes a device and clears it from the selection.
    pub fn remove_device(&mut self, device_id: &str) {
        let Some((garage_id, level_id)) = self.location() else {
            return;
        };
        let site = self.site.remove_device(&garage_id, &level_id, device_id);
        self.set_site(site);
        if self.selection.device().is_some_and(|d| d.id == device_id) {
            self.selection = Selected::None;
        }
    }

    /// Appends imported devices to the current level.
    ///
    /// Ids that collide with existing devices are replaced with fresh ones.
    pub fn import_devices(&mut self, devices: Vec<Device>) -> Notice {
        let Some((garage_id, level_id)) = self.location() else {
            return Notice::new(Severity::Error, "Select a level before importing");
        };
        if devices.is_empty() {
            return Notice::imported(0);
        }
        let mut taken: HashSet<String> = self
            .site
            .all_devices()
            .map(|d| d.id.clone())
            .collect();
        let count = devices.len();
        let (garage_name, level_name) = match (self.current_garage(), self.current_level()) {
            (Some(g), Some(l)) => (g.name.clone(), l.name.clone()),
            _ => (String::new(), String::new()),
        };
        let ids = &mut self.device_ids;
        let devices: Vec<Device> = devices
            .into_iter()
            .map(|mut device| {
                while taken.contains(&device.id) {
                    device.id = ids.next_id();
                }
                taken.insert(device.id.clone());
                if let DeviceConfig::Sensor(sensor) = &mut device.config {
                    if sensor.garage_name.is_empty() {
                        sensor.garage_name = garage_name.clone();
                    }
                    if sensor.level_name.is_empty() {
                        sensor.level_name = level_name.clone();
                    }
                }
                device
            })
            .collect();
        let site = self.site.map_level(&garage_id, &level_id, |level| {
            level.devices.extend(devices);
        });
        self.set_site(site);
        tracing::info!("Imported {} devices", count);
        Notice::imported(count)
    }

    /// Replaces the current level's layout with a generated one.
    ///
    /// Devices are left untouched. Returns the number of generated elements.
    pub fn auto_layout(
        &mut self,
        canvas_width: f64,
        viewport_height: f64,
    ) -> Result<usize, LayoutError> {
        let Some((garage_id, level_id)) = self.location() else {
            return Ok(0);
        };
        let Some(level) = self.current_level() else {
            return Ok(0);
        };
        let params = AutoLayoutParams::for_level(level, canvas_width, viewport_height);
        let layout = autolayout::generate(&params, &mut self.element_ids)?;
        let count = layout.elements.len();
        let site = self.site.map_level(&garage_id, &level_id, |level| {
            layout.apply_to(level, viewport_height);
        });
        self.set_site(site);
        self.selection = Selected::None;
        Ok(count)
    }
}
