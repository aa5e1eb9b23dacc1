//! Resize handles around a selected layout element.
//!
//! Handles live in the element's rotated frame. A drag delta is projected
//! onto the handle's local axes, the affected dimension changes by that
//! amount, and the center moves by half the change toward the handle so the
//! opposite edge stays put in world coordinates.

use garagelayout_core::data::element::GATE_DEPTH;
use garagelayout_core::{ElementKind, LayoutElement, LayoutElementPatch};

/// Smallest size a resize can produce.
pub const MIN_SIZE: f64 = 20.0;
/// Quantization step for spot dimensions.
pub const SPOT_STEP: f64 = 5.0;
/// Quantization step for every other element.
pub const ELEMENT_STEP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::NorthWest,
        Handle::North,
        Handle::NorthEast,
        Handle::East,
        Handle::SouthEast,
        Handle::South,
        Handle::SouthWest,
        Handle::West,
    ];

    /// Outward direction in the element's local frame, each axis in `-1..=1`.
    pub fn direction(self) -> (f64, f64) {
        match self {
            Handle::NorthWest => (-1.0, -1.0),
            Handle::North => (0.0, -1.0),
            Handle::NorthEast => (1.0, -1.0),
            Handle::East => (1.0, 0.0),
            Handle::SouthEast => (1.0, 1.0),
            Handle::South => (0.0, 1.0),
            Handle::SouthWest => (-1.0, 1.0),
            Handle::West => (-1.0, 0.0),
        }
    }

    pub fn is_corner(self) -> bool {
        let (hx, hy) = self.direction();
        hx != 0.0 && hy != 0.0
    }
}

/// Dimensions a resize acts on, mapped from the element's fields.
fn resize_box(element: &LayoutElement) -> (f64, f64) {
    match &element.kind {
        ElementKind::Spot { width, height, .. } => (*width, *height),
        ElementKind::Lane {
            width,
            length,
            direction,
        } => {
            if direction.is_vertical() {
                (*width, *length)
            } else {
                (*length, *width)
            }
        }
        ElementKind::Curve { width, height, .. } => (*width, *height),
        ElementKind::Entrance { width, .. } => (*width, GATE_DEPTH),
        ElementKind::Ramp { width, length, .. } => (*width, *length),
    }
}

fn quantize(value: f64, step: f64) -> f64 {
    ((value / step).round() * step).max(MIN_SIZE)
}

/// World positions of the eight handles, in [`Handle::ALL`] order.
pub fn handle_positions(element: &LayoutElement) -> [(Handle, f64, f64); 8] {
    let (w, h) = resize_box(element);
    let (sin, cos) = element.rotation.to_radians().sin_cos();
    Handle::ALL.map(|handle| {
        let (hx, hy) = handle.direction();
        let lx = hx * w / 2.0;
        let ly = hy * h / 2.0;
        (
            handle,
            element.x + lx * cos - ly * sin,
            element.y + lx * sin + ly * cos,
        )
    })
}

/// Computes the patch for dragging `handle` by the world delta `(dx, dy)`.
pub fn resize(element: &LayoutElement, handle: Handle, dx: f64, dy: f64) -> LayoutElementPatch {
    let (hx, hy) = handle.direction();
    let (sin, cos) = element.rotation.to_radians().sin_cos();
    let local_dx = dx * cos + dy * sin;
    let local_dy = -dx * sin + dy * cos;

    let (w, h) = resize_box(element);
    let step = match element.kind {
        ElementKind::Spot { .. } => SPOT_STEP,
        _ => ELEMENT_STEP,
    };
    let fixed_height = matches!(element.kind, ElementKind::Entrance { .. });

    let new_w = if hx != 0.0 {
        quantize((w + hx * local_dx).max(MIN_SIZE), step)
    } else {
        w
    };
    let new_h = if hy != 0.0 && !fixed_height {
        quantize((h + hy * local_dy).max(MIN_SIZE), step)
    } else {
        h
    };

    let off_x = hx * (new_w - w) / 2.0;
    let off_y = hy * (new_h - h) / 2.0;
    let world_dx = off_x * cos - off_y * sin;
    let world_dy = off_x * sin + off_y * cos;

    let mut patch = LayoutElementPatch {
        x: Some(element.x + world_dx),
        y: Some(element.y + world_dy),
        ..LayoutElementPatch::default()
    };
    match &element.kind {
        ElementKind::Spot { .. } | ElementKind::Curve { .. } => {
            patch.width = Some(new_w);
            patch.height = Some(new_h);
        }
        ElementKind::Lane { direction, .. } => {
            if direction.is_vertical() {
                patch.width = Some(new_w);
                patch.length = Some(new_h);
            } else {
                patch.length = Some(new_w);
                patch.width = Some(new_h);
            }
        }
        ElementKind::Entrance { .. } => {
            patch.width = Some(new_w);
        }
        ElementKind::Ramp { .. } => {
            patch.width = Some(new_w);
            patch.length = Some(new_h);
        }
    }
    tracing::debug!(
        "resize {} via {:?}: ({}, {}) -> ({}, {})",
        element.id,
        handle,
        w,
        h,
        new_w,
        new_h
    );
    patch
}
