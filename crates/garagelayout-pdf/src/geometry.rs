//! Scene-to-page projection and shape outlines.

use lyon::geom::Arc;
use lyon::math::{point, vector, Angle};
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, Winding};

use crate::surface::Rect;

/// Padding around the drawn content, in canvas pixels.
pub const CONTENT_PADDING: f64 = 100.0;
/// Fraction of the canvas area the content may fill.
pub const FIT_FACTOR: f64 = 0.95;
/// Flattening tolerance in points.
const TOLERANCE: f32 = 0.25;

/// Uniform scale plus offset from canvas pixels to page points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Projection {
    /// Fits `(0, 0)..(max_x, max_y)` into `area`, centered.
    pub fn fit(area: Rect, max_x: f64, max_y: f64) -> Self {
        let max_x = max_x.max(1.0);
        let max_y = max_y.max(1.0);
        let scale = (area.w / max_x).min(area.h / max_y) * FIT_FACTOR;
        Self {
            scale,
            offset_x: area.x + (area.w - max_x * scale) / 2.0,
            offset_y: area.y + (area.h - max_y * scale) / 2.0,
        }
    }

    pub fn point(&self, x: f64, y: f64) -> (f64, f64) {
        (self.offset_x + x * self.scale, self.offset_y + y * self.scale)
    }

    pub fn length(&self, v: f64) -> f64 {
        v * self.scale
    }
}

/// Corners of a `w × h` box centered on `(cx, cy)` and rotated by
/// `rotation` degrees, in page points.
pub fn rotated_box(cx: f64, cy: f64, w: f64, h: f64, rotation: f64) -> Vec<(f64, f64)> {
    let (hw, hh) = (w / 2.0, h / 2.0);
    [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
        .into_iter()
        .map(|(lx, ly)| rotate_about(cx, cy, lx, ly, rotation))
        .collect()
}

/// Local offset `(lx, ly)` rotated by `rotation` degrees around `(cx, cy)`.
pub fn rotate_about(cx: f64, cy: f64, lx: f64, ly: f64, rotation: f64) -> (f64, f64) {
    let (sin, cos) = rotation.to_radians().sin_cos();
    (cx + lx * cos - ly * sin, cy + lx * sin + ly * cos)
}

fn flatten(path: &Path) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for event in path.iter().flattened(TOLERANCE) {
        match event {
            lyon::path::Event::Begin { at } => points.push((at.x as f64, at.y as f64)),
            lyon::path::Event::Line { to, .. } => points.push((to.x as f64, to.y as f64)),
            _ => {}
        }
    }
    points
}

/// Polygon approximating a circle.
pub fn circle(cx: f64, cy: f64, r: f64) -> Vec<(f64, f64)> {
    let mut builder = Path::builder();
    builder.add_circle(point(cx as f32, cy as f32), r as f32, Winding::Positive);
    flatten(&builder.build())
}

/// Points along an arc from `start_deg`, sweeping `sweep_deg`. Angles follow
/// screen coordinates: 0 points right, positive turns clockwise.
pub fn arc_points(cx: f64, cy: f64, r: f64, start_deg: f64, sweep_deg: f64) -> Vec<(f64, f64)> {
    let arc = Arc {
        center: point(cx as f32, cy as f32),
        radii: vector(r as f32, r as f32),
        start_angle: Angle::degrees(start_deg as f32),
        sweep_angle: Angle::degrees(sweep_deg as f32),
        x_rotation: Angle::zero(),
    };
    let steps = ((sweep_deg.abs() / 10.0).ceil() as usize).max(2);
    (0..=steps)
        .map(|i| {
            let p = arc.sample(i as f32 / steps as f32);
            (p.x as f64, p.y as f64)
        })
        .collect()
}

/// Filled wedge: apex at the center, `spread_deg` wide around `heading_deg`.
pub fn wedge(cx: f64, cy: f64, r: f64, heading_deg: f64, spread_deg: f64) -> Vec<(f64, f64)> {
    let mut points = vec![(cx, cy)];
    points.extend(arc_points(
        cx,
        cy,
        r,
        heading_deg - spread_deg / 2.0,
        spread_deg,
    ));
    points
}

/// Triangle pointing along `heading_deg` (screen angle), centered on `(cx, cy)`.
pub fn arrow_head(cx: f64, cy: f64, size: f64, heading_deg: f64) -> Vec<(f64, f64)> {
    vec![
        rotate_about(cx, cy, size, 0.0, heading_deg),
        rotate_about(cx, cy, -size * 0.6, -size * 0.7, heading_deg),
        rotate_about(cx, cy, -size * 0.6, size * 0.7, heading_deg),
    ]
}
