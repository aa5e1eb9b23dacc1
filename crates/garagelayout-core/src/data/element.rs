//! Layout elements: spots, lanes, curves, entrances and ramps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::lenient;
use crate::error::LayoutError;

/// Default spot width in canvas pixels.
pub const SPOT_WIDTH: f64 = 40.0;
/// Default spot depth in canvas pixels.
pub const SPOT_HEIGHT: f64 = 60.0;
/// Default lane width.
pub const LANE_WIDTH: f64 = 60.0;
/// Default lane length.
pub const LANE_LENGTH: f64 = 200.0;
/// Default curve track width.
pub const CURVE_WIDTH: f64 = 60.0;
/// Default curve height.
pub const CURVE_HEIGHT: f64 = 160.0;
/// Default entrance gate width.
pub const ENTRANCE_WIDTH: f64 = 80.0;
/// Depth of an entrance gate bar.
pub const GATE_DEPTH: f64 = 20.0;
/// Default ramp width.
pub const RAMP_WIDTH: f64 = 60.0;
/// Default ramp length.
pub const RAMP_LENGTH: f64 = 100.0;
/// Gap between a curve's track and its overhang on the open side.
pub const CURVE_OVERHANG: f64 = 20.0;

/// Parking spot category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotType {
    /// Standard spot
    #[default]
    Regular,
    /// Electric vehicle charging spot
    Ev,
    /// Accessible spot
    Ada,
}

impl fmt::Display for SpotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Ev => write!(f, "ev"),
            Self::Ada => write!(f, "ada"),
        }
    }
}

impl FromStr for SpotType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Ok(Self::Regular),
            "ev" => Ok(Self::Ev),
            "ada" | "handicap" => Ok(Self::Ada),
            other => Err(LayoutError::UnknownType(other.to_string())),
        }
    }
}

/// Travel direction of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneDirection {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl LaneDirection {
    /// Returns true for `up` and `down` lanes.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Side a U-turn curve opens toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveDirection {
    Left,
    #[default]
    Right,
}

/// Traffic direction through a gate or past a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    #[default]
    In,
    Out,
}

/// Discriminant of a layout element, also used as the editor's tool set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Spot,
    Lane,
    Curve,
    Entrance,
    Ramp,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot => write!(f, "spot"),
            Self::Lane => write!(f, "lane"),
            Self::Curve => write!(f, "curve"),
            Self::Entrance => write!(f, "entrance"),
            Self::Ramp => write!(f, "ramp"),
        }
    }
}

impl FromStr for ElementType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spot" => Ok(Self::Spot),
            "lane" => Ok(Self::Lane),
            "curve" => Ok(Self::Curve),
            "entrance" => Ok(Self::Entrance),
            "ramp" => Ok(Self::Ramp),
            other => Err(LayoutError::UnknownType(other.to_string())),
        }
    }
}

/// Variant-specific fields of a layout element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ElementKind {
    Spot {
        #[serde(default)]
        spot_type: SpotType,
        width: f64,
        height: f64,
        #[serde(
            default,
            deserialize_with = "lenient::opt_u32",
            skip_serializing_if = "Option::is_none"
        )]
        spot_number: Option<u32>,
    },
    Lane {
        width: f64,
        length: f64,
        #[serde(default)]
        direction: LaneDirection,
    },
    Curve {
        width: f64,
        height: f64,
        #[serde(default)]
        direction: CurveDirection,
    },
    Entrance {
        width: f64,
        #[serde(default)]
        direction: FlowDirection,
    },
    Ramp {
        width: f64,
        length: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_level: Option<String>,
    },
}

impl ElementKind {
    /// Default fields for a freshly placed element of the given type.
    pub fn default_for(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Spot => Self::Spot {
                spot_type: SpotType::Regular,
                width: SPOT_WIDTH,
                height: SPOT_HEIGHT,
                spot_number: None,
            },
            ElementType::Lane => Self::Lane {
                width: LANE_WIDTH,
                length: LANE_LENGTH,
                direction: LaneDirection::Right,
            },
            ElementType::Curve => Self::Curve {
                width: CURVE_WIDTH,
                height: CURVE_HEIGHT,
                direction: CurveDirection::Right,
            },
            ElementType::Entrance => Self::Entrance {
                width: ENTRANCE_WIDTH,
                direction: FlowDirection::In,
            },
            ElementType::Ramp => Self::Ramp {
                width: RAMP_WIDTH,
                length: RAMP_LENGTH,
                target_level: None,
            },
        }
    }

    /// Returns the element type tag.
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Spot { .. } => ElementType::Spot,
            Self::Lane { .. } => ElementType::Lane,
            Self::Curve { .. } => ElementType::Curve,
            Self::Entrance { .. } => ElementType::Entrance,
            Self::Ramp { .. } => ElementType::Ramp,
        }
    }
}

/// A positioned layout element. `x`/`y` is the geometric center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutElement {
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees, clockwise on screen.
    #[serde(default)]
    pub rotation: f64,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl LayoutElement {
    /// Creates an element of `element_type` with default dimensions.
    pub fn new(
        id: impl Into<String>,
        element_type: ElementType,
        x: f64,
        y: f64,
        rotation: f64,
    ) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            rotation,
            kind: ElementKind::default_for(element_type),
        }
    }

    /// Creates a regular 40×60 spot.
    pub fn default_spot(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(id, ElementType::Spot, x, y, 0.0)
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Returns true for lanes running up or down.
    pub fn is_vertical_lane(&self) -> bool {
        matches!(&self.kind, ElementKind::Lane { direction, .. } if direction.is_vertical())
    }

    /// Unrotated body size `(w, h)` as drawn around the center.
    ///
    /// Lanes swap width and length depending on orientation. Entrances use
    /// [`GATE_DEPTH`] as their height. The curve overhang is not included;
    /// see [`LayoutElement::local_extent`].
    pub fn footprint(&self) -> (f64, f64) {
        match &self.kind {
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

    /// Unrotated extent relative to the center as `(left, top, right, bottom)`.
    pub fn local_extent(&self) -> (f64, f64, f64, f64) {
        let (w, h) = self.footprint();
        let (hw, hh) = (w / 2.0, h / 2.0);
        match &self.kind {
            ElementKind::Curve {
                width, direction, ..
            } => {
                let overhang = width + CURVE_OVERHANG;
                match direction {
                    CurveDirection::Right => (-hw, -hh, hw + overhang, hh),
                    CurveDirection::Left => (-hw - overhang, -hh, hw, hh),
                }
            }
            _ => (-hw, -hh, hw, hh),
        }
    }

    /// Axis-aligned world bounds `(min_x, min_y, max_x, max_y)` after rotation.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let (l, t, r, b) = self.local_extent();
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (lx, ly) in [(l, t), (r, t), (r, b), (l, b)] {
            let wx = self.x + lx * cos - ly * sin;
            let wy = self.y + lx * sin + ly * cos;
            min_x = min_x.min(wx);
            min_y = min_y.min(wy);
            max_x = max_x.max(wx);
            max_y = max_y.max(wy);
        }
        (min_x, min_y, max_x, max_y)
    }

    /// Spot category when this element is a spot.
    pub fn spot_type(&self) -> Option<SpotType> {
        match &self.kind {
            ElementKind::Spot { spot_type, .. } => Some(*spot_type),
            _ => None,
        }
    }

    /// Applies a shallow field merge. Fields that do not exist on this
    /// variant are ignored.
    pub fn apply(&mut self, patch: &LayoutElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        match &mut self.kind {
            ElementKind::Spot {
                spot_type,
                width,
                height,
                spot_number,
            } => {
                set(width, patch.width);
                set(height, patch.height);
                set(spot_type, patch.spot_type);
                if let Some(number) = patch.spot_number {
                    *spot_number = number;
                }
            }
            ElementKind::Lane {
                width,
                length,
                direction,
            } => {
                set(width, patch.width);
                set(length, patch.length);
                set(direction, patch.lane_direction);
            }
            ElementKind::Curve {
                width,
                height,
                direction,
            } => {
                set(width, patch.width);
                set(height, patch.height);
                set(direction, patch.curve_direction);
            }
            ElementKind::Entrance { width, direction } => {
                set(width, patch.width);
                set(direction, patch.entrance_direction);
            }
            ElementKind::Ramp {
                width,
                length,
                target_level,
            } => {
                set(width, patch.width);
                set(length, patch.length);
                if let Some(target) = &patch.target_level {
                    *target_level = target.clone();
                }
            }
        }
    }

    /// Returns a copy with `patch` merged in.
    pub fn merged(&self, patch: &LayoutElementPatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

fn set<T: Copy>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Shallow field patch for a layout element.
///
/// `None` leaves a field untouched. For nullable fields (`spot_number`,
/// `target_level`) the inner option is the new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rotation: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub spot_type: Option<SpotType>,
    pub spot_number: Option<Option<u32>>,
    pub lane_direction: Option<LaneDirection>,
    pub curve_direction: Option<CurveDirection>,
    pub entrance_direction: Option<FlowDirection>,
    pub target_level: Option<Option<String>>,
}

impl LayoutElementPatch {
    /// Patch that moves an element.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Adds a rotation to the patch.
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Returns true when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_per_type() {
        let spot = LayoutElement::new("s", ElementType::Spot, 0.0, 0.0, 0.0);
        assert_eq!(spot.footprint(), (40.0, 60.0));
        let lane = LayoutElement::new("l", ElementType::Lane, 0.0, 0.0, 0.0);
        assert_eq!(lane.footprint(), (200.0, 60.0));
        let curve = LayoutElement::new("c", ElementType::Curve, 0.0, 0.0, 0.0);
        assert_eq!(curve.footprint(), (60.0, 160.0));
        let gate = LayoutElement::new("e", ElementType::Entrance, 0.0, 0.0, 0.0);
        assert_eq!(gate.footprint(), (80.0, GATE_DEPTH));
        let ramp = LayoutElement::new("r", ElementType::Ramp, 0.0, 0.0, 0.0);
        assert_eq!(ramp.footprint(), (60.0, 100.0));
    }

    #[test]
    fn test_vertical_lane_footprint() {
        let mut lane = LayoutElement::new("l", ElementType::Lane, 0.0, 0.0, 0.0);
        lane.apply(&LayoutElementPatch {
            lane_direction: Some(LaneDirection::Up),
            ..Default::default()
        });
        assert!(lane.is_vertical_lane());
        assert_eq!(lane.footprint(), (60.0, 200.0));
    }

    #[test]
    fn test_curve_extent_opens_toward_direction() {
        let curve = LayoutElement::new("c", ElementType::Curve, 100.0, 100.0, 0.0);
        assert_eq!(curve.local_extent(), (-30.0, -80.0, 110.0, 80.0));
        assert_eq!(curve.bounds(), (70.0, 20.0, 210.0, 180.0));
    }

    #[test]
    fn test_bounds_rotated_spot() {
        let mut spot = LayoutElement::default_spot("s", 100.0, 100.0);
        spot.rotation = 90.0;
        let (x1, y1, x2, y2) = spot.bounds();
        assert!((x1 - 70.0).abs() < 1e-9);
        assert!((y1 - 80.0).abs() < 1e-9);
        assert!((x2 - 130.0).abs() < 1e-9);
        assert!((y2 - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_patch_ignores_foreign_fields() {
        let spot = LayoutElement::default_spot("s", 20.0, 40.0);
        let patched = spot.merged(&LayoutElementPatch {
            length: Some(500.0),
            lane_direction: Some(LaneDirection::Up),
            width: Some(60.0),
            ..Default::default()
        });
        assert_eq!(patched.footprint(), (60.0, 60.0));
        assert_eq!(patched.x, 20.0);
        assert_eq!(patched.y, 40.0);
        assert_eq!(patched.spot_type(), Some(SpotType::Regular));
    }

    #[test]
    fn test_json_shape() {
        let mut spot = LayoutElement::default_spot("s1", 120.0, 130.0);
        spot.rotation = 180.0;
        spot.apply(&LayoutElementPatch {
            spot_type: Some(SpotType::Ev),
            spot_number: Some(Some(2)),
            ..Default::default()
        });
        let json = serde_json::to_value(&spot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "s1",
                "type": "spot",
                "x": 120.0,
                "y": 130.0,
                "rotation": 180.0,
                "spotType": "ev",
                "width": 40.0,
                "height": 60.0,
                "spotNumber": 2
            })
        );
        let back: LayoutElement = serde_json::from_value(json).unwrap();
        assert_eq!(back, spot);
    }

    #[test]
    fn test_reads_string_spot_number_and_missing_rotation() {
        let json = r#"{"id":"a","type":"ramp","x":0,"y":0,"width":60,"length":100,"targetLevel":"L2"}"#;
        let ramp: LayoutElement = serde_json::from_str(json).unwrap();
        assert_eq!(ramp.rotation, 0.0);
        assert!(matches!(
            ramp.kind,
            ElementKind::Ramp { target_level: Some(ref t), .. } if t == "L2"
        ));

        let json = r#"{"id":"b","type":"spot","x":0,"y":0,"width":40,"height":60,"spotNumber":"12"}"#;
        let spot: LayoutElement = serde_json::from_str(json).unwrap();
        assert!(matches!(
            spot.kind,
            ElementKind::Spot {
                spot_number: Some(12),
                ..
            }
        ));
    }
}
