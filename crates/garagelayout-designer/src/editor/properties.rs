//! Property panel edits for the selected layout element.

use garagelayout_core::{
    CurveDirection, ElementType, FlowDirection, Garage, LaneDirection, LayoutElementPatch,
    SpotType,
};

/// Rotation input step in degrees.
pub const ROTATION_STEP: f64 = 15.0;

/// Fields the panel shows for an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyField {
    Rotation,
    Width,
    Height,
    Length,
    SpotType,
    SpotNumber,
    LaneDirection,
    CurveDirection,
    EntranceDirection,
    TargetLevel,
}

/// Panel layout per element type.
pub fn fields_for(element_type: ElementType) -> &'static [PropertyField] {
    type F = PropertyField;
    match element_type {
        ElementType::Entrance => &[F::EntranceDirection, F::Width, F::Rotation],
        ElementType::Lane => &[F::LaneDirection, F::Width, F::Length, F::Rotation],
        ElementType::Spot => &[
            F::SpotType,
            F::SpotNumber,
            F::Width,
            F::Height,
            F::Rotation,
        ],
        ElementType::Curve => &[F::CurveDirection, F::Width, F::Height, F::Rotation],
        ElementType::Ramp => &[F::TargetLevel, F::Width, F::Length, F::Rotation],
    }
}

/// One edit from the property panel. Numeric inputs arrive as raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEdit {
    Rotation(String),
    Width(String),
    Height(String),
    Length(String),
    SpotNumber(String),
    SpotType(SpotType),
    LaneDirection(LaneDirection),
    CurveDirection(CurveDirection),
    EntranceDirection(FlowDirection),
    /// `None` clears the ramp target.
    TargetLevel(Option<String>),
}

/// Parses a numeric field, coercing anything unparsable to `0`.
pub fn parse_number(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

impl PropertyEdit {
    /// Translates the edit into an element patch.
    pub fn to_patch(&self) -> LayoutElementPatch {
        let mut patch = LayoutElementPatch::default();
        match self {
            PropertyEdit::Rotation(v) => patch.rotation = Some(parse_number(v).clamp(0.0, 360.0)),
            PropertyEdit::Width(v) => patch.width = Some(parse_number(v)),
            PropertyEdit::Height(v) => patch.height = Some(parse_number(v)),
            PropertyEdit::Length(v) => patch.length = Some(parse_number(v)),
            PropertyEdit::SpotNumber(v) => {
                patch.spot_number = Some(if v.trim().is_empty() {
                    None
                } else {
                    Some(parse_number(v).max(0.0) as u32)
                })
            }
            PropertyEdit::SpotType(t) => patch.spot_type = Some(*t),
            PropertyEdit::LaneDirection(d) => patch.lane_direction = Some(*d),
            PropertyEdit::CurveDirection(d) => patch.curve_direction = Some(*d),
            PropertyEdit::EntranceDirection(d) => patch.entrance_direction = Some(*d),
            PropertyEdit::TargetLevel(t) => patch.target_level = Some(t.clone()),
        }
        patch
    }
}

/// Ramp target choices `(level id, level name)`: the garage's other levels.
pub fn ramp_target_options(garage: &Garage, level_id: &str) -> Vec<(String, String)> {
    garage
        .other_levels(level_id)
        .map(|l| (l.id.clone(), l.name.clone()))
        .collect()
}
