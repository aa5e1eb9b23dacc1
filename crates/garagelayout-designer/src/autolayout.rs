//! Auto-layout: double-loaded aisles generated from spot counts.
//!
//! Aisles are stacked top to bottom. Each aisle has a top row of spots
//! facing down, a lane, and a bottom row facing up. Successive aisles are
//! joined by U-turn curves on alternating sides, so traffic snakes from the
//! entry on the left to the exit on whichever side the last lane flows to.

use garagelayout_core::{
    CurveDirection, ElementKind, ElementType, FlowDirection, IdGenerator, LaneDirection,
    LayoutElement, LayoutError, Level, SpotType,
};

pub const SPOT_W: f64 = 40.0;
pub const SPOT_H: f64 = 60.0;
pub const LANE_W: f64 = 60.0;
pub const MARGIN: f64 = 100.0;
pub const AISLE_GAP: f64 = 40.0;
pub const CURVE_SPACE: f64 = 80.0;
/// Two spot rows plus the lane between them.
pub const AISLE_HEIGHT: f64 = 2.0 * SPOT_H + LANE_W;
/// Horizontal inset of the entry and exit gates.
const GATE_INSET: f64 = 40.0;
const GATE_WIDTH: f64 = 60.0;

/// Requested spot counts and viewport size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoLayoutParams {
    pub total_spots: u32,
    pub ev_spots: u32,
    pub ada_spots: u32,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl AutoLayoutParams {
    /// Uses the counts stored on `level`.
    pub fn for_level(level: &Level, canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            total_spots: level.total_spots,
            ev_spots: level.ev_spots,
            ada_spots: level.ada_spots,
            canvas_width,
            canvas_height,
        }
    }
}

/// Derived aisle geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AisleGeometry {
    pub usable_width: f64,
    pub spots_per_side: u32,
    pub spots_per_aisle: u32,
    pub aisles: u32,
    pub canvas_height: f64,
}

impl AisleGeometry {
    pub fn compute(params: &AutoLayoutParams) -> Result<Self, LayoutError> {
        let usable_width = params.canvas_width - 2.0 * MARGIN - CURVE_SPACE;
        let per_side = (usable_width / SPOT_W).floor();
        if per_side.is_nan() || per_side < 1.0 {
            return Err(LayoutError::CanvasTooNarrow {
                width: params.canvas_width,
                usable: usable_width,
            });
        }
        let spots_per_side = per_side as u32;
        let spots_per_aisle = 2 * spots_per_side;
        let aisles = params.total_spots.div_ceil(spots_per_aisle);
        let required = if aisles == 0 {
            0.0
        } else {
            let n = f64::from(aisles);
            MARGIN + n * AISLE_HEIGHT + (n - 1.0) * AISLE_GAP + MARGIN
        };
        Ok(Self {
            usable_width,
            spots_per_side,
            spots_per_aisle,
            aisles,
            canvas_height: params.canvas_height.max(required),
        })
    }

    /// Top edge of an aisle.
    pub fn aisle_y(aisle: u32) -> f64 {
        MARGIN + f64::from(aisle) * (AISLE_HEIGHT + AISLE_GAP)
    }

    /// Center line of an aisle's lane.
    pub fn lane_y(aisle: u32) -> f64 {
        Self::aisle_y(aisle) + SPOT_H + LANE_W / 2.0
    }
}

/// Generated layout for one level.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoLayout {
    pub elements: Vec<LayoutElement>,
    pub geometry: AisleGeometry,
}

impl AutoLayout {
    /// Canvas height to persist on the level, set only when the layout
    /// outgrows the viewport.
    pub fn stored_canvas_height(&self, viewport_height: f64) -> Option<f64> {
        (self.geometry.canvas_height > viewport_height).then_some(self.geometry.canvas_height)
    }

    /// Replaces the level's elements with the generated ones.
    pub fn apply_to(self, level: &mut Level, viewport_height: f64) {
        level.canvas_height = self.stored_canvas_height(viewport_height);
        level.layout_elements = self.elements;
    }
}

/// Hands out spot categories in allocation order.
struct SpotAllocator {
    ada_left: u32,
    ev_left: u32,
}

impl SpotAllocator {
    fn next(&mut self, allow_ada: bool) -> SpotType {
        if allow_ada && self.ada_left > 0 {
            self.ada_left -= 1;
            SpotType::Ada
        } else if self.ev_left > 0 {
            self.ev_left -= 1;
            SpotType::Ev
        } else {
            SpotType::Regular
        }
    }
}

fn gate(
    ids: &mut IdGenerator,
    x: f64,
    y: f64,
    rotation: f64,
    direction: FlowDirection,
) -> LayoutElement {
    LayoutElement {
        id: ids.next_id(),
        x,
        y,
        rotation,
        kind: ElementKind::Entrance {
            width: GATE_WIDTH,
            direction,
        },
    }
}

fn spot(
    ids: &mut IdGenerator,
    x: f64,
    y: f64,
    rotation: f64,
    spot_type: SpotType,
    number: u32,
) -> LayoutElement {
    LayoutElement {
        id: ids.next_id(),
        x,
        y,
        rotation,
        kind: ElementKind::Spot {
            spot_type,
            width: SPOT_W,
            height: SPOT_H,
            spot_number: Some(number),
        },
    }
}

/// Generates a full aisle layout.
///
/// ADA spots are only allocated on the top row of each aisle, in every
/// aisle until the ADA count is used up. The exit gate sits on the side the
/// last lane flows toward, its arrow pointing out of the garage.
pub fn generate(
    params: &AutoLayoutParams,
    ids: &mut IdGenerator,
) -> Result<AutoLayout, LayoutError> {
    if params.ev_spots.saturating_add(params.ada_spots) > params.total_spots {
        return Err(LayoutError::InconsistentSpotCounts {
            total: params.total_spots,
            ev: params.ev_spots,
            ada: params.ada_spots,
        });
    }
    let geometry = AisleGeometry::compute(params)?;
    let mut elements = Vec::new();
    let mut alloc = SpotAllocator {
        ada_left: params.ada_spots,
        ev_left: params.ev_spots,
    };
    let mut placed = 0u32;

    // Arrow points right, into the garage.
    elements.push(gate(
        ids,
        GATE_INSET,
        AisleGeometry::lane_y(0),
        -90.0,
        FlowDirection::In,
    ));

    for aisle in 0..geometry.aisles {
        if placed >= params.total_spots {
            break;
        }
        let aisle_y = AisleGeometry::aisle_y(aisle);

        for i in 0..geometry.spots_per_side {
            if placed >= params.total_spots {
                break;
            }
            placed += 1;
            let x = MARGIN + f64::from(i) * SPOT_W + SPOT_W / 2.0;
            let kind = alloc.next(true);
            elements.push(spot(ids, x, aisle_y + SPOT_H / 2.0, 180.0, kind, placed));
        }

        elements.push(LayoutElement {
            id: ids.next_id(),
            x: MARGIN + geometry.usable_width / 2.0,
            y: AisleGeometry::lane_y(aisle),
            rotation: 0.0,
            kind: ElementKind::Lane {
                width: LANE_W,
                length: geometry.usable_width + CURVE_SPACE,
                direction: if aisle % 2 == 0 {
                    LaneDirection::Right
                } else {
                    LaneDirection::Left
                },
            },
        });

        for i in 0..geometry.spots_per_side {
            if placed >= params.total_spots {
                break;
            }
            placed += 1;
            let x = MARGIN + f64::from(i) * SPOT_W + SPOT_W / 2.0;
            let kind = alloc.next(false);
            let y = aisle_y + SPOT_H + LANE_W + SPOT_H / 2.0;
            elements.push(spot(ids, x, y, 0.0, kind, placed));
        }

        if aisle + 1 < geometry.aisles {
            let (x, direction) = if aisle % 2 == 0 {
                (
                    MARGIN + geometry.usable_width + CURVE_SPACE / 2.0,
                    CurveDirection::Right,
                )
            } else {
                (MARGIN - CURVE_SPACE / 2.0, CurveDirection::Left)
            };
            let mut curve = LayoutElement::new(
                ids.next_id(),
                ElementType::Curve,
                x,
                aisle_y + AISLE_HEIGHT + AISLE_GAP / 2.0,
                0.0,
            );
            if let ElementKind::Curve {
                height,
                direction: dir,
                ..
            } = &mut curve.kind
            {
                *height = AISLE_GAP + 2.0 * SPOT_H;
                *dir = direction;
            }
            elements.push(curve);
        }
    }

    let last = geometry.aisles.saturating_sub(1);
    let exit_y = AisleGeometry::lane_y(last);
    let exit = if last % 2 == 0 {
        gate(
            ids,
            params.canvas_width - GATE_INSET,
            exit_y,
            -90.0,
            FlowDirection::Out,
        )
    } else {
        gate(ids, GATE_INSET, exit_y, 90.0, FlowDirection::Out)
    };
    elements.push(exit);

    tracing::info!(
        "Auto-layout: {} spots in {} aisles ({} per side), canvas height {}",
        placed,
        geometry.aisles,
        geometry.spots_per_side,
        geometry.canvas_height
    );

    Ok(AutoLayout { elements, geometry })
}
