//! Grid quantization and smart snapping.
//!
//! Smart snap is a local search over the level's layout elements: spots
//! attach perpendicular to lane edges and line up with neighbouring spots,
//! lanes line up and stack at a fixed aisle pitch. Every result is grid
//! aligned on both axes.

use garagelayout_core::data::element::{SPOT_HEIGHT, SPOT_WIDTH};
use garagelayout_core::{ElementKind, ElementType, LayoutElement};

/// Grid pitch in canvas pixels.
pub const GRID: f64 = 20.0;
/// Maximum distance at which an edge or neighbour captures the cursor.
pub const SNAP_THRESHOLD: f64 = 40.0;
/// Spot depth assumed on both sides of a stacked lane.
const STACK_SPOT_HEIGHT: f64 = 60.0;
/// Clearance between two stacked aisles.
const STACK_GAP: f64 = 40.0;
/// Upper bound on snap passes before a position is accepted as is.
const MAX_SETTLE_PASSES: usize = 64;

/// Rounds a coordinate to the nearest grid line.
pub fn snap_to_grid(v: f64) -> f64 {
    (v / GRID).round() * GRID
}

/// Normalizes an angle in degrees into `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Outcome of [`smart_snap`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    /// Inferred rotation; only ever set for spots.
    pub rotation: Option<f64>,
}

impl SnapResult {
    /// The rotation to store, keeping `current` when none was inferred.
    pub fn rotation_or(&self, current: f64) -> f64 {
        self.rotation.unwrap_or(current)
    }
}

/// Lane edge a spot can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Spot rotation facing into the lane.
    fn spot_rotation(self) -> f64 {
        match self {
            Edge::Top => 180.0,
            Edge::Bottom => 0.0,
            Edge::Left => 90.0,
            Edge::Right => -90.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct EdgeCandidate {
    edge: Edge,
    /// Attached coordinate: y for top/bottom edges, x for left/right.
    coord: f64,
    distance: f64,
}

/// Resolves a proposed position for an element of `element_type`.
///
/// `elements` is the level's current layout. The element named by `self_id`
/// is excluded from the search; when it is a spot or lane its own size and
/// orientation drive the snap.
///
/// A single pass can land on a position that a second pass would move again,
/// for instance a neighbour slot just past a lane's span. The pass is
/// therefore repeated from its own output until the position settles, and
/// the rotation is the one inferred at that final position. When passes
/// cycle, the smallest position of the cycle is taken.
pub fn smart_snap(
    elements: &[LayoutElement],
    x: f64,
    y: f64,
    self_id: Option<&str>,
    element_type: ElementType,
) -> SnapResult {
    let pass = |x: f64, y: f64| snap_pass(elements, x, y, self_id, element_type);

    let mut result = pass(x, y);
    let mut visited = vec![(result.x, result.y)];
    for _ in 0..MAX_SETTLE_PASSES {
        let next = pass(result.x, result.y);
        if (next.x, next.y) == (result.x, result.y) {
            result = next;
            break;
        }
        if let Some(start) = visited.iter().position(|&p| p == (next.x, next.y)) {
            let (cx, cy) = visited[start..]
                .iter()
                .copied()
                .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)))
                .unwrap_or((next.x, next.y));
            result = SnapResult {
                x: cx,
                y: cy,
                rotation: pass(cx, cy).rotation,
            };
            break;
        }
        visited.push((next.x, next.y));
        result = next;
    }

    tracing::debug!(
        "smart_snap {:?} ({}, {}) -> ({}, {}) rotation {:?} after {} passes",
        element_type,
        x,
        y,
        result.x,
        result.y,
        result.rotation,
        visited.len()
    );
    result
}

/// One round of grid quantization plus edge and neighbour attachment.
fn snap_pass(
    elements: &[LayoutElement],
    x: f64,
    y: f64,
    self_id: Option<&str>,
    element_type: ElementType,
) -> SnapResult {
    let qx = snap_to_grid(x);
    let qy = snap_to_grid(y);
    let this = self_id.and_then(|id| elements.iter().find(|e| e.id == id));
    let others = elements
        .iter()
        .filter(move |e| self_id.map_or(true, |id| e.id != id));

    let (rx, ry, rotation) = match element_type {
        ElementType::Spot => {
            let (sw, sh) = match this.map(|e| &e.kind) {
                Some(ElementKind::Spot { width, height, .. }) => (*width, *height),
                _ => (SPOT_WIDTH, SPOT_HEIGHT),
            };
            snap_spot(others, qx, qy, sw, sh)
        }
        ElementType::Lane => {
            let horizontal = this.map_or(true, |e| !e.is_vertical_lane());
            let (rx, ry) = if horizontal {
                snap_lane(others, qx, qy)
            } else {
                (qx, qy)
            };
            (rx, ry, None)
        }
        _ => (qx, qy, None),
    };

    SnapResult {
        x: snap_to_grid(rx),
        y: snap_to_grid(ry),
        rotation: rotation.map(normalize_rotation),
    }
}

fn lane_edge_candidates(
    lane: &LayoutElement,
    qx: f64,
    qy: f64,
    sw: f64,
    sh: f64,
) -> Vec<EdgeCandidate> {
    let ElementKind::Lane {
        width,
        length,
        direction,
    } = &lane.kind
    else {
        return Vec::new();
    };
    let half_len = length / 2.0;
    let half_w = width / 2.0;
    let offset = half_w + sh / 2.0;

    if direction.is_vertical() {
        if (qy - lane.y).abs() > half_len + sw {
            return Vec::new();
        }
        let left = lane.x - offset;
        let right = lane.x + offset;
        vec![
            EdgeCandidate {
                edge: Edge::Left,
                coord: left,
                distance: (qx - left).abs(),
            },
            EdgeCandidate {
                edge: Edge::Right,
                coord: right,
                distance: (qx - right).abs(),
            },
        ]
    } else {
        if (qx - lane.x).abs() > half_len + sw {
            return Vec::new();
        }
        let top = lane.y - offset;
        let bottom = lane.y + offset;
        vec![
            EdgeCandidate {
                edge: Edge::Top,
                coord: top,
                distance: (qy - top).abs(),
            },
            EdgeCandidate {
                edge: Edge::Bottom,
                coord: bottom,
                distance: (qy - bottom).abs(),
            },
        ]
    }
}

fn snap_spot<'a>(
    others: impl Iterator<Item = &'a LayoutElement> + Clone,
    qx: f64,
    qy: f64,
    sw: f64,
    sh: f64,
) -> (f64, f64, Option<f64>) {
    let mut rx = qx;
    let mut ry = qy;
    let mut rotation = None;

    let best = others
        .clone()
        .filter(|e| e.element_type() == ElementType::Lane)
        .flat_map(|lane| lane_edge_candidates(lane, qx, qy, sw, sh))
        .filter(|c| c.distance < SNAP_THRESHOLD)
        .min_by(|a, b| a.distance.total_cmp(&b.distance));

    if let Some(candidate) = best {
        match candidate.edge {
            Edge::Top | Edge::Bottom => ry = candidate.coord,
            Edge::Left | Edge::Right => rx = candidate.coord,
        }
        rotation = Some(candidate.edge.spot_rotation());
    }

    for spot in others.filter(|e| e.element_type() == ElementType::Spot) {
        let ElementKind::Spot { width, .. } = &spot.kind else {
            continue;
        };
        if (ry - spot.y).abs() < SNAP_THRESHOLD / 2.0 {
            ry = spot.y;
            let slot = [spot.x - width, spot.x + width]
                .into_iter()
                .map(|slot| (slot, (rx - slot).abs()))
                .filter(|(_, d)| *d < SNAP_THRESHOLD)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((slot_x, _)) = slot {
                rx = slot_x;
                if rotation.is_none() {
                    rotation = Some(spot.rotation);
                }
            }
        } else if (rx - spot.x).abs() < SNAP_THRESHOLD / 2.0 {
            rx = spot.x;
        }
    }

    (rx, ry, rotation)
}

fn snap_lane<'a>(
    others: impl Iterator<Item = &'a LayoutElement>,
    qx: f64,
    qy: f64,
) -> (f64, f64) {
    let mut rx = qx;
    let mut ry = qy;
    for lane in others {
        let ElementKind::Lane {
            width, direction, ..
        } = &lane.kind
        else {
            continue;
        };
        if direction.is_vertical() {
            continue;
        }
        if (rx - lane.x).abs() < SNAP_THRESHOLD {
            rx = lane.x;
        }
        let stacked = lane.y + width + 2.0 * STACK_SPOT_HEIGHT + STACK_GAP;
        if (ry - stacked).abs() < SNAP_THRESHOLD {
            ry = stacked;
        }
    }
    (rx, ry)
}
