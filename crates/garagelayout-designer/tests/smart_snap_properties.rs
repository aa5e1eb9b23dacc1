//! Property tests for smart snapping.
//!
//! 1. Results are always grid aligned.
//! 2. Snapping a snapped position again changes nothing, from single
//!    elements up to mixed layouts of lanes and spots, including rows of
//!    spots lining a lane edge.

use garagelayout_core::{ElementType, LaneDirection, LayoutElement, LayoutElementPatch};
use garagelayout_designer::{smart_snap, GRID};
use proptest::prelude::*;

fn grid_coord(range: std::ops::Range<i32>) -> impl Strategy<Value = f64> {
    range.prop_map(|n| f64::from(n) * GRID)
}

fn direction_strategy() -> impl Strategy<Value = LaneDirection> {
    prop_oneof![
        Just(LaneDirection::Up),
        Just(LaneDirection::Down),
        Just(LaneDirection::Left),
        Just(LaneDirection::Right),
    ]
}

fn lane_strategy() -> impl Strategy<Value = LayoutElement> {
    (
        grid_coord(0..60),
        grid_coord(0..60),
        2i32..7,
        2i32..20,
        direction_strategy(),
    )
        .prop_map(|(x, y, w, l, direction)| {
            LayoutElement::new("lane", ElementType::Lane, x, y, 0.0).merged(&LayoutElementPatch {
                width: Some(f64::from(w) * GRID),
                length: Some(f64::from(l) * GRID),
                lane_direction: Some(direction),
                ..Default::default()
            })
        })
}

fn spot_strategy() -> impl Strategy<Value = LayoutElement> {
    (grid_coord(0..60), grid_coord(0..60), 0i32..24).prop_map(|(x, y, r)| {
        let mut spot = LayoutElement::default_spot("spot", x, y);
        spot.rotation = f64::from(r) * 15.0;
        spot
    })
}

fn element_type_strategy() -> impl Strategy<Value = ElementType> {
    prop_oneof![
        Just(ElementType::Spot),
        Just(ElementType::Lane),
        Just(ElementType::Curve),
        Just(ElementType::Entrance),
        Just(ElementType::Ramp),
    ]
}

fn with_unique_ids(elements: Vec<LayoutElement>) -> Vec<LayoutElement> {
    elements
        .into_iter()
        .enumerate()
        .map(|(i, mut e)| {
            e.id = format!("e{i}");
            e
        })
        .collect()
}

fn mixed_layout_strategy() -> impl Strategy<Value = Vec<LayoutElement>> {
    (
        prop::collection::vec(lane_strategy(), 1..4),
        prop::collection::vec(spot_strategy(), 1..6),
    )
        .prop_map(|(lanes, spots)| with_unique_ids(lanes.into_iter().chain(spots).collect()))
}

/// A lane with spots placed along its top and bottom rows, some of them
/// beyond the lane's ends.
fn lane_row_strategy() -> impl Strategy<Value = Vec<LayoutElement>> {
    (
        grid_coord(10..50),
        grid_coord(10..50),
        prop::collection::vec((-8i32..8, any::<bool>(), 0i32..4), 1..6),
    )
        .prop_map(|(x, y, slots)| {
            let mut elements = vec![LayoutElement::new("lane", ElementType::Lane, x, y, 0.0)];
            for (k, above, quarter) in slots {
                let row = if above { y - 60.0 } else { y + 60.0 };
                let slot_x = x + f64::from(k) * 2.0 * GRID;
                let mut spot = LayoutElement::default_spot("spot", slot_x, row);
                spot.rotation = f64::from(quarter) * 90.0;
                elements.push(spot);
            }
            with_unique_ids(elements)
        })
}

fn layout_strategy() -> impl Strategy<Value = Vec<LayoutElement>> {
    prop_oneof![
        Just(Vec::new()),
        lane_strategy().prop_map(|l| vec![l]),
        spot_strategy().prop_map(|s| vec![s]),
        mixed_layout_strategy(),
        lane_row_strategy(),
    ]
}

fn assert_idempotent(layout: &[LayoutElement], x: f64, y: f64, t: ElementType) {
    let first = smart_snap(layout, x, y, None, t);
    let second = smart_snap(layout, first.x, first.y, None, t);
    assert_eq!(first, second, "layout={layout:?} cursor=({x}, {y}) type={t:?}");
}

proptest! {
    #[test]
    fn results_are_grid_aligned(
        layout in layout_strategy(),
        x in -200.0f64..1400.0,
        y in -200.0f64..1400.0,
        t in element_type_strategy(),
    ) {
        let r = smart_snap(&layout, x, y, None, t);
        prop_assert_eq!(r.x % GRID, 0.0);
        prop_assert_eq!(r.y % GRID, 0.0);
        if let Some(rotation) = r.rotation {
            prop_assert!((0.0..360.0).contains(&rotation));
        }
    }

    #[test]
    fn snapping_is_idempotent(
        layout in layout_strategy(),
        x in -200.0f64..1400.0,
        y in -200.0f64..1400.0,
        t in element_type_strategy(),
    ) {
        assert_idempotent(&layout, x, y, t);
    }

    #[test]
    fn snapping_beside_a_lane_row_is_idempotent(
        layout in lane_row_strategy(),
        dx in -240.0f64..240.0,
        dy in -120.0f64..120.0,
        t in element_type_strategy(),
    ) {
        let (x, y) = (layout[0].x + dx, layout[0].y + dy);
        assert_idempotent(&layout, x, y, t);
    }
}

#[test]
fn spot_slot_past_lane_end_is_stable() {
    let lane = LayoutElement::new("l", ElementType::Lane, 400.0, 300.0, 0.0);
    let layout = vec![lane, LayoutElement::default_spot("n", 600.0, 240.0)];
    assert_idempotent(&layout, 540.0, 250.0, ElementType::Spot);
}

#[test]
fn scenario_spot_on_lane_top_edge() {
    let lane = LayoutElement::new("l1", ElementType::Lane, 400.0, 300.0, 0.0);
    let r = smart_snap(&[lane], 420.0, 250.0, None, ElementType::Spot);
    assert_eq!((r.x, r.y, r.rotation), (420.0, 240.0, Some(180.0)));
}
