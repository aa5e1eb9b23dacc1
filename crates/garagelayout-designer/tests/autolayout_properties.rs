//! Auto-layout counting properties and the small-lot scenario.

use garagelayout_core::{ElementKind, FlowDirection, IdGenerator, LayoutElement, SpotType};
use garagelayout_designer::autolayout::{
    generate, AutoLayoutParams, AISLE_GAP, AISLE_HEIGHT, MARGIN,
};
use proptest::prelude::*;

fn spots(elements: &[LayoutElement]) -> Vec<(f64, f64, f64, SpotType, Option<u32>)> {
    elements
        .iter()
        .filter_map(|e| match e.kind {
            ElementKind::Spot {
                spot_type,
                spot_number,
                ..
            } => Some((e.x, e.y, e.rotation, spot_type, spot_number)),
            _ => None,
        })
        .collect()
}

fn gates(elements: &[LayoutElement], dir: FlowDirection) -> Vec<&LayoutElement> {
    elements
        .iter()
        .filter(|e| matches!(e.kind, ElementKind::Entrance { direction, .. } if direction == dir))
        .collect()
}

#[test]
fn small_lot() {
    let params = AutoLayoutParams {
        total_spots: 24,
        ev_spots: 2,
        ada_spots: 1,
        canvas_width: 900.0,
        canvas_height: 400.0,
    };
    let layout = generate(&params, &mut IdGenerator::new("el")).unwrap();
    assert_eq!(layout.geometry.spots_per_side, 15);
    assert_eq!(layout.geometry.spots_per_aisle, 30);
    assert_eq!(layout.geometry.aisles, 1);

    let spots = spots(&layout.elements);
    assert_eq!(spots.len(), 24);
    let numbers: Vec<u32> = spots.iter().filter_map(|s| s.4).collect();
    assert_eq!(numbers, (1..=24).collect::<Vec<_>>());

    let top: Vec<_> = spots.iter().filter(|s| s.2 == 180.0).collect();
    let bottom: Vec<_> = spots.iter().filter(|s| s.2 == 0.0).collect();
    assert_eq!(top.len(), 15);
    assert_eq!(bottom.len(), 9);
    assert_eq!(top[0].3, SpotType::Ada);
    assert_eq!(top[1].3, SpotType::Ev);
    assert_eq!(top[2].3, SpotType::Ev);
    assert!(top[3..].iter().all(|s| s.3 == SpotType::Regular));
    assert!(bottom.iter().all(|s| s.3 == SpotType::Regular));
    assert_eq!((top[0].0, top[0].1), (120.0, 130.0));
    assert_eq!(bottom[0].1, 250.0);

    assert!(!layout
        .elements
        .iter()
        .any(|e| matches!(e.kind, ElementKind::Curve { .. })));

    let entry = gates(&layout.elements, FlowDirection::In);
    assert_eq!(entry.len(), 1);
    assert_eq!((entry[0].x, entry[0].y, entry[0].rotation), (40.0, 190.0, -90.0));
    let exit = gates(&layout.elements, FlowDirection::Out);
    assert_eq!(exit.len(), 1);
    assert_eq!((exit[0].x, exit[0].y, exit[0].rotation), (860.0, 190.0, -90.0));

    assert_eq!(layout.geometry.canvas_height, 400.0);
    assert_eq!(layout.stored_canvas_height(400.0), None);
}

fn counts() -> impl Strategy<Value = (u32, u32, u32)> {
    (0u32..400).prop_flat_map(|total| {
        (Just(total), 0..=total).prop_flat_map(move |(total, ev)| {
            (Just(total), Just(ev), 0..=(total - ev))
        })
    })
}

proptest! {
    #[test]
    fn emits_requested_spots(
        (total, ev, ada) in counts(),
        width in 400.0f64..2000.0,
        height in 200.0f64..1200.0,
    ) {
        let params = AutoLayoutParams {
            total_spots: total,
            ev_spots: ev,
            ada_spots: ada,
            canvas_width: width,
            canvas_height: height,
        };
        let layout = generate(&params, &mut IdGenerator::new("el")).unwrap();
        let spots = spots(&layout.elements);
        let g = layout.geometry;

        prop_assert_eq!(spots.len() as u32, total.min(g.spots_per_aisle * g.aisles));
        prop_assert!(spots.iter().filter(|s| s.3 == SpotType::Ev).count() as u32 <= ev);
        prop_assert!(spots.iter().filter(|s| s.3 == SpotType::Ada).count() as u32 <= ada);
        prop_assert_eq!(gates(&layout.elements, FlowDirection::In).len(), 1);
        prop_assert_eq!(gates(&layout.elements, FlowDirection::Out).len(), 1);

        if g.aisles > 0 {
            let n = f64::from(g.aisles);
            let required = MARGIN + n * AISLE_HEIGHT + (n - 1.0) * AISLE_GAP + MARGIN;
            prop_assert!(g.canvas_height >= required);
        }
        prop_assert!(g.canvas_height >= height);

        let mut ids: Vec<&str> = layout.elements.iter().map(|e| e.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), layout.elements.len());
    }
}
