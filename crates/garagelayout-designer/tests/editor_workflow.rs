//! End-to-end editing flows: placement, drag-end, resize and property edits.

use garagelayout_core::{
    DeviceType, ElementType, LayoutElement, LayoutElementPatch, NewDevice, Site, SpotType,
};
use garagelayout_designer::{Editor, Handle, PropertyEdit, Tool};
use pretty_assertions::assert_eq;

fn editor_with_level() -> (Editor, String, String) {
    let mut site = Site::default();
    let gid = site.add_garage("North", "1 Main St");
    let lid = site
        .garage_mut(&gid)
        .map(|g| {
            g.add_level("Level 2");
            g.add_level("Level 1")
        })
        .unwrap();
    let mut editor = Editor::new(site);
    assert!(editor.select_level(&gid, &lid));
    (editor, gid, lid)
}

fn element<'a>(editor: &'a Editor, id: &str) -> &'a LayoutElement {
    editor.current_level().unwrap().element(id).unwrap()
}

#[test]
fn spot_snaps_against_placed_lane() {
    let (mut ed, _, _) = editor_with_level();
    ed.toggle_tool(Tool::Lane);
    ed.click_background(400.0, 300.0, true);
    ed.toggle_tool(Tool::Spot);
    let spot = ed.click_background(420.0, 250.0, true).unwrap();

    let spot = element(&ed, &spot);
    assert_eq!((spot.x, spot.y, spot.rotation), (420.0, 240.0, 180.0));
}

#[test]
fn drag_end_keeps_rotation_when_none_inferred() {
    let (mut ed, _, _) = editor_with_level();
    let id = ed.place_element(ElementType::Ramp, 100.0, 100.0).unwrap();
    ed.update_layout_element(
        &id,
        &LayoutElementPatch {
            rotation: Some(45.0),
            ..Default::default()
        },
    );
    ed.end_element_drag(&id, 333.0, 517.0);
    let ramp = element(&ed, &id);
    assert_eq!((ramp.x, ramp.y, ramp.rotation), (340.0, 520.0, 45.0));
}

#[test]
fn dragged_spot_takes_lane_rotation() {
    let (mut ed, _, _) = editor_with_level();
    ed.place_element(ElementType::Lane, 400.0, 300.0);
    let id = ed.place_element(ElementType::Spot, 600.0, 600.0).unwrap();
    ed.end_element_drag(&id, 390.0, 362.0);
    let spot = element(&ed, &id);
    assert_eq!((spot.x, spot.y, spot.rotation), (400.0, 360.0, 0.0));
}

#[test]
fn placements_stay_on_grid() {
    let (mut ed, _, _) = editor_with_level();
    let cursor = [(13.0, 27.0), (399.0, 251.0), (777.7, 123.4), (-31.0, 5.0)];
    for (i, (x, y)) in cursor.into_iter().enumerate() {
        let t = [
            ElementType::Lane,
            ElementType::Spot,
            ElementType::Curve,
            ElementType::Entrance,
        ][i];
        ed.place_element(t, x, y);
    }
    for e in &ed.current_level().unwrap().layout_elements {
        assert_eq!(e.x % 20.0, 0.0, "{e:?}");
        assert_eq!(e.y % 20.0, 0.0, "{e:?}");
    }
}

#[test]
fn resize_selected_spot_from_east_edge() {
    let (mut ed, gid, lid) = editor_with_level();
    let site = ed
        .site()
        .add_layout_element(&gid, &lid, LayoutElement::default_spot("s", 200.0, 300.0));
    ed.replace_site(site);
    ed.select_layout_element("s");
    ed.resize_selected(Handle::East, 20.0, 0.0);

    let spot = element(&ed, "s");
    assert_eq!((spot.x, spot.y), (210.0, 300.0));
    assert_eq!(spot.footprint(), (60.0, 60.0));
    let selected = ed.selection().layout_element().unwrap();
    assert_eq!(selected, spot);
}

#[test]
fn resize_never_goes_below_minimum() {
    let (mut ed, _, _) = editor_with_level();
    let id = ed.place_element(ElementType::Lane, 400.0, 400.0).unwrap();
    ed.select_layout_element(&id);
    for handle in Handle::ALL {
        ed.resize_selected(handle, -1000.0, -1000.0);
        ed.resize_selected(handle, 1000.0, 1000.0);
    }
    let (w, h) = element(&ed, &id).footprint();
    assert!(w >= 20.0 && h >= 20.0);
}

#[test]
fn property_edits_leave_other_fields() {
    let (mut ed, _, _) = editor_with_level();
    let id = ed.place_element(ElementType::Spot, 100.0, 100.0).unwrap();
    ed.select_layout_element(&id);
    let before = element(&ed, &id).clone();

    ed.edit_selected(&PropertyEdit::SpotType(SpotType::Ev));
    ed.edit_selected(&PropertyEdit::SpotNumber("7".into()));
    let after = element(&ed, &id);
    assert_eq!(after.spot_type(), Some(SpotType::Ev));
    assert_eq!((after.x, after.y, after.rotation), (before.x, before.y, before.rotation));
    assert_eq!(after.footprint(), before.footprint());

    ed.edit_selected(&PropertyEdit::Width("oops".into()));
    assert_eq!(element(&ed, &id).footprint().0, 0.0);
}

#[test]
fn ramp_target_may_dangle() {
    let (mut ed, gid, lid) = editor_with_level();
    let other = ed
        .current_garage()
        .unwrap()
        .other_levels(&lid)
        .next()
        .map(|l| l.id.clone())
        .unwrap();
    let id = ed.place_element(ElementType::Ramp, 100.0, 100.0).unwrap();
    ed.select_layout_element(&id);
    ed.edit_selected(&PropertyEdit::TargetLevel(Some(other.clone())));

    let mut site = ed.site().clone();
    assert!(site.remove_level(&gid, &other));
    ed.replace_site(site);
    let garage = ed.current_garage().unwrap();
    let ramp = element(&ed, &id);
    assert!(matches!(
        &ramp.kind,
        garagelayout_core::ElementKind::Ramp { target_level: Some(t), .. } if *t == other
    ));
    assert_eq!(garage.destination_label(&other), "(unresolved)");
}

#[test]
fn device_and_element_selection_exclusive() {
    let (mut ed, _, _) = editor_with_level();
    let el = ed.place_element(ElementType::Spot, 100.0, 100.0).unwrap();
    let dev = ed
        .add_device(NewDevice::new(DeviceType::CamPtz, "PTZ").at(200.0, 200.0))
        .unwrap();
    for step in 0..6 {
        if step % 2 == 0 {
            ed.select_device(&dev);
        } else {
            ed.select_layout_element(&el);
        }
        let s = ed.selection();
        assert!(!(s.device().is_some() && s.layout_element().is_some()));
    }
}
