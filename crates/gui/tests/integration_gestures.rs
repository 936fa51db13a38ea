//! Integration tests for the pointer gesture protocol: one commit per
//! completed gesture, clean aborts, and the per-mode edit semantics,
//! driven through the headless harness (real camera, real queries).

use easel_gui_lib::harness::TestHarness;
use easel_gui_lib::interact::{RotateAxis, ToolMode};
use glam::Vec3;
use shared::EntityRef;

#[test]
fn test_offset_gesture_commits_once_with_net_delta() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.set_current(&id);
    h.set_mode(ToolMode::CanvasOffset);

    assert!(h.press_world(Vec3::ZERO));
    for step in 1..=4 {
        assert!(h.drag_world(Vec3::new(0.0, 0.0, step as f32 * 0.5)));
    }
    assert!(h.release_world(Vec3::new(0.0, 0.0, 2.0)));

    // One gesture, one commit, net effect = final offset.
    assert_eq!(h.undo_depth(), 1);
    let center = h.canvas_center(&id).unwrap();
    assert!(
        (center - Vec3::new(0.0, 0.0, 2.0)).length() < 2e-2,
        "center = {center:?}"
    );
}

#[test]
fn test_offset_end_to_end_with_undo() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.set_current(&id);
    h.set_mode(ToolMode::CanvasOffset);

    assert!(h.press_world(Vec3::ZERO));
    assert!(h.release_world(Vec3::new(0.0, 0.0, 2.0)));

    assert_eq!(h.undo_depth(), 1);
    assert!((h.canvas_center(&id).unwrap() - Vec3::new(0.0, 0.0, 2.0)).length() < 2e-2);

    assert!(h.undo());
    assert!(h.canvas_center(&id).unwrap().length() < 2e-2);
    assert!(h.redo());
    assert!((h.canvas_center(&id).unwrap() - Vec3::new(0.0, 0.0, 2.0)).length() < 2e-2);
}

#[test]
fn test_offset_abort_leaves_no_commit_and_restores_state() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.set_current(&id);
    h.set_mode(ToolMode::CanvasOffset);

    assert!(h.press_world(Vec3::ZERO));
    assert!(h.drag_world(Vec3::new(0.0, 0.0, 1.0)));
    // Preview is visible mid-gesture.
    assert!(h.canvas_center(&id).unwrap().length() > 0.5);

    h.abort();

    assert!(!h.interact.session_active());
    assert_eq!(h.undo_depth(), 0);
    assert!(h.canvas_center(&id).unwrap().length() < 1e-6);
}

#[test]
fn test_offset_degenerate_drag_is_implicit_abort() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.set_current(&id);
    h.set_mode(ToolMode::CanvasOffset);

    assert!(h.press_world(Vec3::ZERO));
    assert!(h.drag_world(Vec3::new(0.0, 0.0, 1.0)));

    // Point the camera straight down the canvas normal: the center pick ray
    // becomes parallel to the normal line and the query degenerates.
    h.set_camera(0.0, 0.0, 6.0);
    h.drag(400.0, 300.0);

    assert!(!h.interact.session_active());
    assert_eq!(h.undo_depth(), 0);
    assert!(h.canvas_center(&id).unwrap().length() < 1e-6);
}

#[test]
fn test_mode_switch_force_finishes_pending_session() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.set_current(&id);
    h.set_mode(ToolMode::CanvasOffset);

    assert!(h.press_world(Vec3::ZERO));
    assert!(h.drag_world(Vec3::new(0.0, 0.0, 1.5)));

    h.set_mode(ToolMode::Select);

    assert!(!h.interact.session_active());
    assert_eq!(h.undo_depth(), 0);
    assert!(h.canvas_center(&id).unwrap().length() < 1e-6);
}

#[test]
fn test_press_without_current_canvas_is_ignored() {
    let mut h = TestHarness::new();
    h.seed_canvas("Wall");
    h.set_mode(ToolMode::CanvasOffset);

    assert!(h.press_world(Vec3::ZERO));
    assert!(!h.interact.session_active());
    assert!(h.release_world(Vec3::new(0.0, 0.0, 1.0)));
    assert_eq!(h.undo_depth(), 0);
}

#[test]
fn test_sketch_commits_one_stroke() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.set_current(&id);
    h.set_mode(ToolMode::Sketch);

    assert!(h.press_world(Vec3::ZERO));
    assert!(h.drag_world(Vec3::new(0.5, 0.0, 0.0)));
    assert!(h.drag_world(Vec3::new(1.0, 0.0, 0.0)));
    assert!(h.release_world(Vec3::new(1.0, 0.5, 0.0)));

    assert_eq!(h.stroke_count(&id), 1);
    assert_eq!(h.undo_depth(), 1);
    let stroke = &h.scene.get_canvas(&id).unwrap().strokes[0];
    assert_eq!(stroke.points.len(), 4);

    assert!(h.undo());
    assert_eq!(h.stroke_count(&id), 0);
}

#[test]
fn test_sketch_below_minimum_length_is_discarded() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.set_current(&id);
    h.set_mode(ToolMode::Sketch);

    assert!(h.press_world(Vec3::ZERO));
    assert!(h.release_world(Vec3::new(0.01, 0.0, 0.0)));

    assert_eq!(h.stroke_count(&id), 0);
    assert_eq!(h.undo_depth(), 0);
    assert!(!h.interact.session_active());
}

#[test]
fn test_sketch_abort_discards_points() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.set_current(&id);
    h.set_mode(ToolMode::Sketch);

    assert!(h.press_world(Vec3::ZERO));
    assert!(h.drag_world(Vec3::new(1.0, 0.0, 0.0)));
    h.abort();

    assert_eq!(h.stroke_count(&id), 0);
    assert_eq!(h.undo_depth(), 0);
}

#[test]
fn test_rotate_gesture_about_v_axis() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.set_current(&id);
    h.set_mode(ToolMode::CanvasRotate(RotateAxis::PlusV));

    // Rotation plane is y = 0; drag the +X direction onto +Z.
    assert!(h.press_world(Vec3::new(1.2, 0.0, 0.0)));
    assert!(h.drag_world(Vec3::new(0.8, 0.0, 0.8)));
    assert!(h.release_world(Vec3::new(0.0, 0.0, 1.2)));

    assert_eq!(h.undo_depth(), 1);
    let normal = h.canvas_normal(&id).unwrap();
    assert!(
        (normal - Vec3::new(-1.0, 0.0, 0.0)).length() < 2e-2,
        "normal = {normal:?}"
    );
    // The center never moves for an about-center rotation.
    assert!(h.canvas_center(&id).unwrap().length() < 1e-5);

    assert!(h.undo());
    assert!((h.canvas_normal(&id).unwrap() - Vec3::Z).length() < 1e-5);
}

#[test]
fn test_clone_gesture_adds_offset_copy() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.seed_stroke(&id, &[(0.0, 0.0), (1.0, 0.0)]);
    h.set_current(&id);
    h.set_mode(ToolMode::CanvasClone);

    assert!(h.press_world(Vec3::ZERO));
    assert!(h.drag_world(Vec3::new(0.0, 0.0, 1.0)));
    assert!(h.release_world(Vec3::new(0.0, 0.0, 1.5)));

    assert_eq!(h.canvas_count(), 2);
    assert_eq!(h.undo_depth(), 1);

    // The clone became the current canvas and sits at the drag offset.
    let clone_id = h.interact.current_canvas().unwrap().clone();
    assert_ne!(clone_id, id);
    let center = h.canvas_center(&clone_id).unwrap();
    assert!((center - Vec3::new(0.0, 0.0, 1.5)).length() < 2e-2);
    assert_eq!(h.stroke_count(&clone_id), 1);
    // The source is untouched.
    assert!(h.canvas_center(&id).unwrap().length() < 1e-6);
    assert_eq!(h.stroke_count(&id), 1);

    assert!(h.undo());
    assert_eq!(h.canvas_count(), 1);
}

#[test]
fn test_clone_abort_removes_preview_canvas() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.set_current(&id);
    h.set_mode(ToolMode::CanvasClone);

    assert!(h.press_world(Vec3::ZERO));
    assert_eq!(h.canvas_count(), 2); // preview copy is visible
    h.abort();

    assert_eq!(h.canvas_count(), 1);
    assert_eq!(h.undo_depth(), 0);
}

#[test]
fn test_separate_gesture_moves_selection_to_new_canvas() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    let stroke = h.seed_stroke(&id, &[(0.0, 0.0), (1.0, 0.0)]).unwrap();
    h.seed_stroke(&id, &[(2.0, 2.0), (3.0, 2.0)]);
    h.select_entity(&id, stroke);
    h.set_mode(ToolMode::CanvasSeparate);

    assert!(h.press_world(Vec3::ZERO));
    assert!(h.drag_world(Vec3::new(0.0, 0.0, 1.0)));
    assert!(h.release_world(Vec3::new(0.0, 0.0, 2.0)));

    assert_eq!(h.canvas_count(), 2);
    assert_eq!(h.undo_depth(), 1);
    assert_eq!(h.stroke_count(&id), 1);

    let detached = h.interact.current_canvas().unwrap().clone();
    assert_eq!(h.stroke_count(&detached), 1);
    let center = h.canvas_center(&detached).unwrap();
    assert!((center - Vec3::new(0.0, 0.0, 2.0)).length() < 2e-2);

    assert!(h.undo());
    assert_eq!(h.canvas_count(), 1);
    assert_eq!(h.stroke_count(&id), 2);
}

#[test]
fn test_separate_without_selection_is_ignored() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.set_current(&id);
    h.set_mode(ToolMode::CanvasSeparate);

    assert!(h.press_world(Vec3::ZERO));
    assert!(!h.interact.session_active());
    assert_eq!(h.canvas_count(), 1);
}

#[test]
fn test_entity_move_gesture() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    let stroke = h.seed_stroke(&id, &[(0.0, 0.0), (1.0, 0.0)]).unwrap();
    h.select_entity(&id, stroke);
    h.set_mode(ToolMode::EntityMove);

    assert!(h.press_world(Vec3::ZERO));
    assert!(h.drag_world(Vec3::new(0.2, 0.2, 0.0)));
    assert!(h.release_world(Vec3::new(0.5, 0.5, 0.0)));

    assert_eq!(h.undo_depth(), 1);
    let points = &h.scene.get_canvas(&id).unwrap().strokes[0].points;
    assert!((points[0].x - 0.5).abs() < 1e-2 && (points[0].y - 0.5).abs() < 1e-2);
    assert!((points[1].x - 1.5).abs() < 1e-2 && (points[1].y - 0.5).abs() < 1e-2);

    assert!(h.undo());
    let points = &h.scene.get_canvas(&id).unwrap().strokes[0].points;
    assert!(points[0].x.abs() < 1e-2 && points[0].y.abs() < 1e-2);
}

#[test]
fn test_entity_scale_gesture() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    let stroke = h.seed_stroke(&id, &[(1.0, 0.0), (3.0, 0.0)]).unwrap();
    h.select_entity(&id, stroke);
    h.set_mode(ToolMode::EntityScale);

    // Selection center is (2, 0); press one unit away, release two away.
    assert!(h.press_world(Vec3::new(3.0, 0.0, 0.0)));
    assert!(h.release_world(Vec3::new(4.0, 0.0, 0.0)));

    assert_eq!(h.undo_depth(), 1);
    let points = &h.scene.get_canvas(&id).unwrap().strokes[0].points;
    assert!((points[0].x - 0.0).abs() < 2e-2, "p0 = {:?}", points[0]);
    assert!((points[1].x - 4.0).abs() < 2e-2, "p1 = {:?}", points[1]);
}

#[test]
fn test_entity_rotate_gesture() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    let stroke = h.seed_stroke(&id, &[(1.0, 0.0), (2.0, 0.0)]).unwrap();
    h.select_entity(&id, stroke);
    h.set_mode(ToolMode::EntityRotate);

    // Rotation center is (1.5, 0); sweep a quarter turn.
    assert!(h.press_world(Vec3::new(2.5, 0.0, 0.0)));
    assert!(h.release_world(Vec3::new(1.5, 1.0, 0.0)));

    assert_eq!(h.undo_depth(), 1);
    let points = &h.scene.get_canvas(&id).unwrap().strokes[0].points;
    assert!((points[0].x - 1.5).abs() < 2e-2 && (points[0].y + 0.5).abs() < 2e-2);
    assert!((points[1].x - 1.5).abs() < 2e-2 && (points[1].y - 0.5).abs() < 2e-2);

    assert!(h.undo());
    let points = &h.scene.get_canvas(&id).unwrap().strokes[0].points;
    assert!((points[0].x - 1.0).abs() < 2e-2 && points[0].y.abs() < 2e-2);
}

#[test]
fn test_calibration_point_drag() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Facade");
    h.seed_calibration(&id, &[(0.0, 0.0), (2.0, 0.0)], &[[0, 1]]);
    h.set_current(&id);
    h.set_mode(ToolMode::CalibratePoint);

    assert!(h.press_world(Vec3::ZERO));
    assert!(h.release_world(Vec3::new(0.5, 0.5, 0.0)));

    assert_eq!(h.undo_depth(), 1);
    let rig = h
        .scene
        .get_canvas(&id)
        .unwrap()
        .calibration
        .clone()
        .unwrap();
    assert!((rig.points[0].x - 0.5).abs() < 1e-2 && (rig.points[0].y - 0.5).abs() < 1e-2);
    // The other point is untouched.
    assert!((rig.points[1].x - 2.0).abs() < 1e-9);

    assert!(h.undo());
    let rig = h
        .scene
        .get_canvas(&id)
        .unwrap()
        .calibration
        .clone()
        .unwrap();
    assert!(rig.points[0].x.abs() < 1e-2 && rig.points[0].y.abs() < 1e-2);
}

#[test]
fn test_calibration_wire_drag_moves_both_endpoints() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Facade");
    h.seed_calibration(&id, &[(0.0, 0.0), (2.0, 0.0)], &[[0, 1]]);
    h.set_current(&id);
    h.set_mode(ToolMode::CalibrateWire);

    assert!(h.press_world(Vec3::new(1.0, 0.05, 0.0)));
    assert!(h.release_world(Vec3::new(1.0, 1.05, 0.0)));

    assert_eq!(h.undo_depth(), 1);
    let rig = h
        .scene
        .get_canvas(&id)
        .unwrap()
        .calibration
        .clone()
        .unwrap();
    assert!((rig.points[0].y - 1.0).abs() < 2e-2);
    assert!((rig.points[1].y - 1.0).abs() < 2e-2);
    assert!((rig.points[1].x - 2.0).abs() < 2e-2);
}

#[test]
fn test_selection_gesture_requires_selection() {
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    h.seed_stroke(&id, &[(0.0, 0.0), (1.0, 0.0)]);
    h.set_current(&id);
    h.set_mode(ToolMode::EntityMove);

    assert!(h.press_world(Vec3::ZERO));
    assert!(!h.interact.session_active());
    assert_eq!(h.undo_depth(), 0);
}

#[test]
fn test_entity_ref_is_stable_across_undo() {
    // Selecting, moving, undoing and redoing keeps the stroke identity.
    let mut h = TestHarness::new();
    let id = h.seed_canvas("Wall");
    let stroke = h.seed_stroke(&id, &[(0.0, 0.0), (1.0, 0.0)]).unwrap();
    assert_eq!(stroke, EntityRef::stroke(0));
    h.select_entity(&id, stroke);
    h.set_mode(ToolMode::EntityMove);

    assert!(h.press_world(Vec3::ZERO));
    assert!(h.release_world(Vec3::new(0.5, 0.0, 0.0)));
    assert!(h.undo());
    assert!(h.redo());

    let points = &h.scene.get_canvas(&id).unwrap().strokes[0].points;
    assert!((points[0].x - 0.5).abs() < 2e-2);
}
