//! Headless test harness: drives real pointer gestures through the camera,
//! query layer and interaction controller with no GL or egui context.

use glam::{Quat, Vec3};
use shared::{Canvas, CanvasId, EntityRef, Point2D, SceneDescription, Stroke};

use crate::frame::PlaneFrame;
use crate::interact::{InteractionController, PointerEvent, ToolMode};
use crate::state::scene::SceneState;
use crate::state::settings::AppSettings;
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::query::CanvasQuery;

/// Headless harness: scene, controller, camera and a fixed viewport rect
pub struct TestHarness {
    pub scene: SceneState,
    pub interact: InteractionController,
    pub settings: AppSettings,
    pub camera: ArcBallCamera,
    pub rect: egui::Rect,
}

impl TestHarness {
    /// Create an empty harness with the default oblique camera
    pub fn new() -> Self {
        Self {
            scene: SceneState::default(),
            interact: InteractionController::default(),
            settings: AppSettings::default(),
            camera: ArcBallCamera::new(),
            rect: egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0)),
        }
    }

    // ── Scene setup ───────────────────────────────────────────

    /// Insert a canvas directly, without touching the undo log. Tests that
    /// count commits seed their scene this way.
    pub fn seed_canvas(&mut self, name: &str) -> CanvasId {
        self.seed_canvas_with(name, Quat::IDENTITY, Vec3::ZERO)
    }

    /// Insert a canvas with a given placement, without touching the log
    pub fn seed_canvas_with(&mut self, name: &str, rotation: Quat, translation: Vec3) -> CanvasId {
        let mut canvas = Canvas::new(uuid::Uuid::new_v4().to_string(), name.to_string());
        let mut frame = PlaneFrame::identity();
        frame.set_rotation(rotation);
        frame.set_translation(translation);
        canvas.frame = frame.to_shared();
        let id = canvas.id.clone();
        self.scene.scene.canvases.push(canvas);
        id
    }

    /// Append a stroke directly to a canvas, without touching the log
    pub fn seed_stroke(&mut self, canvas_id: &str, points: &[(f64, f64)]) -> Option<EntityRef> {
        let canvas = self.scene.scene.get_canvas_mut(canvas_id)?;
        canvas.strokes.push(Stroke {
            id: uuid::Uuid::new_v4().to_string(),
            points: points.iter().map(|&(x, y)| Point2D::new(x, y)).collect(),
            width: 2.0,
        });
        Some(EntityRef::stroke(canvas.strokes.len() - 1))
    }

    /// Attach a calibration rig directly to a canvas
    pub fn seed_calibration(
        &mut self,
        canvas_id: &str,
        points: &[(f64, f64)],
        wires: &[[usize; 2]],
    ) {
        if let Some(canvas) = self.scene.scene.get_canvas_mut(canvas_id) {
            canvas.calibration = Some(shared::CalibrationRig {
                points: points.iter().map(|&(x, y)| Point2D::new(x, y)).collect(),
                wires: wires.to_vec(),
            });
        }
    }

    /// Create a canvas through the committed operation (one log entry)
    pub fn create_canvas(&mut self, name: &str) -> CanvasId {
        self.interact.interrupt(&mut self.scene);
        self.scene.create_canvas(name)
    }

    // ── Mode / selection ──────────────────────────────────────

    pub fn set_mode(&mut self, mode: ToolMode) {
        self.interact.set_mode(&mut self.scene, mode);
    }

    pub fn set_current(&mut self, canvas_id: &str) {
        self.interact.set_current_canvas(Some(canvas_id.to_string()));
    }

    /// Mark one entity as the selection of `canvas_id`
    pub fn select_entity(&mut self, canvas_id: &str, entity: EntityRef) {
        self.set_current(canvas_id);
        self.interact.selection.select(canvas_id.to_string(), entity);
        if let Some(canvas) = self.scene.get_canvas(canvas_id) {
            self.interact.selection.recompute_bounds(canvas);
        }
    }

    // ── Camera ────────────────────────────────────────────────

    pub fn set_camera(&mut self, yaw: f32, pitch: f32, distance: f32) {
        self.camera.yaw = yaw;
        self.camera.pitch = pitch;
        self.camera.distance = distance;
    }

    /// Screen position of a world point under the current camera
    pub fn world_to_screen(&self, world: Vec3) -> Option<egui::Pos2> {
        self.camera.project(world, self.rect)
    }

    // ── Pointer events ────────────────────────────────────────

    pub fn send(&mut self, event: PointerEvent) {
        let query = CanvasQuery::new(&self.camera, self.rect);
        self.interact
            .handle_event(&mut self.scene, &self.settings, &query, event);
    }

    pub fn press(&mut self, x: f32, y: f32) {
        self.send(PointerEvent::Pressed(egui::pos2(x, y)));
    }

    pub fn drag(&mut self, x: f32, y: f32) {
        self.send(PointerEvent::Dragged(egui::pos2(x, y)));
    }

    pub fn release(&mut self, x: f32, y: f32) {
        self.send(PointerEvent::Released(egui::pos2(x, y)));
    }

    pub fn abort(&mut self) {
        self.send(PointerEvent::Aborted);
    }

    /// Press at the screen projection of a world point
    pub fn press_world(&mut self, world: Vec3) -> bool {
        match self.world_to_screen(world) {
            Some(pos) => {
                self.send(PointerEvent::Pressed(pos));
                true
            }
            None => false,
        }
    }

    /// Drag to the screen projection of a world point
    pub fn drag_world(&mut self, world: Vec3) -> bool {
        match self.world_to_screen(world) {
            Some(pos) => {
                self.send(PointerEvent::Dragged(pos));
                true
            }
            None => false,
        }
    }

    /// Release at the screen projection of a world point
    pub fn release_world(&mut self, world: Vec3) -> bool {
        match self.world_to_screen(world) {
            Some(pos) => {
                self.send(PointerEvent::Released(pos));
                true
            }
            None => false,
        }
    }

    // ── History ───────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.interact.interrupt(&mut self.scene);
        self.scene.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.interact.interrupt(&mut self.scene);
        self.scene.redo()
    }

    /// Number of committed entries available for undo
    pub fn undo_depth(&self) -> usize {
        self.scene.undo_depth()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn canvas_count(&self) -> usize {
        self.scene.scene.canvases.len()
    }

    pub fn stroke_count(&self, canvas_id: &str) -> usize {
        self.scene
            .get_canvas(canvas_id)
            .map(|c| c.strokes.len())
            .unwrap_or(0)
    }

    pub fn canvas_center(&self, canvas_id: &str) -> Option<Vec3> {
        self.scene
            .get_canvas(canvas_id)
            .map(|c| PlaneFrame::from_shared(&c.frame).center())
    }

    pub fn canvas_normal(&self, canvas_id: &str) -> Option<Vec3> {
        self.scene
            .get_canvas(canvas_id)
            .map(|c| PlaneFrame::from_shared(&c.frame).normal())
    }

    // ── Persistence ───────────────────────────────────────────

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> String {
        serde_json::to_string_pretty(&self.scene.scene).unwrap_or_default()
    }

    /// Load a scene from JSON, replacing the current one
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        let scene: SceneDescription =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        self.interact.interrupt(&mut self.scene);
        self.interact.set_current_canvas(None);
        self.scene.set_scene(scene);
        Ok(())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
