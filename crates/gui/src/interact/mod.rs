//! Pointer-mode interaction state machine.
//!
//! The controller receives a stream of pointer events plus an externally
//! selected tool mode and turns each press/drag/release cycle into exactly
//! one committed, undoable edit. Drag-style modes follow a three-phase
//! protocol: PRESSED seeds a session, every DRAGGED re-queries the scene and
//! replaces the visual-only preview, RELEASED reverts the preview and pushes
//! a single commit. Any degenerate query along the way aborts the gesture
//! and restores the pre-gesture state.

mod canvas_gestures;
mod entity_gestures;
mod metrology;
mod session;
mod sketch_gesture;

pub use session::{EditSession, SessionKind};

use glam::Vec3;
use shared::{CanvasId, Point2D};

use crate::command::EditCommand;
use crate::frame::PlaneFrame;
use crate::state::scene::SceneState;
use crate::state::selection::SelectionState;
use crate::state::settings::AppSettings;
use crate::viewport::picking;
use crate::viewport::query::CanvasQuery;

/// Which canvas-frame axis a rotate gesture turns about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateAxis {
    PlusU,
    MinusU,
    PlusV,
    MinusV,
}

impl RotateAxis {
    /// World-space rotation axis for a given frame
    pub fn world_axis(&self, frame: &PlaneFrame) -> Vec3 {
        match self {
            RotateAxis::PlusU => frame.u_axis(),
            RotateAxis::MinusU => -frame.u_axis(),
            RotateAxis::PlusV => frame.v_axis(),
            RotateAxis::MinusV => -frame.v_axis(),
        }
    }
}

/// Fixed set of interaction modes, selected externally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    /// Entity selection (idle)
    #[default]
    Select,
    /// Freeform stroke sketching on the current canvas
    Sketch,
    /// Pick which canvas is current
    CanvasSelect,
    /// Drag the current canvas along its own normal
    CanvasOffset,
    /// Rotate the current canvas about an in-plane axis
    CanvasRotate(RotateAxis),
    /// Drag a deep copy of the current canvas along its normal
    CanvasClone,
    /// Drag the selected entities onto a new parallel canvas
    CanvasSeparate,
    /// Translate the selection within the canvas plane
    EntityMove,
    /// Scale the selection about its center
    EntityScale,
    /// Rotate the selection about its reference center
    EntityRotate,
    /// Drag a single-view-metrology calibration point
    CalibratePoint,
    /// Drag a calibration wire (both endpoints)
    CalibrateWire,
}

/// One pointer event, as delivered by the host shell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed(egui::Pos2),
    Dragged(egui::Pos2),
    Released(egui::Pos2),
    Moved(egui::Pos2),
    /// Synthetic abort (Esc, mode switch, programmatic interrupt)
    Aborted,
}

/// Outcome of re-querying the scene for an active session
enum Step {
    /// The query degenerated; abandon the gesture
    Abort,
    /// Replacement preview carrying the new accumulated delta
    Preview(EditCommand),
    /// Next sketch point
    Point([f64; 2]),
}

/// Mode-tagged dispatcher owning the current/previous canvas markers, the
/// selection group, and at most one active edit session.
#[derive(Default)]
pub struct InteractionController {
    mode: ToolMode,
    session: Option<EditSession>,
    current_canvas: Option<CanvasId>,
    previous_canvas: Option<CanvasId>,
    pub selection: SelectionState,
}

impl InteractionController {
    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// The in-flight gesture, if any (used by the shell to render previews)
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn session_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_canvas(&self) -> Option<&CanvasId> {
        self.current_canvas.as_ref()
    }

    pub fn previous_canvas(&self) -> Option<&CanvasId> {
        self.previous_canvas.as_ref()
    }

    /// Switch the current canvas. The outgoing canvas loses its selection.
    pub fn set_current_canvas(&mut self, id: Option<CanvasId>) {
        if self.current_canvas == id {
            return;
        }
        self.previous_canvas = self.current_canvas.take();
        self.current_canvas = id;
        self.selection.clear();
    }

    /// Switch tool mode. A pending session is force-finished with a
    /// synthetic abort first, so no partial edit is lost or double-applied.
    pub fn set_mode(&mut self, scene: &mut SceneState, mode: ToolMode) {
        if self.session.is_some() {
            tracing::debug!(?mode, "mode switch with pending session, aborting it");
            self.abort(scene);
        }
        self.mode = mode;
    }

    /// Force-finish any pending session before a programmatic (non-pointer)
    /// mutation of the scene.
    pub fn interrupt(&mut self, scene: &mut SceneState) {
        if self.session.is_some() {
            self.abort(scene);
        }
    }

    /// Feed one pointer event through the state machine
    pub fn handle_event(
        &mut self,
        scene: &mut SceneState,
        settings: &AppSettings,
        query: &CanvasQuery,
        event: PointerEvent,
    ) {
        match event {
            PointerEvent::Pressed(pos) => {
                if self.session.is_some() {
                    tracing::warn!("pointer press while an edit session is active, ignoring");
                    return;
                }
                match self.mode {
                    ToolMode::Select | ToolMode::CanvasSelect => {}
                    ToolMode::Sketch => self.sketch_pressed(scene, query, pos),
                    ToolMode::CanvasOffset => self.offset_pressed(scene, query, pos),
                    ToolMode::CanvasRotate(axis) => self.rotate_pressed(scene, query, pos, axis),
                    ToolMode::CanvasClone => self.clone_pressed(scene, query, pos),
                    ToolMode::CanvasSeparate => self.separate_pressed(scene, query, pos),
                    ToolMode::EntityMove => self.move_pressed(scene, query, pos),
                    ToolMode::EntityScale => self.scale_pressed(scene, query, pos),
                    ToolMode::EntityRotate => self.spin_pressed(scene, query, pos),
                    ToolMode::CalibratePoint => {
                        self.calibration_pressed(scene, settings, query, pos, false)
                    }
                    ToolMode::CalibrateWire => {
                        self.calibration_pressed(scene, settings, query, pos, true)
                    }
                }
            }
            PointerEvent::Dragged(pos) => {
                let Some(step) = self.gesture_step(scene, query, pos) else {
                    return;
                };
                match step {
                    Step::Abort => self.abort(scene),
                    Step::Preview(cmd) => self.swap_preview(scene, cmd),
                    Step::Point(uv) => self.push_stroke_point(uv),
                }
            }
            PointerEvent::Released(pos) => {
                if matches!(self.mode, ToolMode::Select | ToolMode::CanvasSelect) {
                    self.pick_released(scene, settings, query, pos);
                    return;
                }
                let Some(step) = self.gesture_step(scene, query, pos) else {
                    return;
                };
                match step {
                    Step::Abort => self.abort(scene),
                    Step::Preview(cmd) => self.finish_gesture(scene, cmd),
                    Step::Point(uv) => {
                        self.push_stroke_point(uv);
                        self.finish_stroke(scene, settings);
                    }
                }
            }
            PointerEvent::Moved(_) => {}
            PointerEvent::Aborted => self.abort(scene),
        }
    }

    /// Abandon the in-flight gesture, restoring pre-gesture state
    pub fn abort(&mut self, scene: &mut SceneState) {
        if let Some(mut session) = self.session.take() {
            if let Some(preview) = session.preview.take() {
                scene.revert_preview(&preview);
            }
            tracing::debug!(canvas = %session.canvas, "edit gesture aborted");
        }
    }

    // ── Session plumbing ─────────────────────────────────────────

    /// Re-query the scene for the active session and compute the next step.
    /// Returns `None` when no session is active.
    fn gesture_step(
        &self,
        scene: &SceneState,
        query: &CanvasQuery,
        pos: egui::Pos2,
    ) -> Option<Step> {
        let session = self.session.as_ref()?;

        let step = match &session.kind {
            SessionKind::Offset {
                line_point,
                line_dir,
                start,
            } => match query.line_hit(*line_point, *line_dir, pos) {
                Ok(hit) => Step::Preview(EditCommand::TranslateCanvas {
                    id: session.canvas.clone(),
                    delta: (hit - *start).to_array(),
                }),
                Err(_) => Step::Abort,
            },
            SessionKind::RotateCanvas {
                center,
                axis,
                start_dir,
            } => match query.plane_hit(*center, *axis, pos) {
                Ok(hit) => {
                    let dir = hit - *center;
                    if dir.length() < 1e-4 {
                        Step::Abort
                    } else {
                        let dir = dir.normalize();
                        let angle = start_dir.cross(dir).dot(*axis).atan2(start_dir.dot(dir));
                        Step::Preview(EditCommand::RotateCanvas {
                            id: session.canvas.clone(),
                            rotation: crate::helpers::quat_to_array(glam::Quat::from_axis_angle(
                                *axis, angle,
                            )),
                            pivot: center.to_array(),
                            recenter: None,
                        })
                    }
                }
                Err(_) => Step::Abort,
            },
            SessionKind::CloneCanvas {
                line_point,
                line_dir,
                start,
                template,
            } => match query.line_hit(*line_point, *line_dir, pos) {
                Ok(hit) => Step::Preview(EditCommand::AddCanvas {
                    canvas: offset_template(template, hit - *start),
                }),
                Err(_) => Step::Abort,
            },
            SessionKind::SeparateCanvas {
                line_point,
                line_dir,
                start,
                refs,
                template,
            } => match query.line_hit(*line_point, *line_dir, pos) {
                Ok(hit) => Step::Preview(EditCommand::SeparateCanvas {
                    source: session.canvas.clone(),
                    refs: refs.clone(),
                    canvas: offset_template(template, hit - *start),
                }),
                Err(_) => Step::Abort,
            },
            SessionKind::MoveSelection { refs, start } => {
                match self.session_local_hit(scene, &session.canvas, query, pos) {
                    Some(uv) => Step::Preview(EditCommand::MoveEntities {
                        canvas: session.canvas.clone(),
                        refs: refs.clone(),
                        delta: [uv[0] - start[0], uv[1] - start[1]],
                    }),
                    None => Step::Abort,
                }
            }
            SessionKind::ScaleSelection {
                refs,
                center,
                start_dist,
            } => match self.session_local_hit(scene, &session.canvas, query, pos) {
                Some(uv) => {
                    let d = ((uv[0] - center[0]).powi(2) + (uv[1] - center[1]).powi(2)).sqrt();
                    if d < 1e-9 || *start_dist < 1e-9 {
                        Step::Abort
                    } else {
                        Step::Preview(EditCommand::ScaleEntities {
                            canvas: session.canvas.clone(),
                            refs: refs.clone(),
                            factor: d / start_dist,
                            center: *center,
                        })
                    }
                }
                None => Step::Abort,
            },
            SessionKind::RotateSelection {
                refs,
                center,
                start_angle,
            } => match self.session_local_hit(scene, &session.canvas, query, pos) {
                Some(uv) => {
                    let dx = uv[0] - center[0];
                    let dy = uv[1] - center[1];
                    if dx.hypot(dy) < 1e-9 {
                        Step::Abort
                    } else {
                        Step::Preview(EditCommand::RotateEntities {
                            canvas: session.canvas.clone(),
                            refs: refs.clone(),
                            angle: dy.atan2(dx) - start_angle,
                            center: *center,
                        })
                    }
                }
                None => Step::Abort,
            },
            SessionKind::Stroke { .. } => {
                match self.session_local_hit(scene, &session.canvas, query, pos) {
                    Some(uv) => Step::Point(uv),
                    None => Step::Abort,
                }
            }
            SessionKind::Calibration { indices, start } => {
                match self.session_local_hit(scene, &session.canvas, query, pos) {
                    Some(uv) => Step::Preview(EditCommand::MoveCalibrationPoints {
                        canvas: session.canvas.clone(),
                        indices: indices.clone(),
                        delta: [uv[0] - start[0], uv[1] - start[1]],
                    }),
                    None => Step::Abort,
                }
            }
        };
        Some(step)
    }

    /// Local-plane hit for session kinds that stay within the canvas plane
    fn session_local_hit(
        &self,
        scene: &SceneState,
        canvas: &str,
        query: &CanvasQuery,
        pos: egui::Pos2,
    ) -> Option<[f64; 2]> {
        let canvas = scene.get_canvas(canvas)?;
        let frame = PlaneFrame::from_shared(&canvas.frame);
        query.local_hit(&frame, pos).ok()
    }

    /// Replace the session preview with a new accumulated delta
    fn swap_preview(&mut self, scene: &mut SceneState, cmd: EditCommand) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(old) = session.preview.take() {
            scene.revert_preview(&old);
        }
        if scene.apply_preview(&cmd) {
            if let Some(session) = self.session.as_mut() {
                session.preview = Some(cmd);
            }
        } else {
            tracing::warn!("preview target vanished mid-gesture, aborting");
            self.session = None;
        }
    }

    /// Revert the preview and push the whole gesture as one commit
    fn finish_gesture(&mut self, scene: &mut SceneState, cmd: EditCommand) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        if let Some(preview) = session.preview.take() {
            scene.revert_preview(&preview);
        }
        let new_current = match &cmd {
            EditCommand::AddCanvas { canvas } => Some(canvas.id.clone()),
            EditCommand::SeparateCanvas { canvas, .. } => Some(canvas.id.clone()),
            _ => None,
        };
        if scene.commit(cmd) {
            if let Some(id) = new_current {
                self.set_current_canvas(Some(id));
            }
        }
    }

    fn push_stroke_point(&mut self, uv: [f64; 2]) {
        if let Some(session) = self.session.as_mut() {
            if let SessionKind::Stroke { points } = &mut session.kind {
                points.push(Point2D::new(uv[0], uv[1]));
            }
        }
    }

    // ── Pick modes ───────────────────────────────────────────────

    /// Single occupancy query on release: nearest canvas by ray parameter,
    /// then nearest entity of that canvas by 2D distance.
    fn pick_released(
        &mut self,
        scene: &SceneState,
        settings: &AppSettings,
        query: &CanvasQuery,
        pos: egui::Pos2,
    ) {
        let hit = picking::pick_canvas(
            &scene.scene,
            query,
            pos,
            settings.pick.canvas_half_extent,
            settings.pick.canvas_margin,
        );

        match self.mode {
            ToolMode::CanvasSelect => {
                if let Some(hit) = hit {
                    self.set_current_canvas(Some(hit.canvas));
                }
            }
            ToolMode::Select => {
                let Some(hit) = hit else {
                    self.selection.clear();
                    return;
                };
                self.set_current_canvas(Some(hit.canvas.clone()));
                let Some(canvas) = scene.get_canvas(&hit.canvas) else {
                    return;
                };
                match picking::pick_entity(canvas, hit.uv, settings.pick.entity_tolerance) {
                    Some(entity) => {
                        self.selection.select(hit.canvas.clone(), entity);
                        self.selection.recompute_bounds(canvas);
                    }
                    None => self.selection.clear(),
                }
            }
            _ => {}
        }
    }

    /// Frame of the current canvas, if it still exists
    fn current_frame(&self, scene: &SceneState) -> Option<(CanvasId, PlaneFrame)> {
        let id = self.current_canvas.clone()?;
        let canvas = scene.get_canvas(&id)?;
        Some((id, PlaneFrame::from_shared(&canvas.frame)))
    }
}

/// A gesture template canvas offset by a world-space vector
fn offset_template(template: &shared::Canvas, offset: Vec3) -> shared::Canvas {
    let mut canvas = template.clone();
    let mut frame = PlaneFrame::from_shared(&canvas.frame);
    frame.translate(offset);
    canvas.frame = frame.to_shared();
    canvas
}
