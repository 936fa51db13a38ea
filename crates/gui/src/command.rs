//! Reversible edit commands and the undo log they are committed to.
//!
//! Every completed gesture (and every programmatic scene operation) becomes
//! exactly one [`EditCommand`]. A command carries the whole delta, applies
//! it, and can reverse it exactly; the log stores committed commands in push
//! order and never reorders them. In-flight gesture previews use
//! `apply`/`revert` directly and never reach the log.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shared::{Canvas, CanvasId, EntityKind, EntityRef, Photo, SceneDescription, Stroke};

use crate::frame::PlaneFrame;
use crate::helpers;

/// Maximum number of committed commands retained for undo
const UNDO_CAPACITY: usize = 100;

/// One undoable edit, expressed as a self-contained reversible delta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditCommand {
    /// Offset a canvas frame by a world-space vector
    TranslateCanvas { id: CanvasId, delta: [f32; 3] },
    /// Rotate a canvas frame about a world-space pivot. When `recenter` is
    /// set, the canvas's entities are first shifted so the frame center
    /// moves to the (on-plane) pivot, keeping entity-local coordinates and
    /// global placement mutually consistent.
    RotateCanvas {
        id: CanvasId,
        rotation: [f32; 4],
        pivot: [f32; 3],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        recenter: Option<[f64; 2]>,
    },
    /// Append a finished stroke to a canvas
    AddStroke { canvas: CanvasId, stroke: Stroke },
    /// Insert a complete canvas (creation, clone, ortho)
    AddCanvas { canvas: Canvas },
    /// Remove a canvas; the full canvas is retained for reversal
    RemoveCanvas { canvas: Canvas },
    /// Move entities from `source` onto a new canvas. `canvas` already holds
    /// the moved entities at their final placement.
    SeparateCanvas {
        source: CanvasId,
        refs: Vec<EntityRef>,
        canvas: Canvas,
    },
    /// Translate selected entities within their canvas plane
    MoveEntities {
        canvas: CanvasId,
        refs: Vec<EntityRef>,
        delta: [f64; 2],
    },
    /// Scale selected entities about a local-space center
    ScaleEntities {
        canvas: CanvasId,
        refs: Vec<EntityRef>,
        factor: f64,
        center: [f64; 2],
    },
    /// Rotate selected entities about a local-space center
    RotateEntities {
        canvas: CanvasId,
        refs: Vec<EntityRef>,
        angle: f64,
        center: [f64; 2],
    },
    /// Offset calibration control points
    MoveCalibrationPoints {
        canvas: CanvasId,
        indices: Vec<usize>,
        delta: [f64; 2],
    },
}

impl EditCommand {
    /// Apply the delta to the scene. Returns false when the target no longer
    /// exists (stale id), in which case the scene is left untouched.
    pub fn apply(&self, scene: &mut SceneDescription) -> bool {
        match self {
            EditCommand::TranslateCanvas { id, delta } => {
                with_frame(scene, id, |frame| frame.translate(Vec3::from(*delta)))
            }
            EditCommand::RotateCanvas {
                id,
                rotation,
                pivot,
                recenter,
            } => {
                let Some(canvas) = scene.get_canvas_mut(id) else {
                    return false;
                };
                let mut frame = PlaneFrame::from_shared(&canvas.frame);
                if let Some(uv) = recenter {
                    let refs = canvas.entity_refs();
                    helpers::translate_entities(canvas, &refs, [-uv[0], -uv[1]]);
                    let shifted = frame.to_global(*uv);
                    frame.set_translation(shifted);
                }
                frame.rotate(helpers::quat_from_array(*rotation), Vec3::from(*pivot));
                canvas.frame = frame.to_shared();
                true
            }
            EditCommand::AddStroke { canvas, stroke } => {
                let Some(canvas) = scene.get_canvas_mut(canvas) else {
                    return false;
                };
                canvas.strokes.push(stroke.clone());
                true
            }
            EditCommand::AddCanvas { canvas } => {
                scene.canvases.push(canvas.clone());
                true
            }
            EditCommand::RemoveCanvas { canvas } => remove_canvas(scene, &canvas.id),
            EditCommand::SeparateCanvas {
                source,
                refs,
                canvas,
            } => {
                let Some(src) = scene.get_canvas_mut(source) else {
                    return false;
                };
                let _ = helpers::take_entities(src, refs);
                scene.canvases.push(canvas.clone());
                true
            }
            EditCommand::MoveEntities {
                canvas,
                refs,
                delta,
            } => with_canvas(scene, canvas, |c| {
                helpers::translate_entities(c, refs, *delta)
            }),
            EditCommand::ScaleEntities {
                canvas,
                refs,
                factor,
                center,
            } => with_canvas(scene, canvas, |c| {
                helpers::scale_entities(c, refs, *factor, *center)
            }),
            EditCommand::RotateEntities {
                canvas,
                refs,
                angle,
                center,
            } => with_canvas(scene, canvas, |c| {
                helpers::rotate_entities(c, refs, *angle, *center)
            }),
            EditCommand::MoveCalibrationPoints {
                canvas,
                indices,
                delta,
            } => with_canvas(scene, canvas, |c| {
                helpers::move_calibration_points(c, indices, *delta)
            }),
        }
    }

    /// Reverse the delta exactly
    pub fn revert(&self, scene: &mut SceneDescription) -> bool {
        match self {
            EditCommand::TranslateCanvas { id, delta } => {
                with_frame(scene, id, |frame| frame.translate(-Vec3::from(*delta)))
            }
            EditCommand::RotateCanvas {
                id,
                rotation,
                pivot,
                recenter,
            } => {
                let Some(canvas) = scene.get_canvas_mut(id) else {
                    return false;
                };
                let mut frame = PlaneFrame::from_shared(&canvas.frame);
                frame.rotate(
                    helpers::quat_from_array(*rotation).inverse(),
                    Vec3::from(*pivot),
                );
                if let Some(uv) = recenter {
                    let refs = canvas.entity_refs();
                    helpers::translate_entities(canvas, &refs, *uv);
                    // With the rotation restored, undo the translation shift
                    // the recentering applied.
                    let back = frame.translation() - (frame.to_global(*uv) - frame.translation());
                    frame.set_translation(back);
                }
                canvas.frame = frame.to_shared();
                true
            }
            EditCommand::AddStroke { canvas, stroke } => with_canvas(scene, canvas, |c| {
                c.strokes.retain(|s| s.id != stroke.id);
            }),
            EditCommand::AddCanvas { canvas } => remove_canvas(scene, &canvas.id),
            EditCommand::RemoveCanvas { canvas } => {
                scene.canvases.push(canvas.clone());
                true
            }
            EditCommand::SeparateCanvas {
                source,
                refs,
                canvas,
            } => {
                if !remove_canvas(scene, &canvas.id) {
                    return false;
                }
                let Some(src) = scene.get_canvas_mut(source) else {
                    return false;
                };
                // Re-insert the moved entities at their original indices so
                // the refs stay valid across a revert/re-apply cycle.
                // Removal was highest-first; insertion is lowest-first.
                let mut strokes: Vec<(usize, Stroke)> = Vec::new();
                let mut photos: Vec<(usize, Photo)> = Vec::new();
                let (mut si, mut pi) = (0usize, 0usize);
                for r in refs {
                    match r.kind {
                        EntityKind::Stroke => {
                            if let Some(s) = canvas.strokes.get(si) {
                                strokes.push((r.index, s.clone()));
                                si += 1;
                            }
                        }
                        EntityKind::Photo => {
                            if let Some(p) = canvas.photos.get(pi) {
                                photos.push((r.index, p.clone()));
                                pi += 1;
                            }
                        }
                    }
                }
                strokes.sort_by_key(|(i, _)| *i);
                photos.sort_by_key(|(i, _)| *i);
                for (i, s) in strokes {
                    let i = i.min(src.strokes.len());
                    src.strokes.insert(i, s);
                }
                for (i, p) in photos {
                    let i = i.min(src.photos.len());
                    src.photos.insert(i, p);
                }
                true
            }
            EditCommand::MoveEntities {
                canvas,
                refs,
                delta,
            } => with_canvas(scene, canvas, |c| {
                helpers::translate_entities(c, refs, [-delta[0], -delta[1]])
            }),
            EditCommand::ScaleEntities {
                canvas,
                refs,
                factor,
                center,
            } => with_canvas(scene, canvas, |c| {
                helpers::scale_entities(c, refs, 1.0 / *factor, *center)
            }),
            EditCommand::RotateEntities {
                canvas,
                refs,
                angle,
                center,
            } => with_canvas(scene, canvas, |c| {
                helpers::rotate_entities(c, refs, -*angle, *center)
            }),
            EditCommand::MoveCalibrationPoints {
                canvas,
                indices,
                delta,
            } => with_canvas(scene, canvas, |c| {
                helpers::move_calibration_points(c, indices, [-delta[0], -delta[1]])
            }),
        }
    }
}

fn with_canvas<F: FnOnce(&mut Canvas)>(scene: &mut SceneDescription, id: &str, f: F) -> bool {
    match scene.get_canvas_mut(id) {
        Some(canvas) => {
            f(canvas);
            true
        }
        None => false,
    }
}

fn with_frame<F: FnOnce(&mut PlaneFrame)>(scene: &mut SceneDescription, id: &str, f: F) -> bool {
    with_canvas(scene, id, |canvas| {
        let mut frame = PlaneFrame::from_shared(&canvas.frame);
        f(&mut frame);
        canvas.frame = frame.to_shared();
    })
}

fn remove_canvas(scene: &mut SceneDescription, id: &str) -> bool {
    let before = scene.canvases.len();
    scene.canvases.retain(|c| c.id != id);
    scene.canvases.len() != before
}

/// Append-only undo log of committed gestures.
///
/// Contract: accept a committed delta, reverse it exactly on demand, never
/// reorder entries relative to push order.
#[derive(Default)]
pub struct CommandLog {
    undo: Vec<EditCommand>,
    redo: Vec<EditCommand>,
}

impl CommandLog {
    /// Record a freshly committed command. New work invalidates redo.
    pub fn push(&mut self, cmd: EditCommand) {
        self.undo.push(cmd);
        if self.undo.len() > UNDO_CAPACITY {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    /// Take the most recent committed command for reversal
    pub fn pop_undo(&mut self) -> Option<EditCommand> {
        self.undo.pop()
    }

    /// Park a reversed command for redo
    pub fn stash_redo(&mut self, cmd: EditCommand) {
        self.redo.push(cmd);
    }

    /// Take the most recently reversed command for re-application
    pub fn pop_redo(&mut self) -> Option<EditCommand> {
        self.redo.pop()
    }

    /// Put a redone command back on the undo stack without clearing redo
    pub fn stash_undo(&mut self, cmd: EditCommand) {
        self.undo.push(cmd);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of committed entries currently available for undo
    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use shared::Point2D;

    fn scene_with_canvas() -> (SceneDescription, CanvasId) {
        let mut scene = SceneDescription::default();
        let mut canvas = Canvas::new("c1".into(), "Canvas".into());
        canvas.strokes.push(Stroke {
            id: "s1".into(),
            points: vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)],
            width: 2.0,
        });
        scene.canvases.push(canvas);
        (scene, "c1".into())
    }

    fn center(scene: &SceneDescription, id: &str) -> Vec3 {
        PlaneFrame::from_shared(&scene.get_canvas(id).unwrap().frame).center()
    }

    #[test]
    fn test_translate_apply_revert() {
        let (mut scene, id) = scene_with_canvas();
        let cmd = EditCommand::TranslateCanvas {
            id: id.clone(),
            delta: [0.0, 0.0, 2.0],
        };
        assert!(cmd.apply(&mut scene));
        assert!((center(&scene, &id) - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-6);
        assert!(cmd.revert(&mut scene));
        assert!(center(&scene, &id).length() < 1e-6);
    }

    #[test]
    fn test_rotate_apply_revert() {
        let (mut scene, id) = scene_with_canvas();
        let rot = Quat::from_axis_angle(Vec3::Y, 0.8);
        let cmd = EditCommand::RotateCanvas {
            id: id.clone(),
            rotation: helpers::quat_to_array(rot),
            pivot: [0.0, 0.0, 0.0],
            recenter: None,
        };
        cmd.apply(&mut scene);
        let normal = PlaneFrame::from_shared(&scene.get_canvas(&id).unwrap().frame).normal();
        assert!((normal - rot * Vec3::Z).length() < 1e-5);
        cmd.revert(&mut scene);
        let normal = PlaneFrame::from_shared(&scene.get_canvas(&id).unwrap().frame).normal();
        assert!((normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_rotate_with_recenter_revert_restores_entities() {
        let (mut scene, id) = scene_with_canvas();
        let before = scene.clone();
        let cmd = EditCommand::RotateCanvas {
            id: id.clone(),
            rotation: helpers::quat_to_array(Quat::from_axis_angle(Vec3::X, 0.5)),
            pivot: [1.0, 0.0, 0.0],
            recenter: Some([1.0, 0.0]),
        };
        cmd.apply(&mut scene);
        // The recentered frame sits at the pivot.
        assert!((center(&scene, &id) - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
        // Entities were shifted to compensate.
        assert!((scene.get_canvas(&id).unwrap().strokes[0].points[0].x + 1.0).abs() < 1e-6);
        cmd.revert(&mut scene);
        assert!(center(&scene, &id).length() < 1e-5);
        assert_eq!(
            scene.get_canvas(&id).unwrap().strokes,
            before.get_canvas(&id).unwrap().strokes
        );
    }

    #[test]
    fn test_separate_apply_revert() {
        let (mut scene, id) = scene_with_canvas();
        let mut detached = Canvas::new("c2".into(), "Detached".into());
        detached.strokes = scene.get_canvas(&id).unwrap().strokes.clone();
        let cmd = EditCommand::SeparateCanvas {
            source: id.clone(),
            refs: vec![EntityRef::stroke(0)],
            canvas: detached,
        };
        cmd.apply(&mut scene);
        assert_eq!(scene.canvases.len(), 2);
        assert!(scene.get_canvas(&id).unwrap().strokes.is_empty());
        cmd.revert(&mut scene);
        assert_eq!(scene.canvases.len(), 1);
        assert_eq!(scene.get_canvas(&id).unwrap().strokes.len(), 1);
    }

    #[test]
    fn test_separate_revert_restores_original_indices() {
        let (mut scene, id) = scene_with_canvas();
        scene.get_canvas_mut(&id).unwrap().strokes.push(Stroke {
            id: "s2".into(),
            points: vec![Point2D::new(5.0, 5.0)],
            width: 2.0,
        });
        let mut detached = Canvas::new("c2".into(), "Detached".into());
        detached
            .strokes
            .push(scene.get_canvas(&id).unwrap().strokes[0].clone());
        let cmd = EditCommand::SeparateCanvas {
            source: id.clone(),
            refs: vec![EntityRef::stroke(0)],
            canvas: detached,
        };

        // apply/revert/apply cycles must keep ref indices valid
        cmd.apply(&mut scene);
        assert_eq!(scene.get_canvas(&id).unwrap().strokes[0].id, "s2");
        cmd.revert(&mut scene);
        let strokes = &scene.get_canvas(&id).unwrap().strokes;
        assert_eq!(strokes[0].id, "s1");
        assert_eq!(strokes[1].id, "s2");
        cmd.apply(&mut scene);
        assert_eq!(scene.get_canvas(&id).unwrap().strokes[0].id, "s2");
        cmd.revert(&mut scene);
    }

    #[test]
    fn test_apply_on_missing_canvas_is_noop() {
        let (mut scene, _) = scene_with_canvas();
        let cmd = EditCommand::TranslateCanvas {
            id: "ghost".into(),
            delta: [1.0, 0.0, 0.0],
        };
        assert!(!cmd.apply(&mut scene));
    }

    #[test]
    fn test_log_push_clears_redo() {
        let mut log = CommandLog::default();
        let cmd = EditCommand::TranslateCanvas {
            id: "c".into(),
            delta: [1.0, 0.0, 0.0],
        };
        log.push(cmd.clone());
        let undone = log.pop_undo().unwrap();
        log.stash_redo(undone);
        assert!(log.can_redo());
        log.push(cmd);
        assert!(!log.can_redo());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_log_capacity_drops_oldest() {
        let mut log = CommandLog::default();
        for i in 0..110 {
            log.push(EditCommand::TranslateCanvas {
                id: format!("c{i}"),
                delta: [0.0, 0.0, 0.0],
            });
        }
        assert_eq!(log.len(), 100);
    }
}
