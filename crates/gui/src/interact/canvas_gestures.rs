//! PRESSED handlers for the canvas-frame gestures: offset, rotate, clone,
//! separate. Drag geometry is frozen here so the preview cannot feed back
//! into subsequent queries.

use shared::{Canvas, EntityKind};

use crate::command::EditCommand;
use crate::helpers;
use crate::state::scene::SceneState;
use crate::viewport::query::CanvasQuery;

use super::session::{EditSession, SessionKind};
use super::{InteractionController, RotateAxis};

impl InteractionController {
    /// Start dragging the current canvas along its own normal
    pub(super) fn offset_pressed(
        &mut self,
        scene: &mut SceneState,
        query: &CanvasQuery,
        pos: egui::Pos2,
    ) {
        let Some((id, frame)) = self.current_frame(scene) else {
            tracing::debug!("canvas-offset press with no current canvas");
            return;
        };
        match query.normal_hit(&frame, pos) {
            Ok(start) => {
                self.session = Some(EditSession {
                    canvas: id,
                    kind: SessionKind::Offset {
                        line_point: frame.center(),
                        line_dir: frame.normal(),
                        start,
                    },
                    preview: None,
                });
            }
            Err(err) => tracing::debug!(%err, "canvas-offset press ignored"),
        }
    }

    /// Start rotating the current canvas about one of its in-plane axes
    pub(super) fn rotate_pressed(
        &mut self,
        scene: &mut SceneState,
        query: &CanvasQuery,
        pos: egui::Pos2,
        axis: RotateAxis,
    ) {
        let Some((id, frame)) = self.current_frame(scene) else {
            tracing::debug!("canvas-rotate press with no current canvas");
            return;
        };
        let world_axis = axis.world_axis(&frame);
        let center = frame.center();
        match query.plane_hit(center, world_axis, pos) {
            Ok(hit) => {
                let dir = hit - center;
                if dir.length() < 1e-4 {
                    tracing::debug!("canvas-rotate press on the rotation axis, ignored");
                    return;
                }
                self.session = Some(EditSession {
                    canvas: id,
                    kind: SessionKind::RotateCanvas {
                        center,
                        axis: world_axis,
                        start_dir: dir.normalize(),
                    },
                    preview: None,
                });
            }
            Err(err) => tracing::debug!(%err, "canvas-rotate press ignored"),
        }
    }

    /// Start dragging a deep copy of the current canvas along its normal.
    /// The copy appears immediately as a preview.
    pub(super) fn clone_pressed(
        &mut self,
        scene: &mut SceneState,
        query: &CanvasQuery,
        pos: egui::Pos2,
    ) {
        let Some((id, frame)) = self.current_frame(scene) else {
            tracing::debug!("canvas-clone press with no current canvas");
            return;
        };
        let start = match query.normal_hit(&frame, pos) {
            Ok(start) => start,
            Err(err) => {
                tracing::debug!(%err, "canvas-clone press ignored");
                return;
            }
        };
        let Some(source) = scene.get_canvas(&id) else {
            return;
        };
        let template = helpers::clone_canvas(source, format!("{} (copy)", source.name));

        let preview = EditCommand::AddCanvas {
            canvas: template.clone(),
        };
        scene.apply_preview(&preview);
        self.session = Some(EditSession {
            canvas: id,
            kind: SessionKind::CloneCanvas {
                line_point: frame.center(),
                line_dir: frame.normal(),
                start,
                template,
            },
            preview: Some(preview),
        });
    }

    /// Start dragging the selected entities onto a new parallel canvas.
    /// The entities visibly leave the source as a preview.
    pub(super) fn separate_pressed(
        &mut self,
        scene: &mut SceneState,
        query: &CanvasQuery,
        pos: egui::Pos2,
    ) {
        let Some((id, frame)) = self.current_frame(scene) else {
            tracing::debug!("canvas-separate press with no current canvas");
            return;
        };
        if self.selection.canvas() != Some(&id) || self.selection.is_empty() {
            tracing::debug!("canvas-separate press with nothing selected");
            return;
        }
        let start = match query.normal_hit(&frame, pos) {
            Ok(start) => start,
            Err(err) => {
                tracing::debug!(%err, "canvas-separate press ignored");
                return;
            }
        };
        let Some(source) = scene.get_canvas(&id) else {
            return;
        };

        let refs = self.selection.entities().to_vec();
        let mut template = Canvas::new(
            uuid::Uuid::new_v4().to_string(),
            format!("{} (detached)", source.name),
        );
        template.frame = source.frame.clone();
        for r in &refs {
            match r.kind {
                EntityKind::Stroke => {
                    if let Some(stroke) = source.strokes.get(r.index) {
                        template.strokes.push(stroke.clone());
                    }
                }
                EntityKind::Photo => {
                    if let Some(photo) = source.photos.get(r.index) {
                        template.photos.push(photo.clone());
                    }
                }
            }
        }

        let preview = EditCommand::SeparateCanvas {
            source: id.clone(),
            refs: refs.clone(),
            canvas: template.clone(),
        };
        scene.apply_preview(&preview);
        self.session = Some(EditSession {
            canvas: id,
            kind: SessionKind::SeparateCanvas {
                line_point: frame.center(),
                line_dir: frame.normal(),
                start,
                refs,
                template,
            },
            preview: Some(preview),
        });
    }
}
