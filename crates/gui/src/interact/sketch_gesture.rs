//! Sketch mode: accumulate a freeform point sequence and commit it as one
//! stroke. The in-progress polyline lives only in the session; nothing
//! touches the scene until release.

use shared::{Point2D, Stroke};

use crate::command::EditCommand;
use crate::helpers;
use crate::state::scene::SceneState;
use crate::state::settings::AppSettings;
use crate::viewport::query::CanvasQuery;

use super::session::{EditSession, SessionKind};
use super::InteractionController;

impl InteractionController {
    /// Start a new point sequence at the press position
    pub(super) fn sketch_pressed(
        &mut self,
        scene: &mut SceneState,
        query: &CanvasQuery,
        pos: egui::Pos2,
    ) {
        let Some((id, frame)) = self.current_frame(scene) else {
            tracing::debug!("sketch press with no current canvas");
            return;
        };
        match query.local_hit(&frame, pos) {
            Ok(uv) => {
                self.session = Some(EditSession {
                    canvas: id,
                    kind: SessionKind::Stroke {
                        points: vec![Point2D::new(uv[0], uv[1])],
                    },
                    preview: None,
                });
            }
            Err(err) => tracing::debug!(%err, "sketch press ignored"),
        }
    }

    /// Commit the accumulated sequence as one stroke, or discard it when it
    /// is shorter than the configured minimum (an accidental click, not an
    /// error).
    pub(super) fn finish_stroke(&mut self, scene: &mut SceneState, settings: &AppSettings) {
        let Some(session) = self.session.take() else {
            return;
        };
        let SessionKind::Stroke { points } = session.kind else {
            return;
        };
        if helpers::path_length(&points) < settings.stroke.min_length {
            tracing::debug!("stroke below minimum length, discarded");
            return;
        }
        scene.commit(EditCommand::AddStroke {
            canvas: session.canvas,
            stroke: Stroke {
                id: uuid::Uuid::new_v4().to_string(),
                points,
                width: settings.stroke.width,
            },
        });
    }
}
