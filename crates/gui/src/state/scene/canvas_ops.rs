//! Canvas lifecycle operations: create, clone/ortho creation, removal, and
//! programmatic frame edits. Each operation commits one reversible command.

use glam::{Quat, Vec3};
use shared::{Canvas, CanvasId};
use std::f32::consts::FRAC_PI_2;

use crate::command::EditCommand;
use crate::frame::PlaneFrame;
use crate::helpers;

use super::SceneState;

/// Which in-plane axis an ortho canvas is folded about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrthoAxis {
    U,
    V,
}

impl SceneState {
    /// Create a canvas with an identity frame and return its id
    pub fn create_canvas(&mut self, name: impl Into<String>) -> CanvasId {
        let canvas = Canvas::new(uuid::Uuid::new_v4().to_string(), name.into());
        let id = canvas.id.clone();
        self.commit(EditCommand::AddCanvas { canvas });
        id
    }

    /// Create a copy of `source_id` with fresh ids, committed as one edit
    pub fn create_cloned_canvas(&mut self, source_id: &str) -> Option<CanvasId> {
        let source = self.get_canvas(source_id)?;
        let copy = helpers::clone_canvas(source, format!("{} (copy)", source.name));
        let id = copy.id.clone();
        self.commit(EditCommand::AddCanvas { canvas: copy });
        Some(id)
    }

    /// Create an empty canvas whose frame is the source frame folded 90
    /// degrees about its local U or V axis through the center.
    pub fn create_ortho_canvas(&mut self, source_id: &str, axis: OrthoAxis) -> Option<CanvasId> {
        let source = self.get_canvas(source_id)?;
        let mut frame = PlaneFrame::from_shared(&source.frame);
        let world_axis = match axis {
            OrthoAxis::U => frame.u_axis(),
            OrthoAxis::V => frame.v_axis(),
        };
        frame.rotate(Quat::from_axis_angle(world_axis, FRAC_PI_2), frame.center());

        let mut canvas = Canvas::new(
            uuid::Uuid::new_v4().to_string(),
            format!("{} (ortho)", source.name),
        );
        canvas.frame = frame.to_shared();
        let id = canvas.id.clone();
        self.commit(EditCommand::AddCanvas { canvas });
        Some(id)
    }

    /// Remove a canvas; reversible through the log
    pub fn remove_canvas(&mut self, id: &str) -> bool {
        let Some(canvas) = self.get_canvas(id).cloned() else {
            return false;
        };
        self.commit(EditCommand::RemoveCanvas { canvas })
    }

    /// Programmatically offset a canvas frame, as one committed edit
    pub fn translate_canvas(&mut self, id: &str, delta: Vec3) -> bool {
        self.commit(EditCommand::TranslateCanvas {
            id: id.to_string(),
            delta: delta.to_array(),
        })
    }

    /// Programmatically rotate a canvas about a world-space pivot.
    ///
    /// A pivot lying on the canvas plane away from its center first
    /// re-centers the owned entities onto the pivot, then rotates the frame
    /// about it, so the frame center keeps tracking the drawn content.
    pub fn rotate_canvas(&mut self, id: &str, rotation: Quat, pivot: Vec3) -> bool {
        let Some(canvas) = self.get_canvas(id) else {
            return false;
        };
        let frame = PlaneFrame::from_shared(&canvas.frame);
        let recenter = if (pivot - frame.center()).length() > 1e-5 {
            frame.to_local(pivot).ok()
        } else {
            None
        };
        self.commit(EditCommand::RotateCanvas {
            id: id.to_string(),
            rotation: helpers::quat_to_array(rotation),
            pivot: pivot.to_array(),
            recenter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_remove() {
        let mut s = SceneState::default();
        let id = s.create_canvas("Wall");
        assert_eq!(s.scene.canvases.len(), 1);
        assert!(s.remove_canvas(&id));
        assert!(s.scene.canvases.is_empty());
        assert_eq!(s.undo_depth(), 2);
    }

    #[test]
    fn test_ortho_canvas_frame_is_perpendicular() {
        let mut s = SceneState::default();
        let id = s.create_canvas("Base");
        let ortho = s.create_ortho_canvas(&id, OrthoAxis::U).unwrap();

        let base = PlaneFrame::from_shared(&s.get_canvas(&id).unwrap().frame);
        let folded = PlaneFrame::from_shared(&s.get_canvas(&ortho).unwrap().frame);
        assert!(base.normal().dot(folded.normal()).abs() < 1e-5);
        assert!((folded.center() - base.center()).length() < 1e-5);
    }

    #[test]
    fn test_clone_gets_fresh_ids() {
        let mut s = SceneState::default();
        let id = s.create_canvas("Base");
        let copy = s.create_cloned_canvas(&id).unwrap();
        assert_ne!(id, copy);
        assert_eq!(s.scene.canvases.len(), 2);
    }

    #[test]
    fn test_rotate_canvas_about_on_plane_pivot_recenters() {
        let mut s = SceneState::default();
        let id = s.create_canvas("Base");
        let pivot = Vec3::new(2.0, 0.0, 0.0);
        assert!(s.rotate_canvas(&id, Quat::from_axis_angle(Vec3::Y, 0.5), pivot));
        let frame = PlaneFrame::from_shared(&s.get_canvas(&id).unwrap().frame);
        assert!((frame.center() - pivot).length() < 1e-5);
        // Undo restores the original placement.
        assert!(s.undo());
        let frame = PlaneFrame::from_shared(&s.get_canvas(&id).unwrap().frame);
        assert!(frame.center().length() < 1e-5);
    }
}
