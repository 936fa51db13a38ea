//! Scene state management
//!
//! Owns the canvas graph, the command log it commits to, and a version
//! counter for cache invalidation.

mod canvas_ops;
mod history;
mod persistence;

pub use canvas_ops::OrthoAxis;

use shared::{Canvas, SceneDescription};

use crate::command::{CommandLog, EditCommand};

/// Scene state: the canvas graph plus its undo log
#[derive(Default)]
pub struct SceneState {
    /// Current scene with canvases
    pub scene: SceneDescription,
    /// Committed-gesture log
    pub(crate) log: CommandLog,
    /// Monotonically increasing version counter for cache invalidation
    pub(crate) version: u64,
}

impl SceneState {
    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get_canvas(&self, id: &str) -> Option<&Canvas> {
        self.scene.get_canvas(id)
    }

    pub fn get_canvas_mut(&mut self, id: &str) -> Option<&mut Canvas> {
        self.version += 1;
        self.scene.get_canvas_mut(id)
    }

    /// Number of committed entries available for undo
    pub fn undo_depth(&self) -> usize {
        self.log.len()
    }

    /// Apply a command and record it as one committed gesture
    pub fn commit(&mut self, cmd: EditCommand) -> bool {
        if cmd.apply(&mut self.scene) {
            self.log.push(cmd);
            self.version += 1;
            true
        } else {
            tracing::warn!(?cmd, "commit target vanished, dropping command");
            false
        }
    }

    /// Apply a command as a visual preview only; the log is not touched
    pub fn apply_preview(&mut self, cmd: &EditCommand) -> bool {
        let ok = cmd.apply(&mut self.scene);
        if ok {
            self.version += 1;
        }
        ok
    }

    /// Reverse a previously applied preview
    pub fn revert_preview(&mut self, cmd: &EditCommand) {
        if !cmd.revert(&mut self.scene) {
            tracing::warn!(?cmd, "preview target vanished during revert");
        }
        self.version += 1;
    }

    /// Replace the whole scene (load), dropping history
    pub fn set_scene(&mut self, scene: SceneDescription) {
        self.scene = scene;
        self.log = CommandLog::default();
        self.version += 1;
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.set_scene(SceneDescription::default());
    }
}
