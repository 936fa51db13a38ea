//! Scene autosave between sessions.
//!
//! The scene is mirrored to a JSON file in the platform data directory from
//! the shell's save callback and offered back on the next launch. Autosave
//! must never interrupt editing; failures are logged and swallowed.

use std::path::PathBuf;

use shared::SceneDescription;

use super::SceneState;

fn autosave_file() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "easel", "easel")?;
    Some(dirs.data_dir().join("autosave.json"))
}

impl SceneState {
    /// Mirror the current scene to the autosave file
    pub fn autosave(&self) {
        let Some(path) = autosave_file() else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("could not create autosave directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(&self.scene) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("autosave write failed: {e}");
                }
            }
            Err(e) => tracing::warn!("autosave serialization failed: {e}"),
        }
    }

    /// Scene saved by the previous session, if one parses
    pub fn load_autosave() -> Option<SceneDescription> {
        let json = std::fs::read_to_string(autosave_file()?).ok()?;
        match serde_json::from_str(&json) {
            Ok(scene) => Some(scene),
            Err(e) => {
                tracing::warn!("ignoring unreadable autosave: {e}");
                None
            }
        }
    }
}
