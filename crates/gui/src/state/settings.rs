//! Application settings

use serde::{Deserialize, Serialize};

/// Sketching behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokeSettings {
    /// Strokes with a shorter accumulated path are treated as accidental
    /// clicks and discarded without being committed
    pub min_length: f64,
    /// Display width of new strokes in pixels
    pub width: f64,
}

impl Default for StrokeSettings {
    fn default() -> Self {
        Self {
            min_length: 0.15,
            width: 2.0,
        }
    }
}

/// Pick tolerances, in canvas units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickSettings {
    /// Maximum distance from an entity for it to be selectable
    pub entity_tolerance: f64,
    /// Maximum distance from a calibration point or wire to grab it
    pub calibration_tolerance: f64,
    /// Half-extent of the pickable square of an empty canvas
    pub canvas_half_extent: f64,
    /// Margin grown around a canvas's content bounds
    pub canvas_margin: f64,
}

impl Default for PickSettings {
    fn default() -> Self {
        Self {
            entity_tolerance: 0.35,
            calibration_tolerance: 0.5,
            canvas_half_extent: 4.0,
            canvas_margin: 1.0,
        }
    }
}

/// Viewport display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Canvas outline color RGB
    pub canvas_color: [u8; 3],
    /// Outline color of the current canvas
    pub current_canvas_color: [u8; 3],
    /// Selection highlight color RGB
    pub selection_color: [u8; 3],
    /// Stroke color RGB
    pub stroke_color: [u8; 3],
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [30, 30, 35],
            canvas_color: [110, 110, 125],
            current_canvas_color: [235, 180, 60],
            selection_color: [0, 220, 255],
            stroke_color: [225, 225, 230],
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    pub stroke: StrokeSettings,
    pub pick: PickSettings,
    pub viewport: ViewportSettings,
}

impl AppSettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "easel", "easel") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    return settings;
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "easel", "easel") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    let _ = std::fs::write(config_path, json);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_json_round_trip() {
        let s = AppSettings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stroke.min_length, s.stroke.min_length);
        assert_eq!(back.pick.entity_tolerance, s.pick.entity_tolerance);
    }
}
