use serde::{Deserialize, Serialize};

/// Unique identifier of an object in the scene
pub type ObjectId = String;

/// Unique identifier of a canvas
pub type CanvasId = String;

/// 2D point in a canvas's local plane coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Rigid placement of a canvas plane in world space.
///
/// `rotation` is a unit quaternion (x, y, z, w); `translation` is the world
/// position of the canvas center. The local plane normal is the local +Z axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameTransform {
    pub rotation: [f64; 4],
    pub translation: [f64; 3],
}

impl FrameTransform {
    /// Identity placement: plane z = 0 centered at the origin
    pub fn identity() -> Self {
        Self {
            rotation: [0.0, 0.0, 0.0, 1.0],
            translation: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for FrameTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// A freeform polyline drawn on a canvas, in canvas-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: ObjectId,
    pub points: Vec<Point2D>,
    /// Display width in screen pixels
    pub width: f64,
}

impl Stroke {
    /// Total polyline length in canvas units
    pub fn path_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }
}

/// A photograph placed on a canvas: an oriented rectangle in local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: ObjectId,
    pub center: Point2D,
    pub width: f64,
    pub height: f64,
    /// Counter-clockwise rotation in radians within the canvas plane
    pub rotation: f64,
}

/// Single-view-metrology calibration overlay: control points plus the wires
/// (point-index pairs) strung between them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationRig {
    pub points: Vec<Point2D>,
    pub wires: Vec<[usize; 2]>,
}

/// Kind tag for 2D entities owned by a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Stroke,
    Photo,
}

/// Typed reference to an entity within one canvas: kind tag + index into the
/// canvas's per-kind list. Avoids downcasting through a scene hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub index: usize,
}

impl EntityRef {
    pub fn stroke(index: usize) -> Self {
        Self {
            kind: EntityKind::Stroke,
            index,
        }
    }

    pub fn photo(index: usize) -> Self {
        Self {
            kind: EntityKind::Photo,
            index,
        }
    }
}

/// A virtual drawing plane positioned in 3D space, owning 2D entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub id: CanvasId,
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub frame: FrameTransform,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<CalibrationRig>,
}

fn default_visible() -> bool {
    true
}

impl Canvas {
    pub fn new(id: CanvasId, name: String) -> Self {
        Self {
            id,
            name,
            visible: true,
            frame: FrameTransform::identity(),
            strokes: Vec::new(),
            photos: Vec::new(),
            calibration: None,
        }
    }

    /// References to every owned entity, strokes first
    pub fn entity_refs(&self) -> Vec<EntityRef> {
        let mut refs: Vec<EntityRef> = (0..self.strokes.len()).map(EntityRef::stroke).collect();
        refs.extend((0..self.photos.len()).map(EntityRef::photo));
        refs
    }
}

/// The whole scene: a flat list of canvases
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    pub canvases: Vec<Canvas>,
}

impl SceneDescription {
    pub fn get_canvas(&self, id: &str) -> Option<&Canvas> {
        self.canvases.iter().find(|c| c.id == id)
    }

    pub fn get_canvas_mut(&mut self, id: &str) -> Option<&mut Canvas> {
        self.canvases.iter_mut().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_frame_is_identity() {
        let f = FrameTransform::default();
        assert_eq!(f.rotation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(f.translation, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_path_length() {
        let s = Stroke {
            id: "s1".into(),
            points: vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(3.0, 0.0),
                Point2D::new(3.0, 4.0),
            ],
            width: 2.0,
        };
        assert!((s.path_length() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_entity_refs_cover_both_kinds() {
        let mut c = Canvas::new("c1".into(), "Canvas".into());
        c.strokes.push(Stroke {
            id: "s1".into(),
            points: vec![],
            width: 2.0,
        });
        c.photos.push(Photo {
            id: "p1".into(),
            center: Point2D::new(0.0, 0.0),
            width: 1.0,
            height: 1.0,
            rotation: 0.0,
        });
        let refs = c.entity_refs();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0], EntityRef::stroke(0));
        assert_eq!(refs[1], EntityRef::photo(0));
    }

    #[test]
    fn test_scene_json_round_trip() {
        let mut scene = SceneDescription::default();
        let mut c = Canvas::new("c1".into(), "Front wall".into());
        c.strokes.push(Stroke {
            id: "s1".into(),
            points: vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 2.0)],
            width: 2.0,
        });
        c.calibration = Some(CalibrationRig {
            points: vec![Point2D::new(-1.0, 0.0), Point2D::new(1.0, 0.0)],
            wires: vec![[0, 1]],
        });
        scene.canvases.push(c);

        let json = serde_json::to_string(&scene).unwrap();
        let back: SceneDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scene);
    }

    #[test]
    fn test_canvas_missing_fields_default() {
        let json = r#"{"id": "c1", "name": "Bare", "frame": {"rotation": [0.0, 0.0, 0.0, 1.0], "translation": [0.0, 0.0, 0.0]}}"#;
        let c: Canvas = serde_json::from_str(json).unwrap();
        assert!(c.visible);
        assert!(c.strokes.is_empty());
        assert!(c.calibration.is_none());
    }
}
