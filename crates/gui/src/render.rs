//! Minimal egui painter for the viewport: canvas outlines, strokes,
//! selection bounds, calibration markers and the in-progress sketch
//! preview. Deliberately thin; stroke shading and texturing stay out.

use easel_gui_lib::frame::PlaneFrame;
use easel_gui_lib::helpers;
use easel_gui_lib::interact::{InteractionController, SessionKind};
use easel_gui_lib::state::scene::SceneState;
use easel_gui_lib::state::settings::AppSettings;
use easel_gui_lib::viewport::camera::ArcBallCamera;
use easel_gui_lib::viewport::intersect::{self, PlaneRelation};
use shared::{Canvas, Point2D};

pub fn draw_scene(
    painter: &egui::Painter,
    camera: &ArcBallCamera,
    rect: egui::Rect,
    scene: &SceneState,
    interact: &InteractionController,
    settings: &AppSettings,
) {
    let vp = &settings.viewport;
    painter.rect_filled(rect, 0.0, rgb(vp.background_color));

    for canvas in scene.scene.canvases.iter().filter(|c| c.visible) {
        let frame = PlaneFrame::from_shared(&canvas.frame);
        let is_current = interact.current_canvas() == Some(&canvas.id);

        draw_canvas_outline(painter, camera, rect, canvas, &frame, settings, is_current);
        draw_strokes(painter, camera, rect, canvas, &frame, settings, interact);
        draw_calibration(painter, camera, rect, canvas, &frame, vp.selection_color);
        if is_current {
            draw_selection_bounds(painter, camera, rect, canvas, &frame, interact, settings);
        }
    }

    draw_intersection_guides(painter, camera, rect, scene, interact, settings);
    draw_sketch_preview(painter, camera, rect, scene, interact, settings);
}

/// Guide lines where the current canvas's plane crosses the other visible
/// canvases, for lining strokes up across planes.
fn draw_intersection_guides(
    painter: &egui::Painter,
    camera: &ArcBallCamera,
    rect: egui::Rect,
    scene: &SceneState,
    interact: &InteractionController,
    settings: &AppSettings,
) {
    let Some(current_id) = interact.current_canvas() else {
        return;
    };
    let Some(current) = scene.get_canvas(current_id) else {
        return;
    };
    let cf = PlaneFrame::from_shared(&current.frame);

    for other in scene
        .scene
        .canvases
        .iter()
        .filter(|c| c.visible && &c.id != current_id)
    {
        let of = PlaneFrame::from_shared(&other.frame);
        let Ok(PlaneRelation::Line { point, direction }) =
            intersect::plane_plane(cf.normal(), cf.center(), of.normal(), of.center())
        else {
            continue;
        };
        // Draw the stretch of the line nearest the current canvas center.
        let anchor = point + direction * (cf.center() - point).dot(direction);
        let half = settings.pick.canvas_half_extent as f32;
        let a = camera.project(anchor - direction * half, rect);
        let b = camera.project(anchor + direction * half, rect);
        if let (Some(a), Some(b)) = (a, b) {
            painter.line_segment(
                [a, b],
                egui::Stroke::new(1.0, rgb(settings.viewport.canvas_color)),
            );
        }
    }
}

fn draw_canvas_outline(
    painter: &egui::Painter,
    camera: &ArcBallCamera,
    rect: egui::Rect,
    canvas: &Canvas,
    frame: &PlaneFrame,
    settings: &AppSettings,
    is_current: bool,
) {
    let (min, max) = helpers::canvas_extent(
        canvas,
        settings.pick.canvas_half_extent,
        settings.pick.canvas_margin,
    );
    let corners = [
        [min[0], min[1]],
        [max[0], min[1]],
        [max[0], max[1]],
        [min[0], max[1]],
    ];
    let color = if is_current {
        rgb(settings.viewport.current_canvas_color)
    } else {
        rgb(settings.viewport.canvas_color)
    };
    if let Some(points) = project_loop(camera, rect, frame, &corners) {
        painter.add(egui::Shape::closed_line(
            points,
            egui::Stroke::new(1.5, color),
        ));
    }
}

fn draw_strokes(
    painter: &egui::Painter,
    camera: &ArcBallCamera,
    rect: egui::Rect,
    canvas: &Canvas,
    frame: &PlaneFrame,
    settings: &AppSettings,
    interact: &InteractionController,
) {
    for (i, stroke) in canvas.strokes.iter().enumerate() {
        let selected = interact.selection.canvas() == Some(&canvas.id)
            && interact
                .selection
                .is_selected(shared::EntityRef::stroke(i));
        let color = if selected {
            rgb(settings.viewport.selection_color)
        } else {
            rgb(settings.viewport.stroke_color)
        };
        if let Some(points) = project_polyline(camera, rect, frame, &stroke.points) {
            painter.add(egui::Shape::line(
                points,
                egui::Stroke::new(stroke.width as f32, color),
            ));
        }
    }

    for (i, photo) in canvas.photos.iter().enumerate() {
        let selected = interact.selection.canvas() == Some(&canvas.id)
            && interact.selection.is_selected(shared::EntityRef::photo(i));
        let color = if selected {
            rgb(settings.viewport.selection_color)
        } else {
            rgb(settings.viewport.canvas_color)
        };
        let corners = helpers::photo_corners(photo).map(|p| [p.x, p.y]);
        if let Some(points) = project_loop(camera, rect, frame, &corners) {
            painter.add(egui::Shape::closed_line(
                points,
                egui::Stroke::new(1.0, color),
            ));
        }
    }
}

fn draw_selection_bounds(
    painter: &egui::Painter,
    camera: &ArcBallCamera,
    rect: egui::Rect,
    canvas: &Canvas,
    frame: &PlaneFrame,
    interact: &InteractionController,
    settings: &AppSettings,
) {
    if interact.selection.canvas() != Some(&canvas.id) {
        return;
    }
    let Some((min, max)) = interact.selection.bounds() else {
        return;
    };
    let corners = [
        [min[0], min[1]],
        [max[0], min[1]],
        [max[0], max[1]],
        [min[0], max[1]],
    ];
    if let Some(points) = project_loop(camera, rect, frame, &corners) {
        painter.add(egui::Shape::closed_line(
            points,
            egui::Stroke::new(1.0, rgb(settings.viewport.selection_color)),
        ));
    }
}

fn draw_calibration(
    painter: &egui::Painter,
    camera: &ArcBallCamera,
    rect: egui::Rect,
    canvas: &Canvas,
    frame: &PlaneFrame,
    color: [u8; 3],
) {
    let Some(rig) = canvas.calibration.as_ref() else {
        return;
    };
    for wire in &rig.wires {
        let (Some(a), Some(b)) = (rig.points.get(wire[0]), rig.points.get(wire[1])) else {
            continue;
        };
        let pa = camera.project(frame.to_global([a.x, a.y]), rect);
        let pb = camera.project(frame.to_global([b.x, b.y]), rect);
        if let (Some(pa), Some(pb)) = (pa, pb) {
            painter.line_segment([pa, pb], egui::Stroke::new(1.0, rgb(color)));
        }
    }
    for p in &rig.points {
        if let Some(pos) = camera.project(frame.to_global([p.x, p.y]), rect) {
            painter.circle_filled(pos, 4.0, rgb(color));
        }
    }
}

fn draw_sketch_preview(
    painter: &egui::Painter,
    camera: &ArcBallCamera,
    rect: egui::Rect,
    scene: &SceneState,
    interact: &InteractionController,
    settings: &AppSettings,
) {
    let Some(session) = interact.session() else {
        return;
    };
    let SessionKind::Stroke { points } = &session.kind else {
        return;
    };
    let Some(canvas) = scene.get_canvas(&session.canvas) else {
        return;
    };
    let frame = PlaneFrame::from_shared(&canvas.frame);
    if let Some(points) = project_polyline(camera, rect, &frame, points) {
        painter.add(egui::Shape::line(
            points,
            egui::Stroke::new(
                settings.stroke.width as f32,
                rgb(settings.viewport.selection_color),
            ),
        ));
    }
}

fn rgb(c: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(c[0], c[1], c[2])
}

fn project_polyline(
    camera: &ArcBallCamera,
    rect: egui::Rect,
    frame: &PlaneFrame,
    points: &[Point2D],
) -> Option<Vec<egui::Pos2>> {
    points
        .iter()
        .map(|p| camera.project(frame.to_global([p.x, p.y]), rect))
        .collect()
}

fn project_loop(
    camera: &ArcBallCamera,
    rect: egui::Rect,
    frame: &PlaneFrame,
    corners: &[[f64; 2]],
) -> Option<Vec<egui::Pos2>> {
    corners
        .iter()
        .map(|&uv| camera.project(frame.to_global(uv), rect))
        .collect()
}
