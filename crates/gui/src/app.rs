//! eframe application shell: mode toolbar, canvas operations, and the
//! viewport panel that feeds pointer events into the interaction controller.

use easel_gui_lib::interact::{PointerEvent, RotateAxis, ToolMode};
use easel_gui_lib::state::scene::SceneState;
use easel_gui_lib::state::{AppState, OrthoAxis};
use easel_gui_lib::viewport::camera::ArcBallCamera;
use easel_gui_lib::viewport::query::CanvasQuery;
use shared::SceneDescription;

use crate::render;

pub struct EaselApp {
    state: AppState,
    camera: ArcBallCamera,
}

impl EaselApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, initial: Option<SceneDescription>) -> Self {
        let mut state = AppState::new();
        if let Some(scene) = initial {
            state.scene.set_scene(scene);
        } else if let Some(scene) = SceneState::load_autosave() {
            state.scene.set_scene(scene);
        }
        Self {
            state,
            camera: ArcBallCamera::new(),
        }
    }

    fn mode_button(&mut self, ui: &mut egui::Ui, label: &str, mode: ToolMode) {
        let active = self.state.interact.mode() == mode;
        if ui.selectable_label(active, label).clicked() {
            let AppState {
                scene, interact, ..
            } = &mut self.state;
            interact.set_mode(scene, mode);
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            self.mode_button(ui, "Select", ToolMode::Select);
            self.mode_button(ui, "Sketch", ToolMode::Sketch);
            self.mode_button(ui, "Canvas", ToolMode::CanvasSelect);
            ui.separator();
            self.mode_button(ui, "Offset", ToolMode::CanvasOffset);
            self.mode_button(ui, "Rotate +U", ToolMode::CanvasRotate(RotateAxis::PlusU));
            self.mode_button(ui, "Rotate -U", ToolMode::CanvasRotate(RotateAxis::MinusU));
            self.mode_button(ui, "Rotate +V", ToolMode::CanvasRotate(RotateAxis::PlusV));
            self.mode_button(ui, "Rotate -V", ToolMode::CanvasRotate(RotateAxis::MinusV));
            self.mode_button(ui, "Clone", ToolMode::CanvasClone);
            self.mode_button(ui, "Separate", ToolMode::CanvasSeparate);
            ui.separator();
            self.mode_button(ui, "Move", ToolMode::EntityMove);
            self.mode_button(ui, "Scale", ToolMode::EntityScale);
            self.mode_button(ui, "Spin", ToolMode::EntityRotate);
            ui.separator();
            self.mode_button(ui, "Calib Pt", ToolMode::CalibratePoint);
            self.mode_button(ui, "Calib Wire", ToolMode::CalibrateWire);
            ui.separator();

            let AppState {
                scene, interact, ..
            } = &mut self.state;

            if ui.button("New Canvas").clicked() {
                interact.interrupt(scene);
                let id = scene.create_canvas(format!("Canvas {}", scene.scene.canvases.len() + 1));
                interact.set_current_canvas(Some(id));
            }
            let current = interact.current_canvas().cloned();
            if ui.button("Ortho U").clicked() {
                if let Some(id) = &current {
                    interact.interrupt(scene);
                    scene.create_ortho_canvas(id, OrthoAxis::U);
                }
            }
            if ui.button("Ortho V").clicked() {
                if let Some(id) = &current {
                    interact.interrupt(scene);
                    scene.create_ortho_canvas(id, OrthoAxis::V);
                }
            }
            if ui.button("Delete").clicked() {
                if let Some(id) = &current {
                    interact.interrupt(scene);
                    if scene.remove_canvas(id) {
                        interact.set_current_canvas(None);
                    }
                }
            }
            ui.separator();

            if ui
                .add_enabled(scene.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                interact.interrupt(scene);
                scene.undo();
            }
            if ui
                .add_enabled(scene.can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                interact.interrupt(scene);
                scene.redo();
            }
            ui.separator();

            if ui.button("Open").clicked() {
                interact.interrupt(scene);
                open_scene(scene);
                interact.set_current_canvas(None);
            }
            if ui.button("Save").clicked() {
                save_scene(scene);
            }
        });
    }

    fn viewport(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        // ── Camera controls ───────────────────────────────────
        if response.dragged_by(egui::PointerButton::Secondary) {
            let d = response.drag_delta();
            self.camera.rotate(d.x * 0.5, d.y * 0.5);
        }
        if response.dragged_by(egui::PointerButton::Middle) {
            let d = response.drag_delta();
            self.camera.pan(-d.x, d.y);
        }
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll.abs() > 0.1 {
            self.camera.zoom(scroll * 0.01);
        }

        // ── Pointer events into the state machine ─────────────
        let AppState {
            scene,
            interact,
            settings,
        } = &mut self.state;
        let query = CanvasQuery::new(&self.camera, rect);

        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            interact.handle_event(scene, settings, &query, PointerEvent::Aborted);
        }

        let pointer_pos = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.latest_pos()));

        if response.clicked() {
            if let Some(pos) = pointer_pos {
                interact.handle_event(scene, settings, &query, PointerEvent::Pressed(pos));
                interact.handle_event(scene, settings, &query, PointerEvent::Released(pos));
            }
        } else {
            if response.drag_started_by(egui::PointerButton::Primary) {
                if let Some(pos) = pointer_pos {
                    interact.handle_event(scene, settings, &query, PointerEvent::Pressed(pos));
                }
            } else if response.dragged_by(egui::PointerButton::Primary) {
                if let Some(pos) = pointer_pos {
                    interact.handle_event(scene, settings, &query, PointerEvent::Dragged(pos));
                }
            }
            if response.drag_stopped_by(egui::PointerButton::Primary) {
                if let Some(pos) = pointer_pos {
                    interact.handle_event(scene, settings, &query, PointerEvent::Released(pos));
                }
            }
        }
        if let Some(pos) = response.hover_pos() {
            interact.handle_event(scene, settings, &query, PointerEvent::Moved(pos));
        }

        // ── Painting ──────────────────────────────────────────
        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            render::draw_scene(&painter, &self.camera, rect, scene, interact, settings);
        }
    }
}

impl eframe::App for EaselApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.viewport(ui));
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.state.scene.autosave();
        self.state.settings.save();
    }
}

fn open_scene(scene: &mut SceneState) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("JSON", &["json"])
        .pick_file()
    else {
        return;
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => match serde_json::from_str::<SceneDescription>(&json) {
            Ok(loaded) => scene.set_scene(loaded),
            Err(e) => tracing::error!("Failed to parse scene {}: {e}", path.display()),
        },
        Err(e) => tracing::error!("Failed to read scene {}: {e}", path.display()),
    }
}

fn save_scene(scene: &SceneState) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("JSON", &["json"])
        .save_file()
    else {
        return;
    };
    match serde_json::to_string_pretty(&scene.scene) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&path, json) {
                tracing::error!("Failed to write scene {}: {e}", path.display());
            }
        }
        Err(e) => tracing::error!("Failed to serialize scene: {e}"),
    }
}
