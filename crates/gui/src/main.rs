mod app;
mod render;

use app::EaselApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "easel_gui=info".into()),
        )
        .init();

    // Parse --scene <path> argument
    let initial_scene = parse_scene_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Easel3D - sketch on planes in space")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "easel-gui",
        native_options,
        Box::new(move |cc| Ok(Box::new(EaselApp::new(cc, initial_scene)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_scene_arg() -> Option<shared::SceneDescription> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--scene" && i + 1 < args.len() {
            let path = &args[i + 1];
            match std::fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<shared::SceneDescription>(&json) {
                    Ok(scene) => {
                        tracing::info!(
                            "Loaded scene from {path} ({} canvases)",
                            scene.canvases.len()
                        );
                        return Some(scene);
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse scene JSON from {path}: {e}");
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to read scene file {path}: {e}");
                }
            }
            break;
        }
        i += 1;
    }
    None
}
