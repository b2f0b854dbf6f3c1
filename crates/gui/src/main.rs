mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::geometry`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use maker3d_gui_lib::{export, geometry, i18n, state};

use app::Maker3dApp;
use shared::ShapeObject;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maker3d=info,maker3d_gui_lib=info".into()),
        )
        .init();

    // Parse --scene <path> argument
    let initial_shapes = parse_scene_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Maker3D Studio")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 560.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "maker3d",
        native_options,
        Box::new(move |cc| Ok(Box::new(Maker3dApp::new(cc, initial_shapes)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

/// Shapes from `--scene <path>`, a JSON array in the document format
fn parse_scene_arg() -> Option<Vec<ShapeObject>> {
    let args: Vec<String> = std::env::args().collect();
    let index = args.iter().position(|a| a == "--scene")?;
    let Some(path) = args.get(index + 1) else {
        tracing::error!("--scene needs a file path");
        return None;
    };
    match std::fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str::<Vec<ShapeObject>>(&json) {
            Ok(shapes) => {
                tracing::info!("Loaded scene from {path} ({} shapes)", shapes.len());
                Some(shapes)
            }
            Err(e) => {
                tracing::error!("Failed to parse scene JSON from {path}: {e}");
                None
            }
        },
        Err(e) => {
            tracing::error!("Failed to read scene file {path}: {e}");
            None
        }
    }
}
