use anyhow::Result;
use clap::Parser;
use eframe::egui;

use petro_viewer::app::PetroViewerApp;
use petro_viewer::cli::Args;
use petro_viewer::config::ViewerConfig;
use petro_viewer::state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ViewerConfig::load(args.config.as_deref())?;
    let mut state = AppState::new(config);
    if let Some(path) = &args.file {
        state.open_path(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Petrophysical Data Viewer",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render png/jpg bytes.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(PetroViewerApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with error: {e}"))
}
