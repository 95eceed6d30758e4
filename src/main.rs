mod app;
mod color;
mod data;
mod error;
mod peak;
mod render;
mod settings;
mod state;
mod ui;

use anyhow::Context;
use app::SilanePeakApp;
use eframe::egui;

use crate::render::ChartRenderer;
use crate::settings::Settings;
use crate::state::AppState;

/// Create the chart folder; the app cannot do anything useful without it.
fn prepare_output_dir() -> anyhow::Result<ChartRenderer> {
    let dir = settings::default_output_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    Ok(ChartRenderer::new(dir))
}

fn main() -> eframe::Result {
    env_logger::init();

    let renderer = match prepare_output_dir() {
        Ok(renderer) => renderer,
        Err(e) => {
            log::error!("{e:#}");
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("Startup error")
                .set_description(format!("{e:#}"))
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
            std::process::exit(1);
        }
    };
    log::info!("Charts are written to {}", renderer.output_dir().display());

    let settings = Settings::load(settings::default_settings_path(), settings::documents_dir());
    let state = AppState::new(settings, renderer);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Silane Peak – Current Analysis",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can show the rendered PNGs.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(SilanePeakApp::new(state)))
        }),
    )
}
