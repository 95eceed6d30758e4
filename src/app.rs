use std::collections::HashSet;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, peak_dialog, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SilanePeakApp {
    pub state: AppState,
    /// Image URIs shown last frame; dropped from egui's cache once unused.
    shown_uris: HashSet<String>,
}

impl SilanePeakApp {
    pub fn new(mut state: AppState) -> Self {
        state.open_default_file();
        Self {
            state,
            shown_uris: HashSet::new(),
        }
    }

    /// Release textures of charts no tab shows any more.
    fn forget_stale_images(&mut self, ctx: &egui::Context) {
        let current: HashSet<String> = self
            .state
            .tabs
            .iter()
            .flat_map(|t| std::iter::once(&t.chart).chain(t.peak_chart.as_ref()))
            .map(|p| tabs::chart_uri(p))
            .collect();
        for stale in self.shown_uris.difference(&current) {
            ctx.forget_image(stale);
        }
        self.shown_uris = current;
    }
}

impl eframe::App for SilanePeakApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tab strip ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
            ui.separator();
            tabs::tab_strip(ui, &mut self.state);
        });

        // ---- Central panel: charts of the selected tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            tabs::chart_view(ui, &self.state);
        });

        peak_dialog::peak_dialog(ctx, &mut self.state);

        self.forget_stale_images(ctx);

        if ctx.input(|i| i.viewport().close_requested()) {
            log::info!("Closing; saving settings");
            if let Err(e) = self.state.settings.save() {
                log::error!("Failed to save settings: {e:#}");
            }
        }
    }
}
