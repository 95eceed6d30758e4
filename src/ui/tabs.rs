use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::render::format_sci;
use crate::state::AppState;

/// URI under which egui's file loader caches an image.
pub fn chart_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

// ---------------------------------------------------------------------------
// Tab strip
// ---------------------------------------------------------------------------

/// One selectable label per open file, each with a close button.
pub fn tab_strip(ui: &mut Ui, state: &mut AppState) {
    let mut select = None;
    let mut close = None;

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            for (i, tab) in state.tabs.iter().enumerate() {
                let selected = state.active == Some(i);
                let text = RichText::new(&tab.title).color(tab.color.to_egui());
                if ui
                    .selectable_label(selected, text)
                    .on_hover_text(tab.source.display().to_string())
                    .clicked()
                {
                    select = Some(i);
                }
                if ui.small_button("×").on_hover_text("Close").clicked() {
                    close = Some(i);
                }
                ui.separator();
            }
        });
    });

    if let Some(i) = select {
        state.active = Some(i);
    }
    if let Some(i) = close {
        state.close_tab(i);
    }
}

// ---------------------------------------------------------------------------
// Chart view (central panel)
// ---------------------------------------------------------------------------

/// Show the selected tab's charts and the last peak summary.
pub fn chart_view(ui: &mut Ui, state: &AppState) {
    let tab = match state.active_tab() {
        Some(tab) => tab,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to plot it  (File → Open…)");
            });
            return;
        }
    };

    ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(summary) = &tab.summary {
                let unit = &state.renderer.style().y_unit;
                ui.horizontal(|ui: &mut Ui| {
                    match summary.average {
                        Some(avg) => ui.strong(format!("Peak average: {} {unit}", format_sci(avg, 3))),
                        None => ui.label("No peak average"),
                    };
                    ui.label(format!(
                        "{} rows with Y > {} and X > {:.2}",
                        summary.peak_rows,
                        format_sci(summary.config.y_threshold, 3),
                        summary.config.x_threshold
                    ));
                });
                ui.separator();
            }

            ui.vertical_centered(|ui: &mut Ui| {
                ui.add(egui::Image::new(chart_uri(&tab.chart)).fit_to_original_size(1.0));
                if let Some(peak) = &tab.peak_chart {
                    ui.add_space(8.0);
                    ui.label(RichText::new("Peak rows").color(Color32::GRAY));
                    ui.add(egui::Image::new(chart_uri(peak)).fit_to_original_size(1.0));
                }
            });
        });
}
