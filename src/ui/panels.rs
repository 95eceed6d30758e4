use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(state.active_tab().is_some(), egui::Button::new("Peak average…"))
                .clicked()
            {
                state.open_peak_dialog();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Close").clicked() {
                state.close_active_tab();
                ui.close_menu();
            }
            if ui.button("Close all").clicked() {
                state.close_all_tabs();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(tab) = state.active_tab() {
            ui.label(format!(
                "{}: {} rows ({} vs {})",
                tab.title,
                tab.dataset.len(),
                tab.dataset.y_label(),
                tab.dataset.x_label()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open measurement data")
        .set_directory(&state.settings.default_open_dir)
        .add_filter("Data files", &["xlsx", "csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(&path);
    }
}
