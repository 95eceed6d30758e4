use eframe::egui::{self, Color32, RichText, TextEdit, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Threshold dialog
// ---------------------------------------------------------------------------

/// Show the threshold window while `state.peak_dialog` is set.
pub fn peak_dialog(ctx: &egui::Context, state: &mut AppState) {
    let mut submit = false;
    let mut cancel = false;

    let Some(dialog) = state.peak_dialog.as_mut() else {
        return;
    };

    egui::Window::new("Peak average settings")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            egui::Grid::new("peak_dialog_grid")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("Y threshold ( > ):");
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("(");
                        ui.add(
                            TextEdit::singleline(&mut dialog.input.mantissa)
                                .hint_text("2.5")
                                .desired_width(70.0),
                        );
                        ui.label(") × 10 ^ (");
                        ui.add(
                            TextEdit::singleline(&mut dialog.input.exponent)
                                .hint_text("-6")
                                .desired_width(50.0),
                        );
                        ui.label(")");
                    });
                    ui.end_row();

                    ui.label("X threshold ( > ):");
                    ui.horizontal(|ui: &mut Ui| {
                        ui.add(
                            TextEdit::singleline(&mut dialog.input.x_threshold)
                                .hint_text("0.0 (blank = 0.0)")
                                .desired_width(130.0),
                        );
                        ui.label("s");
                    });
                    ui.end_row();
                });

            ui.add_space(4.0);
            ui.checkbox(
                &mut dialog.input.compute_average,
                "Compute the average and show it on the chart",
            );
            ui.checkbox(
                &mut dialog.input.emit_peak_chart,
                "Write a separate peak chart",
            );

            if let Some(err) = &dialog.error {
                ui.label(RichText::new(err).color(Color32::RED));
            }

            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    submit = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

    if cancel {
        state.peak_dialog = None;
    } else if submit {
        state.submit_peak_dialog();
    }
}
