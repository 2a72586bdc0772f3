// src/gui/components/login_panel.rs
//
// Credentials + Start. Fields lock while a run is live.

use eframe::egui::{self, widgets::Spinner};
use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Portal login");

    let running = app.running();
    egui::Grid::new("login_grid")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label("Username:");
            ui.add_enabled(
                !running,
                egui::TextEdit::singleline(&mut app.state.gui.username).desired_width(220.0),
            );
            ui.end_row();

            ui.label("Password:");
            let resp = ui.add_enabled(
                !running,
                egui::TextEdit::singleline(&mut app.state.gui.password)
                    .password(true)
                    .desired_width(220.0),
            );
            ui.end_row();

            // Enter in the password field starts too
            if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                app.start();
            }
        });

    ui.horizontal(|ui| {
        if ui.add_enabled(!running, egui::Button::new("Start")).clicked() {
            app.start();
        }
        if running {
            ui.add(Spinner::new());
            if ui.button("Cancel").clicked() {
                app.cancel_run();
            }
        }
    });

    if let Some(hint) = &app.login_hint {
        ui.colored_label(ui.visuals().warn_fg_color, hint);
    }
}
