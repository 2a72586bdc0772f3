// src/gui/components/error_dialog.rs
//
// Shown when the portal bounced us back to its login page.

use eframe::egui;
use crate::gui::app::App;

const CHECKLIST: &[&str] = &[
    "Username and password are typed correctly",
    "The account is active and may access the roster",
    "The portal's login page has not changed",
];

pub fn draw(ctx: &egui::Context, app: &mut App) {
    let Some(message) = app.login_error.clone() else { return };

    egui::Window::new("Login failed")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.colored_label(ui.visuals().error_fg_color, &message);
            ui.add_space(6.0);
            ui.label("Please check:");
            for item in CHECKLIST {
                ui.label(format!("• {item}"));
            }
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("Try again").clicked() {
                    app.state.gui.password.clear();
                    app.login_error = None;
                }
                if ui.button("Close").clicked() {
                    app.login_error = None;
                }
            });
        });
}
