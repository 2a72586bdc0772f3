// src/gui/components/save_dialog.rs

use eframe::egui;
use crate::{core::sanitize::with_pdf_extension, gui::app::App, worker::Answer};

pub fn draw(ctx: &egui::Context, app: &mut App) {
    if !app.save_dialog_open {
        return;
    }

    egui::Window::new("Save PDF")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Save the badge sheet as:");
            ui.add(
                egui::TextEdit::singleline(&mut app.state.gui.save_path_text).desired_width(360.0),
            );
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    let path = with_pdf_extension(&app.state.gui.save_path_text);
                    logf!("UI: Save path → {path}");
                    app.answer(Answer::SavePath(path));
                    app.save_dialog_open = false;
                }
                // empty path = no document
                if ui.button("Cancel").clicked() {
                    app.answer(Answer::SavePath(s!()));
                    app.save_dialog_open = false;
                }
            });
        });
}
