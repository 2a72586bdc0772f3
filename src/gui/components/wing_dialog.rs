// src/gui/components/wing_dialog.rs
//
// Wing picker: two columns of checkboxes. Confirm sends the picks; an empty pick
// sends nothing.

use eframe::egui;
use crate::{gui::app::{App, LogKind}, worker::Answer};

pub fn draw(ctx: &egui::Context, app: &mut App) {
    if !app.wing_dialog_open {
        return;
    }

    egui::Window::new("Select wings")
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if app.state.gui.wing_picks.is_empty() {
                ui.colored_label(ui.visuals().error_fg_color, "No wings found on the roster.");
                if ui.button("Cancel run").clicked() {
                    app.cancel_run();
                }
                return;
            }

            ui.horizontal(|ui| {
                if ui.button("All").clicked() {
                    app.state.gui.wing_picks.iter_mut().for_each(|(_, on)| *on = true);
                }
                if ui.button("None").clicked() {
                    app.state.gui.wing_picks.iter_mut().for_each(|(_, on)| *on = false);
                }
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("wing_scroll")
                .max_height(320.0)
                .show(ui, |ui| {
                    let picks = &mut app.state.gui.wing_picks;
                    let half = picks.len().div_ceil(2);
                    let (left, right) = picks.split_at_mut(half);
                    ui.columns(2, |cols| {
                        for (wing, on) in left.iter_mut() {
                            cols[0].checkbox(on, wing.as_str());
                        }
                        for (wing, on) in right.iter_mut() {
                            cols[1].checkbox(on, wing.as_str());
                        }
                    });
                });

            if let Some(w) = &app.wing_warning {
                ui.colored_label(ui.visuals().warn_fg_color, w);
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Confirm").clicked() {
                    let picked = app.state.gui.picked_wings();
                    if picked.is_empty() {
                        app.wing_warning = Some(s!("Select at least one wing."));
                    } else {
                        logf!("UI: Wings → {picked:?}");
                        app.push(LogKind::Status, format!("Selected: {}", picked.join(", ")));
                        app.answer(Answer::SelectedWings(picked));
                        app.wing_warning = None;
                        app.wing_dialog_open = false;
                    }
                }
                if ui.button("Cancel run").clicked() {
                    app.cancel_run();
                }
            });
        });
}
