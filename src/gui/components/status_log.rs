// src/gui/components/status_log.rs
//
// Scrolling event log: one row per worker event, newest at the bottom.

use eframe::egui;
use egui_extras::{Column, TableBuilder};
use crate::gui::app::{App, LogKind};

const ROW_H: f32 = 18.0;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Progress");

    if app.log.is_empty() {
        ui.weak("Nothing yet. Log in and press Start.");
        return;
    }

    let visuals = ui.visuals().clone();
    TableBuilder::new(ui)
        .striped(true)
        .stick_to_bottom(true)
        .min_scrolled_height(0.0)
        .column(Column::exact(70.0))
        .column(Column::remainder().clip(true))
        .header(ROW_H, |mut header| {
            header.col(|ui| {
                ui.strong("Kind");
            });
            header.col(|ui| {
                ui.strong("Message");
            });
        })
        .body(|body| {
            body.rows(ROW_H, app.log.len(), |mut row| {
                let line = &app.log[row.index()];
                let color = match line.kind {
                    LogKind::Error => visuals.error_fg_color,
                    LogKind::Success => egui::Color32::from_rgb(60, 160, 90),
                    LogKind::Log => visuals.weak_text_color(),
                    LogKind::Status => visuals.text_color(),
                };
                row.col(|ui| {
                    ui.colored_label(color, line.kind.label());
                });
                row.col(|ui| {
                    ui.colored_label(color, &line.message);
                });
            });
        });
}
