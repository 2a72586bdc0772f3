// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use cara_cracha::{config::state::GuiState, gui, log};
use eframe::egui::ViewportBuilder;

fn main() {
    if let Err(e) = log::init(log::Console::Off) {
        eprintln!("Logging disabled: {e}");
    }

    let gui = GuiState::default();
    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([gui.window_w as f32, gui.window_h as f32])
            .with_title("Canaimé Cara-Crachá"),
        ..Default::default()
    };

    if let Err(e) = gui::run(options) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
