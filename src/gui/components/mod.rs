// src/gui/components/mod.rs
pub mod error_dialog;
pub mod login_panel;
pub mod save_dialog;
pub mod status_log;
pub mod wing_dialog;
