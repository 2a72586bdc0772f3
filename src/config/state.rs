// src/config/state.rs
use super::options::PortalOptions;

#[derive(Clone, Debug)]
pub struct GuiState {
    pub window_w: u32,
    pub window_h: u32,

    /// Login form text (never written to disk)
    pub username: String,
    pub password: String,

    /// Save dialog text, seeded from the worker's suggestion
    pub save_path_text: String,

    /// Wing dialog picks, in the order the worker offered them
    pub wing_picks: Vec<(String, bool)>,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            window_w: 760,
            window_h: 560,
            username: s!(),
            password: s!(),
            save_path_text: s!(),
            wing_picks: Vec::new(),
        }
    }
}

impl GuiState {
    pub fn offer_wings(&mut self, wings: &[String]) {
        self.wing_picks = wings.iter().map(|w| (w.clone(), false)).collect();
    }

    pub fn picked_wings(&self) -> Vec<String> {
        self.wing_picks
            .iter()
            .filter(|(_, on)| *on)
            .map(|(w, _)| w.clone())
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: PortalOptions,
    pub gui: GuiState,
}
