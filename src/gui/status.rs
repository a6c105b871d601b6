//! Status line shown in the bottom panel.
//!
//! A single mutable text value with last-write-wins semantics: each
//! operation's outcome overwrites the previous one, no history is kept.

use eframe::egui;

/// Severity of the current status text, used only for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

impl StatusLevel {
    fn color(self) -> egui::Color32 {
        match self {
            Self::Info => egui::Color32::GRAY,
            Self::Success => egui::Color32::DARK_GREEN,
            Self::Error => egui::Color32::RED,
        }
    }
}

/// The single shared status value, always visible.
pub struct StatusLine {
    text: String,
    level: StatusLevel,
}

impl StatusLine {
    pub fn new() -> Self {
        Self {
            text: "Ready".to_string(),
            level: StatusLevel::Info,
        }
    }

    /// Overwrite the current status.
    pub fn set(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.text = text.into();
        self.level = level;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ui(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.colored_label(self.level.color(), &self.text);
        });
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}
