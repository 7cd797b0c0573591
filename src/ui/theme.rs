//! UI theme definition.

use ratatui::style::{Color, Modifier, Style};

use crate::counter::Variant;

/// Theme for the application UI.
#[derive(Debug, Clone)]
pub struct Theme {
    // Basic styles
    pub normal_text: Style,
    pub block_style: Style,
    pub selected_block: Style,
    pub label_style: Style,
    pub value_style: Style,
    pub count_style: Style,

    // Status styles
    pub ok_style: Style,
    pub lost_style: Style,
    pub pending_style: Style,
    pub unmounted_style: Style,
    pub status_style: Style,

    // Key styles
    pub key_style: Style,

    // Per-variant accents
    pub stale_accent: Style,
    pub functional_accent: Style,
    pub external_accent: Style,
}

impl Theme {
    pub fn accent(&self, variant: Variant) -> Style {
        match variant {
            Variant::Stale => self.stale_accent,
            Variant::Functional => self.functional_accent,
            Variant::External => self.external_accent,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // Basic styles
            normal_text: Style::default().fg(Color::White),
            block_style: Style::default(),
            selected_block: Style::default().fg(Color::Cyan),
            label_style: Style::default().fg(Color::Gray),
            value_style: Style::default().fg(Color::White),
            count_style: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),

            // Status styles
            ok_style: Style::default().fg(Color::Green),
            lost_style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            pending_style: Style::default().fg(Color::Yellow),
            unmounted_style: Style::default().fg(Color::DarkGray),
            status_style: Style::default().fg(Color::Black).bg(Color::Gray),

            // Key styles
            key_style: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),

            // Per-variant accents
            stale_accent: Style::default().fg(Color::Red),
            functional_accent: Style::default().fg(Color::Green),
            external_accent: Style::default().fg(Color::Blue),
        }
    }
}
