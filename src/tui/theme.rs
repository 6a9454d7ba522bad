use ratatui::style::Color;

use crate::model::{UiConfig, Variant};

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    /// Completed todos and the completed counter
    pub complete: Color,
    /// Progress percentage
    pub pending: Color,
    /// Destructive notifications
    pub destructive: Color,
    pub selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x0E, 0x1C),
            text: Color::Rgb(0xC8, 0xC4, 0xF0),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x8B, 0x5C, 0xF6),
            dim: Color::Rgb(0x76, 0x72, 0x9A),
            complete: Color::Rgb(0x22, 0xC5, 0x5E),
            pending: Color::Rgb(0xF5, 0x9E, 0x0B),
            destructive: Color::Rgb(0xEF, 0x44, 0x44),
            selection_bg: Color::Rgb(0x2A, 0x20, 0x48),
        }
    }
}

/// Parse a hex color string like "#EF4444"
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

impl Theme {
    /// Defaults with `[ui.colors]` overrides applied; unknown names and bad values are skipped
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "complete" => theme.complete = color,
                "pending" => theme.pending = color,
                "destructive" => theme.destructive = color,
                "selection_bg" => theme.selection_bg = color,
                other => tracing::warn!(key = other, "unknown theme color"),
            }
        }
        theme
    }

    pub fn notification_color(&self, variant: Variant) -> Color {
        match variant {
            Variant::Default => self.complete,
            Variant::Destructive => self.destructive,
        }
    }
}
