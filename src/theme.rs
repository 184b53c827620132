//! Light and dark palettes for the UI.
//! The selected mode is persisted; the accent can be overridden from config.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Label for the toggle hint, naming the mode it switches *to*
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemeMode::Light => "Dark Mode",
            ThemeMode::Dark => "Light Mode",
        }
    }
}

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,           // Selected category, active borders
    pub accent_bright: Color,    // Favorite markers
    pub danger: Color,           // Errors, delete hints
    pub success: Color,          // Submit / saved indicators
    pub warning: Color,          // Status line
    pub text: Color,             // Primary text
    pub text_dim: Color,         // Empty states, hints
    pub bg: Color,
    pub bg_selected: Color,      // Selection background
    pub inactive: Color,         // Inactive borders
    pub header: Color,           // Titles
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(ThemeMode::default())
    }
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            // Pink on light grey
            ThemeMode::Light => Self {
                accent: Color::Rgb(219, 39, 119),
                accent_bright: Color::Rgb(236, 72, 153),
                danger: Color::Rgb(220, 38, 38),
                success: Color::Rgb(22, 163, 74),
                warning: Color::Rgb(202, 138, 4),
                text: Color::Rgb(17, 24, 39),
                text_dim: Color::Rgb(75, 85, 99),
                bg: Color::Rgb(243, 244, 246),
                bg_selected: Color::Rgb(209, 213, 219),
                inactive: Color::Rgb(156, 163, 175),
                header: Color::Rgb(190, 24, 93),
            },
            // Yellow on dark grey
            ThemeMode::Dark => Self {
                accent: Color::Rgb(234, 179, 8),
                accent_bright: Color::Rgb(250, 204, 21),
                danger: Color::Rgb(248, 113, 113),
                success: Color::Rgb(74, 222, 128),
                warning: Color::Rgb(250, 204, 21),
                text: Color::Rgb(255, 255, 255),
                text_dim: Color::Rgb(156, 163, 175),
                bg: Color::Rgb(17, 24, 39),
                bg_selected: Color::Rgb(55, 65, 81),
                inactive: Color::Rgb(75, 85, 99),
                header: Color::Rgb(244, 114, 182),
            },
        }
    }

    /// Palette for `mode` with an optional `#RRGGBB` accent override
    pub fn load(mode: ThemeMode, accent: Option<&str>) -> Self {
        let mut theme = Self::for_mode(mode);
        if let Some(value) = accent {
            match Self::parse_hex_color(value) {
                Some(color) => theme.accent = color,
                None => tracing::warn!("Ignoring invalid accent color: {}", value),
            }
        }
        theme
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if !s.is_ascii() {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}
