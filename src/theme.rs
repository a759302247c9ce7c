//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes.

use ratatui::style::{Color, Modifier, Style};

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Category list --
    pub list_normal: Style,
    pub list_selected: Style,
    pub list_parent: Style,

    // -- Login form --
    pub field_label: Style,
    pub field_focused: Style,
    pub field_hint: Style,

    // -- Content view --
    pub content_title: Style,
    pub content_body: Style,
    pub content_metadata: Style,
    pub content_download: Style,

    // -- Shared --
    pub loading: Style,
    pub error: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            list_normal: Style::default(),
            list_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            list_parent: Style::default().add_modifier(Modifier::BOLD),

            field_label: Style::default().fg(Color::Gray),
            field_focused: Style::default().fg(Color::Cyan),
            field_hint: Style::default().fg(Color::Yellow),

            content_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            content_body: Style::default(),
            content_metadata: Style::default().fg(Color::DarkGray),
            content_download: Style::default().fg(Color::Blue),

            loading: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    /// Light palette, adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            list_normal: Style::default().fg(Color::Black),
            list_selected: Style::default().bg(Color::Blue).fg(Color::White),
            list_parent: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            field_label: Style::default().fg(Color::DarkGray),
            field_focused: Style::default().fg(Color::Blue),
            field_hint: Style::default().fg(Color::Magenta),

            content_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            content_body: Style::default().fg(Color::Black),
            content_metadata: Style::default().fg(Color::DarkGray),
            content_download: Style::default().fg(Color::Blue),

            loading: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_from_str_name() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("Light"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("DARK"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn variants_cycle() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next(), ThemeVariant::Dark);
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.list_selected, light.list_selected);
        assert_ne!(dark.status_bar, light.status_bar);
    }

    #[test]
    fn dark_status_bar_is_inverted() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.status_bar,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
    }
}
