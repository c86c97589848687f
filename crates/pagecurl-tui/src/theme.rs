use pagecurl_core::config::{ThemeColorOverrides, ThemeConfig};
use ratatui::style::Color;
use tracing::warn;

/// Runtime theme with configurable colors
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Surface behind the pages and any area a clip leaves uncovered
    pub background: Color,
    pub foreground: Color,
    /// Phase indicator while a curl is in flight
    pub accent: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    /// Key hints
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(0x17, 0x17, 0x17),
            foreground: Color::Rgb(0xe5, 0xe5, 0xe5),
            accent: Color::Rgb(0xf5, 0x9e, 0x0b),
            status_bg: Color::Rgb(0x26, 0x26, 0x26),
            status_fg: Color::Rgb(0xd4, 0xd4, 0xd4),
            muted: Color::Rgb(0x73, 0x73, 0x73),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(0xfa, 0xfa, 0xfa),
            foreground: Color::Rgb(0x17, 0x17, 0x17),
            accent: Color::Rgb(0xc2, 0x41, 0x0c),
            status_bg: Color::Rgb(0xe5, 0xe5, 0xe5),
            status_fg: Color::Rgb(0x26, 0x26, 0x26),
            muted: Color::Rgb(0x73, 0x73, 0x73),
        }
    }

    /// Resolve a page fill color, falling back to the background
    pub fn fill(&self, color: &str) -> Color {
        parse_color(color).unwrap_or_else(|| {
            warn!("Unrecognised fill color '{}', using background", color);
            self.background
        })
    }
}

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        // Short form: RGB -> RRGGBB
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Parse a hex color or a basic CSS color name
pub fn parse_color(value: &str) -> Option<Color> {
    let rgb = match value.trim().to_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "pink" => (255, 192, 203),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "olive" => (128, 128, 0),
        _ => return parse_hex_color(value),
    };
    Some(Color::Rgb(rgb.0, rgb.1, rgb.2))
}

/// Load a theme by name from config
pub fn load_theme(config: &ThemeConfig) -> Theme {
    let base = match config.name.to_lowercase().as_str() {
        "dark" => Theme::dark(),
        "light" => Theme::light(),
        other => {
            warn!("Unknown theme '{}', using dark", other);
            Theme::dark()
        }
    };

    apply_overrides(base, &config.colors)
}

/// Apply user color overrides to a base theme
fn apply_overrides(mut theme: Theme, overrides: &ThemeColorOverrides) -> Theme {
    let slots = [
        (&overrides.background, &mut theme.background),
        (&overrides.foreground, &mut theme.foreground),
        (&overrides.accent, &mut theme.accent),
        (&overrides.status_bg, &mut theme.status_bg),
    ];

    for (value, slot) in slots {
        if let Some(value) = value {
            match parse_color(value) {
                Some(color) => *slot = color,
                None => warn!("Invalid theme color '{}', keeping default", value),
            }
        }
    }

    theme
}
