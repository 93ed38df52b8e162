use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::model::product::ProductStatus;
use crate::model::project::ProjectStatus;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub highlight: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub blue: Color,
    pub purple: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0B, 0x0F, 0x14),
            text: Color::Rgb(0xC9, 0xD4, 0xE3),
            text_bright: Color::Rgb(0xF2, 0xF6, 0xFB),
            dim: Color::Rgb(0x5E, 0x6B, 0x7E),
            highlight: Color::Rgb(0xFF, 0xB4, 0x54),
            selection_bg: Color::Rgb(0x1C, 0x28, 0x36),
            selection_border: Color::Rgb(0xFF, 0xB4, 0x54),
            red: Color::Rgb(0xE5, 0x48, 0x4D),
            yellow: Color::Rgb(0xFF, 0xC5, 0x3D),
            green: Color::Rgb(0x46, 0xA7, 0x58),
            cyan: Color::Rgb(0x00, 0xB8, 0xD9),
            blue: Color::Rgb(0x3E, 0x82, 0xF7),
            purple: Color::Rgb(0x8E, 0x64, 0xD9),
        }
    }
}

impl Theme {
    /// Build a theme from config color overrides (hex strings by role name)
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        let overrides: &mut [(&str, &mut Color)] = &mut [
            ("background", &mut theme.background),
            ("text", &mut theme.text),
            ("text_bright", &mut theme.text_bright),
            ("dim", &mut theme.dim),
            ("highlight", &mut theme.highlight),
            ("selection_bg", &mut theme.selection_bg),
            ("selection_border", &mut theme.selection_border),
            ("red", &mut theme.red),
            ("yellow", &mut theme.yellow),
            ("green", &mut theme.green),
            ("cyan", &mut theme.cyan),
            ("blue", &mut theme.blue),
            ("purple", &mut theme.purple),
        ];
        for (name, slot) in overrides.iter_mut() {
            if let Some(hex) = ui.colors.get(*name)
                && let Some(color) = parse_hex(hex)
            {
                **slot = color;
            }
        }
        theme
    }

    pub fn project_status_color(&self, status: ProjectStatus) -> Color {
        match status {
            ProjectStatus::Planned => self.blue,
            ProjectStatus::Active => self.green,
            ProjectStatus::Paused => self.yellow,
            ProjectStatus::Done => self.cyan,
            ProjectStatus::Archived => self.dim,
        }
    }

    pub fn product_status_color(&self, status: ProductStatus) -> Color {
        match status {
            ProductStatus::New => self.blue,
            ProductStatus::Inwork => self.green,
            ProductStatus::Paused => self.yellow,
            ProductStatus::Done => self.dim,
        }
    }
}

/// Parse a `#RRGGBB` hex color
fn parse_hex(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
