use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeConfig;
use crate::shape::Shape;

// ─── Color Palette (terminal-adaptive, transparency-friendly) ──────────

/// Background: always Reset so the terminal's own background shows through
pub const BG: Color = Color::Reset;

/// Primary text color
pub const FG: Color = Color::White;

/// Dimmed text (labels, inactive elements)
pub const FG_DIM: Color = Color::DarkGray;

/// Accent color (keybinding hints)
pub const ACCENT: Color = Color::Cyan;

/// Resolved styles used by every renderer
#[derive(Debug, Clone)]
pub struct Theme {
    pub triangle: Color,
    pub circle: Color,
    pub rect: Color,
    pub indicator: Color,
    pub caption: Style,
    pub border: Style,
    pub fg: Color,
    pub fg_dim: Color,
    pub status_bar: Style,
    pub help_key: Style,
    pub help_desc: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            triangle: config.triangle,
            circle: config.circle,
            rect: config.rect,
            indicator: config.indicator,
            caption: Style::default().fg(config.caption).bg(BG),
            border: Style::default().fg(config.border).bg(BG),
            fg: FG,
            fg_dim: FG_DIM,
            status_bar: Style::default().fg(config.status_bar).bg(BG),
            help_key: Style::default()
                .fg(ACCENT)
                .bg(BG)
                .add_modifier(Modifier::BOLD),
            help_desc: Style::default().fg(FG_DIM).bg(BG),
        }
    }

    pub fn shape_color(&self, shape: Shape) -> Color {
        match shape {
            Shape::Triangle => self.triangle,
            Shape::Circle => self.circle,
            Shape::Rect => self.rect,
        }
    }
}
