use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

use crate::stage::Mode;

// ─── Color Palette (terminal-adaptive, transparency-friendly) ──────────

/// Chrome colours for everything drawn around the canvas
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background: Reset (transparent) respects the terminal background
    pub bg: Color,
    pub fg: Color,
    /// Dimmed text (labels, inactive elements)
    pub fg_dim: Color,
    /// Accent color (keybinding hints, help border)
    pub accent: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub border_type: BorderType,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            fg_dim: Color::DarkGray,
            accent: Color::Cyan,
            border: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            border_type: BorderType::Rounded,
        }
    }
}

// ─── Style Constructors ──────────────────────────────────────────────────

impl Theme {
    pub fn style_default(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn style_dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    pub fn style_accent(&self) -> Style {
        Style::default().fg(self.accent).bg(self.bg)
    }

    pub fn style_accent_bold(&self) -> Style {
        self.style_accent().add_modifier(Modifier::BOLD)
    }

    pub fn style_key_hint(&self) -> Style {
        self.style_accent_bold()
    }

    pub fn style_key_desc(&self) -> Style {
        self.style_dim()
    }

    /// Colour of the mode badge in the status bar
    pub fn mode_color(&self, mode: Mode) -> Color {
        match mode {
            Mode::Idle => self.fg_dim,
            Mode::Splash => self.warning,
            Mode::PulseText => self.success,
            Mode::GlowBanner => self.accent,
        }
    }
}
