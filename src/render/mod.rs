//! Drawing contract between the animation core and a concrete backend.
//!
//! The core only hands over semantic parameters: which character, where,
//! how large, in what colour and how opaque. Coordinates live on a virtual
//! canvas of [`CANVAS`] units with the origin at the bottom-left and y
//! pointing up; the backend maps them onto whatever surface it owns.

pub mod compose;
pub mod terminal;

#[cfg(test)]
pub mod recording;

use std::fmt;

use crate::notify::{IconId, Rgb};

/// Virtual canvas every layout is computed against
pub const CANVAS: Size = Size {
    width: 1280.0,
    height: 720.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle; `origin` is the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quad {
    pub origin: Vec2,
    pub size: Size,
}

impl Quad {
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.origin.x + self.size.width * 0.5,
            self.origin.y + self.size.height * 0.5,
        )
    }
}

/// Blurred halo composited under the glyphs drawn in a glow pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Rgb,
    pub radius: f32,
}

/// Named font presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontPreset {
    /// Splash headline
    Bold,
    /// Killstreak banner and glow banner
    ExtraBig,
    /// Pulse text
    Objective,
    /// Description lines
    Default,
}

impl fmt::Display for FontPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FontPreset::Bold => "bold",
            FontPreset::ExtraBig => "extrabig",
            FontPreset::Objective => "objective",
            FontPreset::Default => "default",
        };
        f.write_str(s)
    }
}

/// Backend that measures and draws glyphs.
///
/// A glyph the backend cannot render measures as zero width and draws
/// nothing; the animation timing never depends on it.
pub trait Renderer {
    /// Make `preset` current for later measure and draw calls. Idempotent.
    fn select_font(&mut self, preset: FontPreset);

    /// Advance width and tallest glyph height of `text` at `scale`
    fn measure_text(&self, text: &str, scale: f32) -> Size;

    /// Draw one glyph with its baseline-left corner at `pos`.
    fn draw_glyph(&mut self, ch: char, pos: Vec2, scale: f32, color: Rgb, alpha: f32, padding: f32);

    /// Start capturing glyphs as the glow source
    fn begin_glow_pass(&mut self);

    /// Stop capturing and composite the blurred capture
    fn end_glow_pass(&mut self, glow: Glow);

    fn draw_icon(&mut self, icon: &IconId, rect: Quad, alpha: f32);

    /// Advance width of a single glyph
    fn glyph_advance(&self, ch: char, scale: f32) -> f32 {
        let mut buf = [0u8; 4];
        self.measure_text(ch.encode_utf8(&mut buf), scale).width
    }
}
