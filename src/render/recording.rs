use super::{FontPreset, Glow, Quad, Renderer, Size, Vec2};
use crate::notify::{IconId, Rgb};

/// Draw call captured by [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Font(FontPreset),
    Glyph {
        ch: char,
        pos: Vec2,
        scale: f32,
        color: Rgb,
        alpha: f32,
    },
    BeginGlow,
    EndGlow(Glow),
    Icon {
        icon: String,
        rect: Quad,
        alpha: f32,
    },
}

/// Monospace renderer that records every call: each glyph is 10 wide and
/// 20 tall at scale 1.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<Call>,
    pub font: Option<FontPreset>,
}

impl RecordingRenderer {
    pub const ADVANCE: f32 = 10.0;
    pub const HEIGHT: f32 = 20.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Characters drawn outside glow passes, in order
    pub fn sharp_text(&self) -> String {
        let mut in_glow = false;
        let mut out = String::new();
        for call in &self.calls {
            match call {
                Call::BeginGlow => in_glow = true,
                Call::EndGlow(_) => in_glow = false,
                Call::Glyph { ch, .. } if !in_glow => out.push(*ch),
                _ => {}
            }
        }
        out
    }

    pub fn glyphs(&self) -> Vec<(char, Vec2, f32, f32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Glyph {
                    ch, pos, scale, alpha, ..
                } => Some((*ch, *pos, *scale, *alpha)),
                _ => None,
            })
            .collect()
    }

    pub fn glows(&self) -> Vec<Glow> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::EndGlow(glow) => Some(*glow),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn select_font(&mut self, preset: FontPreset) {
        self.font = Some(preset);
        self.calls.push(Call::Font(preset));
    }

    fn measure_text(&self, text: &str, scale: f32) -> Size {
        let count = text.chars().count() as f32;
        let height = if count > 0.0 { Self::HEIGHT * scale } else { 0.0 };
        Size::new(count * Self::ADVANCE * scale, height)
    }

    fn draw_glyph(&mut self, ch: char, pos: Vec2, scale: f32, color: Rgb, alpha: f32, _padding: f32) {
        self.calls.push(Call::Glyph {
            ch,
            pos,
            scale,
            color,
            alpha,
        });
    }

    fn begin_glow_pass(&mut self) {
        self.calls.push(Call::BeginGlow);
    }

    fn end_glow_pass(&mut self, glow: Glow) {
        self.calls.push(Call::EndGlow(glow));
    }

    fn draw_icon(&mut self, icon: &IconId, rect: Quad, alpha: f32) {
        self.calls.push(Call::Icon {
            icon: icon.as_str().to_string(),
            rect,
            alpha,
        });
    }
}
