//! Text drawing on top of a [`Renderer`].
//!
//! Nothing in here touches animation state: each function reads a frame
//! snapshot and issues draw calls, so a frame can be composed any number of
//! times.

use serde::Deserialize;

use super::{FontPreset, Glow, Renderer, Size, Vec2, CANVAS};
use crate::animation::pulse_text::PulseSession;
use crate::notify::arbiter::NotifyFrame;
use crate::notify::layout::NotifyLayout;
use crate::notify::Rgb;

/// Left end of the pulse text line; y is its vertical centre
pub const PULSE_ANCHOR: Vec2 = Vec2::new(360.0, 540.0);
pub const PULSE_SCALE: f32 = 1.0;
pub const PULSE_GLOW: Glow = Glow {
    color: Rgb::new(0.25, 0.75, 0.25),
    radius: 6.0,
};

pub const BANNER_ANCHOR: Vec2 = Vec2::new(400.0, 360.0);
pub const BANNER_SCALE: f32 = 1.0;

// ── Alignment ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignX {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignY {
    Bottom,
    Center,
    Top,
}

/// Which point of a text block sits on its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Align {
    pub x: AlignX,
    pub y: AlignY,
}

impl Default for Align {
    fn default() -> Self {
        Self::CENTER
    }
}

impl Align {
    pub const CENTER: Align = Align {
        x: AlignX::Center,
        y: AlignY::Center,
    };

    /// Baseline-left origin of a block of `size` anchored at `anchor`
    pub fn origin(self, anchor: Vec2, size: Size) -> Vec2 {
        let x = match self.x {
            AlignX::Left => anchor.x,
            AlignX::Center => anchor.x - size.width * 0.5,
            AlignX::Right => anchor.x - size.width,
        };
        let y = match self.y {
            AlignY::Bottom => anchor.y,
            AlignY::Center => anchor.y - size.height * 0.5,
            AlignY::Top => anchor.y - size.height,
        };
        Vec2::new(x, y)
    }
}

// ── Plain and colour-coded text ───────────────────────────────────────

/// Draw a single-colour line. Blanks advance the cursor without a draw call.
pub fn draw_text<R: Renderer + ?Sized>(
    r: &mut R,
    text: &str,
    anchor: Vec2,
    scale: f32,
    align: Align,
    color: Rgb,
    alpha: f32,
) {
    let size = r.measure_text(text, scale);
    let mut pos = align.origin(anchor, size);
    for ch in text.chars() {
        if !ch.is_whitespace() {
            r.draw_glyph(ch, pos, scale, color, alpha, 0.0);
        }
        pos.x += r.glyph_advance(ch, scale);
    }
}

/// Colour selected by a `^N` code. Digits outside 0..=7 select nothing.
pub fn color_code(code: char) -> Option<Rgb> {
    let rgb = match code {
        '0' => Rgb::BLACK,
        '1' => Rgb::new(1.0, 0.2, 0.2),
        '2' => Rgb::new(0.2, 1.0, 0.2),
        '3' => Rgb::new(1.0, 1.0, 0.0),
        '4' => Rgb::new(0.0, 0.0, 1.0),
        '5' => Rgb::new(0.0, 1.0, 1.0),
        '6' => Rgb::new(0.8, 0.2, 0.5),
        '7' => Rgb::WHITE,
        _ => return None,
    };
    Some(rgb)
}

/// Split colour-coded text into runs of visible characters with their colour.
///
/// A `^` followed by any character is a code and is never shown; a trailing
/// lone `^` is shown as-is.
pub fn color_runs(text: &str) -> Vec<(char, Rgb)> {
    let mut color = Rgb::WHITE;
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '^' {
            if let Some(code) = chars.next() {
                if let Some(next) = color_code(code) {
                    color = next;
                }
                continue;
            }
        }
        out.push((ch, color));
    }
    out
}

/// Width of colour-coded text with the codes left out
pub fn colored_text_width<R: Renderer + ?Sized>(r: &R, text: &str, scale: f32) -> f32 {
    color_runs(text)
        .into_iter()
        .map(|(ch, _)| r.glyph_advance(ch, scale))
        .sum()
}

/// Draw colour-coded text with its baseline-left corner at `origin`
pub fn draw_colored_text<R: Renderer + ?Sized>(
    r: &mut R,
    text: &str,
    origin: Vec2,
    scale: f32,
    alpha: f32,
) {
    let mut pos = origin;
    for (ch, color) in color_runs(text) {
        if !ch.is_whitespace() {
            r.draw_glyph(ch, pos, scale, color, alpha, 0.0);
        }
        pos.x += r.glyph_advance(ch, scale);
    }
}

// ── Effects ───────────────────────────────────────────────────────────

/// One pass over the pulse text. The cursor advances by each source
/// character so removed letters keep their slot.
fn draw_pulse_glyphs<R: Renderer + ?Sized>(r: &mut R, session: &PulseSession, now: f64) {
    let text: String = session.text().iter().collect();
    let total = r.measure_text(&text, PULSE_SCALE);
    let align = Align {
        x: AlignX::Left,
        y: AlignY::Center,
    };
    let mut pos = align.origin(PULSE_ANCHOR, total);
    for glyph in session.layout(now) {
        if glyph.is_drawn() && !glyph.shown.is_whitespace() {
            r.draw_glyph(
                glyph.shown,
                pos,
                PULSE_SCALE,
                Rgb::WHITE,
                glyph.alpha as f32,
                0.0,
            );
        }
        pos.x += r.glyph_advance(glyph.source, PULSE_SCALE);
    }
}

/// Glow pass then sharp pass of a pulse text session
pub fn compose_pulse_text<R: Renderer + ?Sized>(
    r: &mut R,
    session: &PulseSession,
    now: f64,
    glow: Glow,
) {
    if !session.is_active() {
        return;
    }
    r.select_font(FontPreset::Objective);
    r.begin_glow_pass();
    draw_pulse_glyphs(r, session, now);
    r.end_glow_pass(glow);
    draw_pulse_glyphs(r, session, now);
}

/// Main line with glow, icon, then the colour-coded description
pub fn compose_notification<R: Renderer + ?Sized>(r: &mut R, frame: &NotifyFrame) {
    let request = &frame.request;
    let style = request.kind.style();

    r.select_font(style.font);
    let main = r.measure_text(&request.text, style.text_scale as f32);
    let layout = NotifyLayout::compute(frame, main, CANVAS);

    r.begin_glow_pass();
    draw_text(
        r,
        &request.text,
        layout.text_center,
        layout.text_scale,
        Align::CENTER,
        Rgb::WHITE,
        1.0,
    );
    r.end_glow_pass(layout.glow);
    draw_text(
        r,
        &request.text,
        layout.text_center,
        layout.text_scale,
        Align::CENTER,
        Rgb::WHITE,
        layout.alpha,
    );

    if let (Some(icon), Some(rect)) = (&request.icon, layout.icon) {
        r.draw_icon(icon, rect, layout.alpha);
    }

    if request.description.is_empty() {
        return;
    }
    r.select_font(FontPreset::Default);
    let width = colored_text_width(&*r, &request.description, layout.desc_scale);
    let align = Align {
        x: AlignX::Center,
        y: AlignY::Bottom,
    };
    let origin = align.origin(layout.desc_anchor, Size::new(width, 0.0));
    draw_colored_text(r, &request.description, origin, layout.desc_scale, layout.alpha);
}

/// Breathing glow of the banner at `now`
pub fn banner_glow(now: f64, color: Rgb) -> Glow {
    Glow {
        color,
        radius: 4.0 + (now * 3.0).sin() as f32 * 1.5,
    }
}

pub fn compose_banner<R: Renderer + ?Sized>(
    r: &mut R,
    text: &str,
    align: Align,
    now: f64,
    color: Rgb,
) {
    r.select_font(FontPreset::ExtraBig);
    r.begin_glow_pass();
    draw_text(r, text, BANNER_ANCHOR, BANNER_SCALE, align, Rgb::WHITE, 1.0);
    r.end_glow_pass(banner_glow(now, color));
    draw_text(r, text, BANNER_ANCHOR, BANNER_SCALE, align, Rgb::WHITE, 1.0);
}
