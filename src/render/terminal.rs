//! [`Renderer`] backed by a grid of terminal cells.
//!
//! The virtual canvas is divided evenly over the grid. Every glyph occupies
//! one cell (two for wide characters); larger scales spread the cursor
//! instead of growing the glyph. A glow pass is captured into a mask and
//! composited as coloured cell backgrounds around the captured glyphs.

use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthChar;

use super::{FontPreset, Glow, Quad, Renderer, Size, Vec2, CANVAS};
use crate::notify::{IconId, Rgb};

/// Glow radius, in virtual units, that reaches one cell horizontally
const GLOW_UNITS_PER_CELL: f32 = 2.0;
/// Peak share of the glow colour added to a neighbouring cell
const GLOW_GAIN: f32 = 0.7;

/// Scale at which a preset's glyph advances by exactly one cell
fn reference_scale(font: FontPreset) -> f32 {
    match font {
        FontPreset::Bold => 0.5,
        FontPreset::ExtraBig => 0.6,
        FontPreset::Objective => 1.0,
        FontPreset::Default => 0.375,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Ink {
    ch: char,
    color: Rgb,
}

#[derive(Debug)]
pub struct TerminalCanvas {
    cols: u16,
    rows: u16,
    ink: Vec<Option<Ink>>,
    glow: Vec<Rgb>,
    mask: Vec<f32>,
    capturing: bool,
    font: FontPreset,
    icons: HashMap<IconId, String>,
    background: Rgb,
}

impl TerminalCanvas {
    pub fn new(background: Rgb, icons: HashMap<IconId, String>) -> Self {
        Self {
            cols: 0,
            rows: 0,
            ink: Vec::new(),
            glow: Vec::new(),
            mask: Vec::new(),
            capturing: false,
            font: FontPreset::Default,
            icons,
            background,
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn font(&self) -> FontPreset {
        self.font
    }

    /// Match the grid to a terminal area, dropping the previous frame
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols != self.cols || rows != self.rows {
            self.cols = cols;
            self.rows = rows;
            let len = usize::from(cols) * usize::from(rows);
            self.ink = vec![None; len];
            self.glow = vec![Rgb::BLACK; len];
            self.mask = vec![0.0; len];
        } else {
            self.clear();
        }
    }

    /// Start a fresh frame
    pub fn clear(&mut self) {
        self.ink.iter_mut().for_each(|cell| *cell = None);
        self.glow.iter_mut().for_each(|cell| *cell = Rgb::BLACK);
        self.mask.iter_mut().for_each(|cell| *cell = 0.0);
        self.capturing = false;
    }

    fn cell_size(&self) -> Size {
        if self.cols == 0 || self.rows == 0 {
            return Size::default();
        }
        Size::new(
            CANVAS.width / f32::from(self.cols),
            CANVAS.height / f32::from(self.rows),
        )
    }

    /// Grid cell holding the glyph whose baseline-left corner is `pos`
    fn cell_at(&self, pos: Vec2) -> Option<(u16, u16)> {
        let cell = self.cell_size();
        if cell.width <= 0.0 || cell.height <= 0.0 {
            return None;
        }
        let col = (pos.x / cell.width + 1e-3).floor();
        let mid = pos.y + cell.height * 0.5;
        let row = ((CANVAS.height - mid) / cell.height + 1e-3).floor();
        if col < 0.0 || row < 0.0 || col >= f32::from(self.cols) || row >= f32::from(self.rows) {
            return None;
        }
        Some((col as u16, row as u16))
    }

    fn index(&self, col: u16, row: u16) -> usize {
        usize::from(row) * usize::from(self.cols) + usize::from(col)
    }

    /// Character and foreground colour drawn at a cell, if any
    pub fn ink_at(&self, col: u16, row: u16) -> Option<(char, Rgb)> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.ink[self.index(col, row)].map(|ink| (ink.ch, ink.color))
    }

    /// Background colour of a cell including glow
    pub fn background_at(&self, col: u16, row: u16) -> Rgb {
        if col >= self.cols || row >= self.rows {
            return self.background;
        }
        let glow = self.glow[self.index(col, row)];
        Rgb::new(
            self.background.r + glow.r,
            self.background.g + glow.g,
            self.background.b + glow.b,
        )
    }

    fn blend(&self, color: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let bg = self.background;
        Rgb::new(
            bg.r + (color.r - bg.r) * a,
            bg.g + (color.g - bg.g) * a,
            bg.b + (color.b - bg.b) * a,
        )
    }

    fn put(&mut self, ch: char, pos: Vec2, color: Rgb, alpha: f32) {
        let Some((col, row)) = self.cell_at(pos) else {
            return;
        };
        let idx = self.index(col, row);
        if self.capturing {
            self.mask[idx] = self.mask[idx].max(alpha.clamp(0.0, 1.0));
            return;
        }
        self.ink[idx] = Some(Ink {
            ch,
            color: self.blend(color, alpha),
        });
    }
}

impl Renderer for TerminalCanvas {
    fn select_font(&mut self, preset: FontPreset) {
        self.font = preset;
    }

    fn measure_text(&self, text: &str, scale: f32) -> Size {
        let cell = self.cell_size();
        let k = scale / reference_scale(self.font);
        let mut size = Size::default();
        for ch in text.chars() {
            let Some(w) = ch.width() else { continue };
            size.width += w as f32 * cell.width * k;
            if w > 0 {
                size.height = size.height.max(cell.height * k);
            }
        }
        size
    }

    fn draw_glyph(&mut self, ch: char, pos: Vec2, _scale: f32, color: Rgb, alpha: f32, _padding: f32) {
        if alpha <= 0.0 || !matches!(ch.width(), Some(w) if w > 0) {
            return;
        }
        self.put(ch, pos, color, alpha);
    }

    fn begin_glow_pass(&mut self) {
        self.mask.iter_mut().for_each(|cell| *cell = 0.0);
        self.capturing = true;
    }

    fn end_glow_pass(&mut self, glow: Glow) {
        self.capturing = false;
        let reach_x = (glow.radius / GLOW_UNITS_PER_CELL).max(0.0);
        let reach_y = reach_x * 0.5;
        if reach_x <= 0.0 {
            return;
        }
        let (rx, ry) = (reach_x.ceil() as i32, reach_y.ceil() as i32);
        let (cols, rows) = (i32::from(self.cols), i32::from(self.rows));

        for row in 0..rows {
            for col in 0..cols {
                let weight = self.mask[(row * cols + col) as usize];
                if weight <= 0.0 {
                    continue;
                }
                for dy in -ry..=ry {
                    for dx in -rx..=rx {
                        let (x, y) = (col + dx, row + dy);
                        if x < 0 || y < 0 || x >= cols || y >= rows {
                            continue;
                        }
                        let nx = dx as f32 / reach_x;
                        let ny = if reach_y > 0.0 { dy as f32 / reach_y } else { dy as f32 * 2.0 };
                        let d = (nx * nx + ny * ny).sqrt();
                        if d > 1.0 {
                            continue;
                        }
                        let k = weight * (1.0 - d * 0.5) * GLOW_GAIN;
                        let cell = &mut self.glow[(y * cols + x) as usize];
                        cell.r = cell.r.max(glow.color.r * k);
                        cell.g = cell.g.max(glow.color.g * k);
                        cell.b = cell.b.max(glow.color.b * k);
                    }
                }
            }
        }
        self.mask.iter_mut().for_each(|cell| *cell = 0.0);
    }

    fn draw_icon(&mut self, icon: &IconId, rect: Quad, alpha: f32) {
        let Some(ch) = self.icons.get(icon).and_then(|s| s.chars().next()) else {
            return;
        };
        let center = rect.center();
        let cell = self.cell_size();
        let pos = Vec2::new(center.x - cell.width * 0.5, center.y - cell.height * 0.5);
        self.put(ch, pos, Rgb::WHITE, alpha);
    }
}

fn to_color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.to_u8();
    Color::Rgb(r, g, b)
}

impl Widget for &TerminalCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = self.cols.min(area.width);
        let rows = self.rows.min(area.height);
        for row in 0..rows {
            for col in 0..cols {
                let bg = to_color(self.background_at(col, row));
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_bg(bg);
                }
            }
        }
        for row in 0..rows {
            for col in 0..cols {
                let Some((ch, fg)) = self.ink_at(col, row) else {
                    continue;
                };
                let style = Style::default()
                    .fg(to_color(fg))
                    .bg(to_color(self.background_at(col, row)));
                let mut tmp = [0u8; 4];
                buf.set_stringn(
                    area.x + col,
                    area.y + row,
                    ch.encode_utf8(&mut tmp),
                    usize::from(cols - col),
                    style,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::compose::{compose_pulse_text, PULSE_GLOW};

    const BG: Rgb = Rgb::new(0.05, 0.05, 0.08);

    fn canvas() -> TerminalCanvas {
        let mut icons = HashMap::new();
        icons.insert(IconId::new("uav_icon"), "◎".to_string());
        let mut c = TerminalCanvas::new(BG, icons);
        // 8 x 16 virtual units per cell
        c.resize(160, 45);
        c
    }

    #[test]
    fn select_font_is_idempotent() {
        let mut c = canvas();
        c.select_font(FontPreset::Bold);
        let once = c.measure_text("First Blood!", 0.5);
        c.select_font(FontPreset::Bold);
        let twice = c.measure_text("First Blood!", 0.5);
        assert_eq!(once, twice);
        assert_eq!(once.width, 12.0 * 8.0);
    }

    #[test]
    fn presets_rest_on_one_cell_per_glyph() {
        let mut c = canvas();
        for (font, scale) in [
            (FontPreset::Bold, 0.5),
            (FontPreset::ExtraBig, 0.6),
            (FontPreset::Objective, 1.0),
            (FontPreset::Default, 0.375),
        ] {
            c.select_font(font);
            let size = c.measure_text("ab", scale);
            assert!((size.width - 16.0).abs() < 1e-3, "{font}");
            assert!((size.height - 16.0).abs() < 1e-3, "{font}");
        }
    }

    #[test]
    fn unrenderable_glyphs_have_no_width_and_no_ink() {
        let mut c = canvas();
        c.select_font(FontPreset::Objective);
        assert_eq!(c.measure_text("\u{7}", 1.0), Size::default());
        c.draw_glyph('\u{7}', Vec2::new(8.0, 704.0), 1.0, Rgb::WHITE, 1.0, 0.0);
        assert!(c.ink.iter().all(Option::is_none));
    }

    #[test]
    fn glyph_lands_in_its_cell() {
        let mut c = canvas();
        // baseline of the top row
        c.draw_glyph('X', Vec2::new(360.0, 704.0), 1.0, Rgb::WHITE, 1.0, 0.0);
        assert_eq!(c.ink_at(45, 0).map(|(ch, _)| ch), Some('X'));
        c.draw_glyph('Y', Vec2::new(0.0, 0.0), 1.0, Rgb::WHITE, 1.0, 0.0);
        assert_eq!(c.ink_at(0, 44).map(|(ch, _)| ch), Some('Y'));
    }

    #[test]
    fn off_canvas_glyphs_are_clipped() {
        let mut c = canvas();
        c.draw_glyph('X', Vec2::new(-50.0, 360.0), 1.0, Rgb::WHITE, 1.0, 0.0);
        c.draw_glyph('X', Vec2::new(1300.0, 360.0), 1.0, Rgb::WHITE, 1.0, 0.0);
        c.draw_glyph('X', Vec2::new(10.0, 900.0), 1.0, Rgb::WHITE, 1.0, 0.0);
        assert!(c.ink.iter().all(Option::is_none));
    }

    #[test]
    fn alpha_blends_toward_background() {
        let mut c = canvas();
        c.draw_glyph('X', Vec2::new(8.0, 704.0), 1.0, Rgb::WHITE, 0.0, 0.0);
        assert!(c.ink_at(1, 0).is_none());
        c.draw_glyph('X', Vec2::new(8.0, 704.0), 1.0, Rgb::WHITE, 0.5, 0.0);
        let (_, color) = c.ink_at(1, 0).expect("ink");
        assert!((color.r - 0.525).abs() < 1e-4);
    }

    #[test]
    fn glow_pass_lights_neighbours_without_ink() {
        let mut c = canvas();
        c.begin_glow_pass();
        c.draw_glyph('X', Vec2::new(400.0, 352.0), 1.0, Rgb::WHITE, 1.0, 0.0);
        c.end_glow_pass(Glow {
            color: Rgb::new(0.0, 1.0, 0.0),
            radius: 6.0,
        });
        assert!(c.ink.iter().all(Option::is_none));
        let (col, row) = c.cell_at(Vec2::new(400.0, 352.0)).expect("cell");
        assert!(c.background_at(col, row).g > BG.g);
        assert!(c.background_at(col + 2, row).g > BG.g);
        assert_eq!(c.background_at(col + 10, row), BG);
    }

    #[test]
    fn zero_radius_glow_adds_nothing() {
        let mut c = canvas();
        c.begin_glow_pass();
        c.draw_glyph('X', Vec2::new(400.0, 352.0), 1.0, Rgb::WHITE, 1.0, 0.0);
        c.end_glow_pass(Glow {
            color: Rgb::WHITE,
            radius: 0.0,
        });
        assert!(c.glow.iter().all(|g| *g == Rgb::BLACK));
    }

    #[test]
    fn known_icons_draw_and_unknown_ones_degrade() {
        let mut c = canvas();
        let rect = Quad {
            origin: Vec2::new(600.0, 560.0),
            size: Size::new(84.0, 84.0),
        };
        c.draw_icon(&IconId::new("missing"), rect, 1.0);
        assert!(c.ink.iter().all(Option::is_none));
        c.draw_icon(&IconId::new("uav_icon"), rect, 1.0);
        assert_eq!(c.ink.iter().flatten().count(), 1);
    }

    #[test]
    fn renders_pulse_text_into_buffer() {
        let mut c = canvas();
        let session = crate::animation::pulse_text::PulseSession::start(
            "Eliminate",
            0.0,
            Default::default(),
        );
        compose_pulse_text(&mut c, &session, 1.5, PULSE_GLOW);

        let area = Rect::new(0, 0, 160, 45);
        let mut buf = Buffer::empty(area);
        (&c).render(area, &mut buf);

        let row: String = (45..54)
            .filter_map(|x| buf.cell((x, 11)).map(|cell| cell.symbol().to_string()))
            .collect();
        assert_eq!(row, "Eliminate");
    }
}
