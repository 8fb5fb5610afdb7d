pub mod arbiter;
pub mod layout;

use std::fmt;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::render::FontPreset;

// ── Kinds ─────────────────────────────────────────────────────────────

/// Notification style. Doubles as the coalescing key of the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyKind {
    /// Looping banner that slides in from the left and always plays its exit
    Killstreak,
    /// One-shot popup that zooms and fades into place
    Splash,
    /// Neutral fade used for any unrecognised type name
    Plain,
}

impl NotifyKind {
    /// Map a type name onto a kind. Unknown names fall back to `Plain`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "killstreak" => NotifyKind::Killstreak,
            "splash" => NotifyKind::Splash,
            "plain" => NotifyKind::Plain,
            other => {
                warn!(kind = other, "unknown notification type, using plain style");
                NotifyKind::Plain
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NotifyKind::Killstreak => "killstreak",
            NotifyKind::Splash => "splash",
            NotifyKind::Plain => "plain",
        }
    }

    /// Rendering and timing parameters of this kind
    pub fn style(self) -> KindStyle {
        match self {
            NotifyKind::Killstreak => KindStyle {
                driver: Driver::Timed,
                font: FontPreset::ExtraBig,
                text_scale: 0.6,
                zoom_from: 1.0,
                slide_offset: 640.0,
                y_offset: 180.0,
                arrival_sound: Some("mp_killstrk_radar.wav"),
            },
            NotifyKind::Splash => KindStyle {
                driver: Driver::Eased,
                font: FontPreset::Bold,
                text_scale: 0.5,
                zoom_from: 10.0,
                slide_offset: 0.0,
                y_offset: 180.0,
                arrival_sound: Some("mp_last_stand.wav"),
            },
            NotifyKind::Plain => KindStyle {
                driver: Driver::Timed,
                font: FontPreset::Bold,
                text_scale: 0.5,
                zoom_from: 1.0,
                slide_offset: 0.0,
                y_offset: 180.0,
                arrival_sound: None,
            },
        }
    }
}

impl fmt::Display for NotifyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for NotifyKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(NotifyKind::from_name(&s))
    }
}

/// How a notification's animation is advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// Eased value family: zoom + fade sampled once per frame
    Eased,
    /// Update-driven fixed alpha and slide curves
    Timed,
}

/// Per-kind parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindStyle {
    pub driver: Driver,
    /// Font used for the main line
    pub font: FontPreset,
    /// Main line scale before any animated zoom
    pub text_scale: f64,
    /// Zoom factor the eased family starts from (1 = no zoom)
    pub zoom_from: f64,
    /// Horizontal slide distance of the timed family (0 = no slide)
    pub slide_offset: f64,
    /// Rest height of the main line above screen centre
    pub y_offset: f64,
    pub arrival_sound: Option<&'static str>,
}

// ── Colour ────────────────────────────────────────────────────────────

/// Linear RGB colour with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn scaled(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    /// 8-bit channels, clamped
    pub fn to_u8(self) -> (u8, u8, u8) {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }

    /// Parse a named colour or `#RRGGBB`
    pub fn parse(s: &str) -> Option<Rgb> {
        let s = s.trim().to_lowercase();
        let rgb = match s.as_str() {
            "black" => Rgb::BLACK,
            "white" => Rgb::WHITE,
            "red" => Rgb::new(1.0, 0.2, 0.2),
            "green" => Rgb::new(0.2, 1.0, 0.2),
            "yellow" => Rgb::new(1.0, 1.0, 0.0),
            "blue" => Rgb::new(0.0, 0.0, 1.0),
            "cyan" => Rgb::new(0.0, 1.0, 1.0),
            "magenta" | "pink" => Rgb::new(0.8, 0.2, 0.5),
            hex if hex.starts_with('#') && hex.len() == 7 => {
                let channel = |range: std::ops::Range<usize>| {
                    hex.get(range).and_then(|c| u8::from_str_radix(c, 16).ok())
                };
                let r = channel(1..3)?;
                let g = channel(3..5)?;
                let b = channel(5..7)?;
                Rgb::new(
                    f32::from(r) / 255.0,
                    f32::from(g) / 255.0,
                    f32::from(b) / 255.0,
                )
            }
            _ => return None,
        };
        Some(rgb)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Rgb::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: \"{s}\"")))
    }
}

// ── Requests ──────────────────────────────────────────────────────────

/// Handle of an icon known to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct IconId(pub String);

impl IconId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One notification ask. Copied into the arbiter, never shared.
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyRequest {
    pub text: String,
    /// Second line; may carry `^N` colour codes
    pub description: String,
    pub icon: Option<IconId>,
    pub color: Rgb,
    pub kind: NotifyKind,
}

impl NotifyRequest {
    pub fn new(kind: NotifyKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: String::new(),
            icon: None,
            color: Rgb::WHITE,
            kind,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn icon(mut self, icon: IconId) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in [NotifyKind::Killstreak, NotifyKind::Splash, NotifyKind::Plain] {
            assert_eq!(NotifyKind::from_name(kind.name()), kind);
        }
        assert_eq!(NotifyKind::from_name(" Splash "), NotifyKind::Splash);
    }

    #[test]
    fn unknown_kind_is_plain() {
        assert_eq!(NotifyKind::from_name("medal"), NotifyKind::Plain);
        assert_eq!(NotifyKind::from_name(""), NotifyKind::Plain);
    }

    #[test]
    fn styles_pick_their_driver() {
        assert_eq!(NotifyKind::Killstreak.style().driver, Driver::Timed);
        assert_eq!(NotifyKind::Splash.style().driver, Driver::Eased);
        assert_eq!(NotifyKind::Plain.style().slide_offset, 0.0);
        assert_eq!(NotifyKind::Killstreak.style().slide_offset, 640.0);
    }

    #[test]
    fn parse_hex_and_named_colors() {
        assert_eq!(Rgb::parse("#ff0000"), Some(Rgb::new(1.0, 0.0, 0.0)));
        assert_eq!(Rgb::parse("White"), Some(Rgb::WHITE));
        assert_eq!(Rgb::parse("#12"), None);
        assert_eq!(Rgb::parse("#gg0000"), None);
        assert_eq!(Rgb::parse("chartreuse"), None);
    }

    #[test]
    fn non_ascii_hex_is_rejected() {
        assert_eq!(Rgb::parse("#aébcd"), None);
        assert_eq!(Rgb::parse("#ffé00"), None);
    }

    #[test]
    fn to_u8_clamps() {
        assert_eq!(Rgb::new(2.0, -1.0, 0.5).to_u8(), (255, 0, 128));
    }

    #[test]
    fn builder_sets_fields() {
        let req = NotifyRequest::new(NotifyKind::Splash, "First Blood!")
            .description("You got the first kill. (^3+100^7)")
            .icon(IconId::new("splash_icon"))
            .color(Rgb::new(0.75, 0.25, 0.25));
        assert_eq!(req.kind, NotifyKind::Splash);
        assert_eq!(req.icon.as_ref().map(IconId::as_str), Some("splash_icon"));
        assert_eq!(req.color.r, 0.75);
    }
}
