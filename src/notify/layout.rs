//! On-screen geometry of a notification frame.

use super::arbiter::NotifyFrame;
use super::NotifyKind;
use crate::animation::lerp;
use crate::render::{Glow, Quad, Size, Vec2};

/// Splash start height above centre; the popup drops from here
const SPLASH_START_Y: f32 = 260.0;
/// Icon edge length at text scale 1
const ICON_BASE: f32 = 140.0;
/// Icon nudge to the right of the centred position
const ICON_NUDGE_X: f32 = 7.0;
/// Gap between the killstreak line and its icon
const BANNER_ICON_GAP: f32 = 20.0;
const DESC_SCALE: f32 = 0.375;
/// Glow radius at full alpha
const GLOW_RADIUS: f32 = 5.0;

/// Where and how to draw each part of a notification
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyLayout {
    /// Centre of the main line
    pub text_center: Vec2,
    pub text_scale: f32,
    pub icon: Option<Quad>,
    /// Horizontal centre and baseline of the description
    pub desc_anchor: Vec2,
    pub desc_scale: f32,
    pub alpha: f32,
    pub glow: Glow,
}

impl NotifyLayout {
    /// Lay out `frame` on `canvas`. `main` is the main line measured with the
    /// kind's font at its rest scale.
    pub fn compute(frame: &NotifyFrame, main: Size, canvas: Size) -> Self {
        let style = frame.request.kind.style();
        let center = Vec2::new(canvas.width * 0.5, canvas.height * 0.5);
        let alpha = frame.alpha as f32;
        let scale = frame.scale as f32;
        let base_scale = style.text_scale as f32;
        let rest_y = center.y + style.y_offset as f32;
        let x = center.x + frame.slide as f32;

        let icon_size = if frame.request.icon.is_some() {
            ICON_BASE * base_scale * scale
        } else {
            0.0
        };

        let (text_y, desc_y, icon_y, text_scale, desc_scale) = match frame.request.kind {
            NotifyKind::Killstreak => (
                rest_y,
                rest_y - main.height * 2.7,
                rest_y + BANNER_ICON_GAP,
                base_scale,
                DESC_SCALE * scale,
            ),
            NotifyKind::Splash => {
                let start_y = center.y + SPLASH_START_Y;
                let mix = |to: f32| lerp(f64::from(start_y), f64::from(to), frame.alpha) as f32;
                (
                    mix(rest_y),
                    mix(rest_y - main.height * 2.5),
                    mix(rest_y + main.height * 3.3) - icon_size * 0.5,
                    base_scale * scale,
                    DESC_SCALE * scale,
                )
            }
            NotifyKind::Plain => (
                rest_y,
                rest_y - main.height * 2.5,
                rest_y + BANNER_ICON_GAP,
                base_scale,
                DESC_SCALE,
            ),
        };

        let icon = frame.request.icon.as_ref().map(|_| Quad {
            origin: Vec2::new(x - icon_size * 0.5 + ICON_NUDGE_X, icon_y),
            size: Size::new(icon_size, icon_size),
        });

        Self {
            text_center: Vec2::new(x, text_y),
            text_scale,
            icon,
            desc_anchor: Vec2::new(x, desc_y),
            desc_scale,
            alpha,
            glow: Glow {
                color: frame.request.color.scaled(alpha),
                radius: GLOW_RADIUS * alpha,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::phase::Phase;
    use crate::notify::{IconId, NotifyRequest, Rgb};
    use crate::render::CANVAS;

    fn frame(kind: NotifyKind, alpha: f64, scale: f64, slide: f64) -> NotifyFrame {
        NotifyFrame {
            request: NotifyRequest::new(kind, "3 Kill Streak!")
                .icon(IconId::new("uav_icon"))
                .color(Rgb::new(0.25, 0.75, 0.25)),
            phase: Phase::Hold,
            alpha,
            scale,
            slide,
        }
    }

    const MAIN: Size = Size::new(300.0, 20.0);

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn killstreak_offsets_are_relative_to_text_height() {
        let layout = NotifyLayout::compute(&frame(NotifyKind::Killstreak, 1.0, 1.0, 0.0), MAIN, CANVAS);
        assert_eq!(layout.text_center, Vec2::new(640.0, 540.0));
        assert!(close(layout.desc_anchor.x, 640.0));
        assert!(close(layout.desc_anchor.y, 540.0 - 54.0));
        assert!(close(layout.text_scale, 0.6));
        assert!(close(layout.desc_scale, 0.375));
        let icon = layout.icon.expect("icon");
        assert!(close(icon.size.width, 84.0));
        assert!(close(icon.origin.y, 560.0));
        assert!(close(icon.origin.x, 640.0 - 42.0 + 7.0));
    }

    #[test]
    fn killstreak_slides_horizontally() {
        let layout =
            NotifyLayout::compute(&frame(NotifyKind::Killstreak, 0.5, 1.0, -320.0), MAIN, CANVAS);
        assert!(close(layout.text_center.x, 320.0));
        assert!(close(layout.desc_anchor.x, 320.0));
        assert!(close(layout.glow.radius, 2.5));
    }

    #[test]
    fn splash_drops_from_start_height() {
        let hidden = NotifyLayout::compute(&frame(NotifyKind::Splash, 0.0, 10.0, 0.0), MAIN, CANVAS);
        assert!(close(hidden.text_center.y, 360.0 + 260.0));
        assert!(close(hidden.desc_anchor.y, 360.0 + 260.0));
        assert!(close(hidden.text_scale, 5.0));
        assert!(close(hidden.glow.radius, 0.0));

        let settled = NotifyLayout::compute(&frame(NotifyKind::Splash, 1.0, 1.0, 0.0), MAIN, CANVAS);
        assert!(close(settled.text_center.y, 540.0));
        assert!(close(settled.desc_anchor.y, 540.0 - 50.0));
        assert!(close(settled.text_scale, 0.5));
        let icon = settled.icon.expect("icon");
        assert!(close(icon.size.width, 70.0));
        assert!(close(icon.origin.y, 540.0 + 66.0 - 35.0));
    }

    #[test]
    fn plain_stays_put() {
        let layout = NotifyLayout::compute(&frame(NotifyKind::Plain, 0.3, 1.0, 0.0), MAIN, CANVAS);
        assert_eq!(layout.text_center, Vec2::new(640.0, 540.0));
        assert!(close(layout.desc_scale, 0.375));
        assert!(close(layout.alpha, 0.3));
    }

    #[test]
    fn no_icon_means_no_quad() {
        let mut f = frame(NotifyKind::Splash, 1.0, 1.0, 0.0);
        f.request.icon = None;
        let layout = NotifyLayout::compute(&f, MAIN, CANVAS);
        assert!(layout.icon.is_none());
    }
}
