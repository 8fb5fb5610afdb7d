pub mod glitch;
pub mod phase;
pub mod pulse_text;

/// Linear interpolation, `t` clamped to [0, 1]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Cubic ease-out: fast start, slow finish. `t` is clamped to [0, 1].
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
