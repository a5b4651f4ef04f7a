//! RGBA colours as `glam::Vec4` and the fixed palette the overlay uses.

use glam::Vec4;

/// Linear RGBA, each channel `0.0..=1.0`.
pub type Color = Vec4;

pub const WHITE: Color = Vec4::new(1.0, 1.0, 1.0, 1.0);
pub const RED: Color = Vec4::new(1.0, 0.0, 0.0, 1.0);
pub const YELLOW: Color = Vec4::new(1.0, 0.922, 0.016, 1.0);
pub const BLUE: Color = Vec4::new(0.0, 0.0, 1.0, 1.0);
pub const GRAY: Color = Vec4::new(0.5, 0.5, 0.5, 1.0);

/// Tint for creatures touched by the void.
pub const SATURATED_GOLD: Color = Vec4::new(1.0, 0.863, 0.059, 1.0);

/// Slugcat body colours by player slot.
pub const PLAYER_BODY: [Color; 4] = [
    Vec4::new(1.0, 1.0, 1.0, 1.0),
    Vec4::new(1.0, 1.0, 0.451, 1.0),
    Vec4::new(1.0, 0.451, 0.451, 1.0),
    Vec4::new(0.091, 0.137, 0.306, 1.0),
];

/// Convert hue/saturation/lightness (all `0..=1`) to an opaque colour.
pub fn hsl(h: f32, s: f32, l: f32) -> Color {
    if s <= 0.0 {
        return Vec4::new(l, l, l, 1.0);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    Vec4::new(channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0), 1.0)
}
