//! Scalar and vector helpers with game-engine semantics.
//!
//! `lerp` and `inverse_lerp` clamp their result the way the host engine's
//! helpers do; every easing in the overlay relies on that.

use glam::{Vec2, Vec3};
use rand::Rng;

#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// `a + (b - a) * t` with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * clamp01(t)
}

/// Where `value` sits between `a` and `b`, clamped to `[0, 1]`.
///
/// `a` may be larger than `b` (a falling ramp). Returns 0 when `a == b`.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    let t = clamp01((value - a) / (b - a));
    if t.is_nan() {
        0.0
    } else {
        t
    }
}

/// Step `current` toward `target` by at most `max_delta`, never overshooting.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Hermite ease between `from` and `to`.
#[inline]
pub fn smooth_step(from: f32, to: f32, t: f32) -> f32 {
    let t = clamp01(t);
    let t = -2.0 * t * t * t + 3.0 * t * t;
    to * t + from * (1.0 - t)
}

/// Heading from `a` to `b` in degrees, clockwise from straight up.
#[inline]
pub fn aim_angle(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    d.x.atan2(d.y).to_degrees()
}

/// Rotate `v` clockwise by `degrees`, matching [`aim_angle`].
#[inline]
pub fn rotate_around_origin(v: Vec2, degrees: f32) -> Vec2 {
    let rad = -degrees.to_radians();
    let (sin, cos) = rad.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Uniform point in the unit disc.
pub fn random_in_circle<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let radius = rng.gen::<f32>().sqrt();
    Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Uniform point in the unit ball.
pub fn random_in_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}
