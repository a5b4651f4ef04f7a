//! Double-buffered animated values.
//!
//! Every quantity the draw pass interpolates lives in a [`Buffered`]: the
//! fixed-rate update pass writes a new `current` (shifting the old one into
//! `last`), and the variable-rate draw pass reads
//! `lerp(last, current, time_stacker)` through a shared reference. The draw
//! pass has no way to mutate the record.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Linear interpolation with `t` clamped to `[0, 1]`.
pub trait Lerp: Copy {
    fn lerp_to(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        self + (other - self) * t
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t.clamp(0.0, 1.0))
    }
}

impl Lerp for Vec3 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t.clamp(0.0, 1.0))
    }
}

impl Lerp for Vec4 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t.clamp(0.0, 1.0))
    }
}

/// A `current` value plus the value it had one update earlier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Buffered<T> {
    current: T,
    last: T,
}

impl<T: Lerp> Buffered<T> {
    /// Both slots start at `value`, so the first draw does not sweep in
    /// from a default.
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            last: value,
        }
    }

    /// Shift `current` into `last` and store `value`.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.last = self.current;
        self.current = value;
    }

    /// Shift `current` into `last` and derive the new value from the old.
    #[inline]
    pub fn step(&mut self, f: impl FnOnce(T) -> T) {
        let next = f(self.current);
        self.push(next);
    }

    /// Mark a tick with no change: `last` catches up with `current`.
    #[inline]
    pub fn hold(&mut self) {
        self.last = self.current;
    }

    /// Overwrite both slots, e.g. when an entity teleports.
    pub fn reset(&mut self, value: T) {
        self.current = value;
        self.last = value;
    }

    #[inline]
    pub fn current(&self) -> T {
        self.current
    }

    #[inline]
    pub fn last(&self) -> T {
        self.last
    }

    /// The draw-time value for `time_stacker` in `[0, 1]`.
    #[inline]
    pub fn at(&self, time_stacker: f32) -> T {
        self.last.lerp_to(self.current, time_stacker)
    }
}
