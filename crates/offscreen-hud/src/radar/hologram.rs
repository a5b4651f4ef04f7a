//! Flickering hologram line work: single [`Line`]s and [`HologramRing`]s.
//!
//! Each line endpoint is re-sampled every tick. At full power it sits on its
//! geometric position; as power drops it is jittered and pulled toward the
//! shortcut, so the whole figure appears to power up out of the pipe.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use offscreen_core::interp::Buffered;
use offscreen_core::math::random_in_circle;
use rand::Rng;

use crate::color::Color;
use crate::draw::{DrawCommand, DrawList, Layer};
use crate::host::HudHost;

/// Jitter radius of a line endpoint at zero power, in world units.
const ENDPOINT_JITTER: f32 = 5.0;

/// Noisy ease factor `(power^2)^(2^u)` with `u` uniform in `[-2, 2]`.
///
/// Zero at zero power and one at full power, wandering in between.
pub fn jitter_ease<R: Rng + ?Sized>(rng: &mut R, power: f32) -> f32 {
    let exponent = 2f32.powf(rng.gen_range(-2.0..=2.0));
    (power * power).powf(exponent)
}

/// A hologram segment in radar space, relative to the radar position.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Vec3,
    pub end: Vec3,
    /// Base opacity before power and warm-up.
    pub alpha: f32,
    from: Buffered<Vec3>,
    to: Buffered<Vec3>,
    visible_alpha: Buffered<f32>,
}

impl Line {
    pub fn new(start: Vec3, end: Vec3, alpha: f32) -> Self {
        Self {
            start,
            end,
            alpha,
            from: Buffered::new(start),
            to: Buffered::new(end),
            visible_alpha: Buffered::new(0.0),
        }
    }

    /// Re-sample both endpoints around `origin`, pulled toward `source`.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Vec3,
        source: Vec3,
        power: f32,
        warm_up: f32,
    ) {
        let from = self.sample(rng, self.start, origin, source, power);
        let to = self.sample(rng, self.end, origin, source, power);
        self.from.push(from);
        self.to.push(to);
        self.visible_alpha.push(self.alpha * power * warm_up);
    }

    fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        point: Vec3,
        origin: Vec3,
        source: Vec3,
        power: f32,
    ) -> Vec3 {
        let jitter = random_in_circle(rng) * (1.0 - power) * ENDPOINT_JITTER;
        let target = point + jitter.extend(0.0) + origin;
        source.lerp(target, jitter_ease(rng, power))
    }

    pub fn visible_alpha(&self) -> f32 {
        self.visible_alpha.current()
    }

    pub fn endpoints(&self) -> (Vec3, Vec3) {
        (self.from.current(), self.to.current())
    }

    /// Project and emit the segment; nothing when it is fully faded.
    pub fn draw<H: HudHost>(&self, host: &H, color: Color, time_stacker: f32, out: &mut DrawList) {
        if self.visible_alpha.current() == 0.0 {
            return;
        }
        let camera = host.camera_pos();
        out.push(DrawCommand::Line {
            layer: Layer::Bloom,
            from: host.apply_depth(self.from.at(time_stacker)) - camera,
            to: host.apply_depth(self.to.at(time_stacker)) - camera,
            color,
            alpha: self.visible_alpha.at(time_stacker),
        });
    }
}

/// Regular polygon approximating a circle, one [`Line`] per side.
#[derive(Debug, Clone, PartialEq)]
pub struct HologramRing {
    /// Centre relative to the radar position; `z` is depth.
    pub center: Vec3,
    pub radius: f32,
    pub alpha: f32,
    sides: Vec<Line>,
}

impl HologramRing {
    pub fn new(center: Vec3, radius: f32, alpha: f32, sides: usize) -> Self {
        let mut ring = Self {
            center,
            radius,
            alpha,
            sides: Vec::with_capacity(sides),
        };
        for i in 0..sides {
            let (start, end) = ring.side(i, sides);
            ring.sides.push(Line::new(start, end, alpha));
        }
        ring
    }

    fn side(&self, i: usize, n: usize) -> (Vec3, Vec3) {
        let corner = |k: usize| {
            let rad = TAU * k as f32 / n as f32;
            (Vec2::new(rad.cos(), rad.sin()) * self.radius).extend(0.0) + self.center
        };
        (corner(i), corner(i + 1))
    }

    /// Re-layout the sides from the current radius and alpha, then update them.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Vec3,
        source: Vec3,
        power: f32,
        warm_up: f32,
    ) {
        let n = self.sides.len();
        for i in 0..n {
            let (start, end) = self.side(i, n);
            let line = &mut self.sides[i];
            line.start = start;
            line.end = end;
            line.alpha = self.alpha;
            line.update(rng, origin, source, power, warm_up);
        }
    }

    pub fn draw<H: HudHost>(&self, host: &H, color: Color, time_stacker: f32, out: &mut DrawList) {
        for line in &self.sides {
            line.draw(host, color, time_stacker, out);
        }
    }

    pub fn sides(&self) -> &[Line] {
        &self.sides
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn ease_is_pinned_at_the_ends() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(jitter_ease(&mut rng, 0.0), 0.0);
            assert_eq!(jitter_ease(&mut rng, 1.0), 1.0);
            let mid = jitter_ease(&mut rng, 0.5);
            assert!((0.0..=1.0).contains(&mid));
        }
    }

    #[test]
    fn unpowered_line_collapses_to_source_and_hides() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut line = Line::new(Vec3::new(10.0, 0.0, -10.0), Vec3::new(0.0, 10.0, -10.0), 1.0);
        let source = Vec3::new(100.0, 100.0, 0.0);
        line.update(&mut rng, Vec3::new(50.0, 50.0, 0.0), source, 0.0, 1.0);
        assert_eq!(line.endpoints(), (source, source));
        assert_eq!(line.visible_alpha(), 0.0);
    }

    #[test]
    fn full_power_line_sits_on_its_geometry() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut line = Line::new(Vec3::new(10.0, 0.0, -10.0), Vec3::new(0.0, 10.0, -10.0), 0.5);
        let origin = Vec3::new(50.0, 50.0, 0.0);
        line.update(&mut rng, origin, Vec3::ZERO, 1.0, 1.0);
        let (from, to) = line.endpoints();
        assert!((from - Vec3::new(60.0, 50.0, -10.0)).length() < 1e-4);
        assert!((to - Vec3::new(50.0, 60.0, -10.0)).length() < 1e-4);
        assert_eq!(line.visible_alpha(), 0.5);
    }

    #[test]
    fn ring_sides_close_the_loop() {
        let ring = HologramRing::new(Vec3::new(0.0, 0.0, -5.0), 20.0, 0.75, 8);
        let sides = ring.sides();
        assert_eq!(sides.len(), 8);
        for (a, b) in sides.iter().zip(sides.iter().cycle().skip(1)) {
            assert!((a.end - b.start).length() < 1e-4);
        }
        for side in sides {
            assert!((side.start.truncate().length() - 20.0).abs() < 1e-4);
            assert_eq!(side.start.z, -5.0);
        }
    }

    #[test]
    fn ring_update_follows_new_radius() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ring = HologramRing::new(Vec3::ZERO, 20.0, 1.0, 8);
        ring.radius = 40.0;
        ring.alpha = 0.25;
        ring.update(&mut rng, Vec3::ZERO, Vec3::ZERO, 1.0, 1.0);
        assert!((ring.sides()[0].start.x - 40.0).abs() < 1e-4);
        assert_eq!(ring.sides()[0].visible_alpha(), 0.25);
    }
}
