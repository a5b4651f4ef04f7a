//! Fixed-rate tick scheduling for a variable-rate frame loop.
//!
//! The host renders at whatever rate it can but simulates at a fixed
//! [`TICKS_PER_SECOND`](crate::TICKS_PER_SECOND). [`FrameClock`] turns each
//! frame's elapsed time into the number of whole ticks to run before drawing
//! and the `time_stacker` fraction the draw pass interpolates with.
//!
//! # Example
//!
//! ```
//! use offscreen_hud::tick::{FrameClock, TickConfig};
//!
//! let mut clock = FrameClock::new(TickConfig::default());
//!
//! // One 60 Hz frame: no full 40 Hz tick yet.
//! let step = clock.advance(1.0 / 60.0);
//! assert_eq!(step.ticks, 0);
//! assert!((step.time_stacker - 2.0 / 3.0).abs() < 1e-4);
//!
//! // The next frame crosses the tick boundary.
//! let step = clock.advance(1.0 / 60.0);
//! assert_eq!(step.ticks, 1);
//! assert_eq!(clock.tick_count(), 1);
//! ```

use crate::TICKS_PER_SECOND;

// ---------------------------------------------------------------------------
// TickConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Seconds per simulation tick. Must be positive and finite.
    pub fixed_dt: f64,
    /// Ticks run at most per frame; older backlog is dropped.
    pub max_ticks_per_frame: u32,
}

impl Default for TickConfig {
    /// The host's 40 Hz, catching up at most five ticks per frame.
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / TICKS_PER_SECOND as f64,
            max_ticks_per_frame: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// FrameStep
// ---------------------------------------------------------------------------

/// What to do for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Simulation ticks to run before drawing.
    pub ticks: u32,
    /// Draw interpolation fraction in `[0, 1]`.
    pub time_stacker: f32,
}

// ---------------------------------------------------------------------------
// FrameClock
// ---------------------------------------------------------------------------

/// Accumulates frame time into fixed ticks.
///
/// Simulation time is `tick_count * fixed_dt`, never a running float sum,
/// so it does not drift over long sessions.
#[derive(Debug, Clone)]
pub struct FrameClock {
    config: TickConfig,
    accumulator: f64,
    tick_count: u64,
    dropped_ticks: u64,
}

impl FrameClock {
    /// # Panics
    ///
    /// Panics if `fixed_dt` is not positive and finite.
    pub fn new(config: TickConfig) -> Self {
        assert!(
            config.fixed_dt > 0.0 && config.fixed_dt.is_finite(),
            "fixed_dt must be positive and finite, got {}",
            config.fixed_dt
        );
        Self {
            config,
            accumulator: 0.0,
            tick_count: 0,
            dropped_ticks: 0,
        }
    }

    /// Feed one frame's elapsed seconds. Negative or non-finite frame times
    /// count as zero.
    pub fn advance(&mut self, frame_dt: f64) -> FrameStep {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }

        let dt = self.config.fixed_dt;
        let due = (self.accumulator / dt).floor() as u64;
        let ticks = due.min(self.config.max_ticks_per_frame as u64);
        if due > ticks {
            self.dropped_ticks += due - ticks;
            tracing::trace!(dropped = due - ticks, "frame clock dropped backlog");
        }
        self.accumulator -= due as f64 * dt;
        self.accumulator = self.accumulator.max(0.0);
        self.tick_count += ticks;

        FrameStep {
            ticks: ticks as u32,
            time_stacker: (self.accumulator / dt).clamp(0.0, 1.0) as f32,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated seconds so far.
    pub fn sim_time(&self) -> f64 {
        self.tick_count as f64 * self.config.fixed_dt
    }

    pub fn fixed_dt(&self) -> f64 {
        self.config.fixed_dt
    }

    /// Ticks skipped because a frame fell too far behind.
    pub fn dropped_ticks(&self) -> u64 {
        self.dropped_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_forty_hertz() {
        let cfg = TickConfig::default();
        assert!((cfg.fixed_dt - 0.025).abs() < f64::EPSILON);
        assert_eq!(cfg.max_ticks_per_frame, 5);
    }

    #[test]
    #[should_panic(expected = "fixed_dt must be positive")]
    fn zero_dt_panics() {
        FrameClock::new(TickConfig {
            fixed_dt: 0.0,
            ..Default::default()
        });
    }

    #[test]
    #[should_panic(expected = "fixed_dt must be positive")]
    fn nan_dt_panics() {
        FrameClock::new(TickConfig {
            fixed_dt: f64::NAN,
            ..Default::default()
        });
    }

    #[test]
    fn exact_ticks_leave_no_fraction() {
        let mut clock = FrameClock::new(TickConfig {
            fixed_dt: 0.25,
            max_ticks_per_frame: 10,
        });
        let step = clock.advance(0.5);
        assert_eq!(step.ticks, 2);
        assert_eq!(step.time_stacker, 0.0);
        assert_eq!(clock.sim_time(), 0.5);
    }

    #[test]
    fn long_frame_drops_backlog() {
        let mut clock = FrameClock::new(TickConfig {
            fixed_dt: 0.25,
            max_ticks_per_frame: 2,
        });
        let step = clock.advance(2.125);
        assert_eq!(step.ticks, 2);
        assert_eq!(clock.dropped_ticks(), 6);
        assert!((step.time_stacker - 0.5).abs() < 1e-6);

        let step = clock.advance(0.0);
        assert_eq!(step.ticks, 0, "backlog does not carry over");
    }

    #[test]
    fn bad_frame_times_are_ignored() {
        let mut clock = FrameClock::new(TickConfig::default());
        for dt in [-1.0, f64::NAN, f64::INFINITY] {
            let step = clock.advance(dt);
            assert_eq!(step.ticks, 0);
            assert_eq!(step.time_stacker, 0.0);
        }
    }

    #[test]
    fn time_stacker_stays_in_unit_range() {
        let mut clock = FrameClock::new(TickConfig::default());
        for i in 0..500 {
            let step = clock.advance(0.001 * (i % 37) as f64);
            assert!((0.0..=1.0).contains(&step.time_stacker));
            assert!(step.ticks <= 5);
        }
    }
}
