//! Offscreen Core -- entity tracking and double-buffered animation state for
//! HUD overlays.
//!
//! Nothing in this crate knows about a particular game. It provides:
//!
//! - [`entity::EntityId`]: the stable, value-equal handle hosts give out.
//! - [`tracker::Tracker`]: reconciles a live collection against per-entity
//!   visual state with create/destroy callbacks.
//! - [`interp::Buffered`]: the current/last pair that lets a variable-rate
//!   draw pass interpolate a fixed-rate simulation without mutating it.
//! - [`math`]: clamped easing helpers and seeded jitter sampling.
//!
//! # Quick Start
//!
//! ```
//! use offscreen_core::prelude::*;
//!
//! struct Visible<'a>(&'a [(EntityId, bool)]);
//!
//! impl<'a> TrackPolicy<EntityId, Buffered<f32>> for Visible<'a> {
//!     type Candidate = (EntityId, bool);
//!     fn candidates(&mut self) -> Vec<Self::Candidate> { self.0.to_vec() }
//!     fn key(&self, c: &Self::Candidate) -> EntityId { c.0 }
//!     fn exists(&mut self, c: &Self::Candidate) -> bool { c.1 }
//!     fn create(&mut self, _c: &Self::Candidate) -> Buffered<f32> { Buffered::new(0.0) }
//! }
//!
//! let mut ids = EntityAllocator::new();
//! let (a, b) = (ids.allocate(), ids.allocate());
//!
//! let mut tracker = Tracker::new();
//! tracker.update(&mut Visible(&[(a, true), (b, false)]));
//! assert!(tracker.contains(&a));
//! assert!(!tracker.contains(&b));
//!
//! for alpha in tracker.values_mut() {
//!     alpha.push(1.0);
//! }
//! assert_eq!(tracker.get(&a).map(|v| v.at(0.5)), Some(0.5));
//! ```

#![deny(unsafe_code)]

pub mod entity;
pub mod interp;
pub mod math;
pub mod tracker;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from the checked tracker API.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    /// The tracker was cleaned up and no longer accepts updates.
    #[error("tracker has been cleaned up and no longer reconciles")]
    Retired,
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::entity::{EntityAllocator, EntityId};
    pub use crate::interp::{Buffered, Lerp};
    pub use crate::math::{
        aim_angle, clamp01, inverse_lerp, lerp, move_towards, random_in_circle,
        random_in_sphere, rotate_around_origin, smooth_step,
    };
    pub use crate::tracker::{ReconcileReport, TrackPolicy, Tracker};
    pub use crate::TrackError;
}
