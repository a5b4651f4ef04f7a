//! Shortcut radars.
//!
//! Every room exit of the camera room gets a [`minimap::ShortcutMinimap`]:
//! a small hologram drawn at the pipe mouth that shows creatures waiting
//! near the other end. [`set::RadarSet`] owns the radars of the current
//! room; [`hologram`] and [`blip`] hold the drawable pieces.

pub mod blip;
pub mod hologram;
pub mod minimap;
pub mod set;
