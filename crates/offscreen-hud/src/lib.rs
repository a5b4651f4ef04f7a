//! Offscreen HUD -- off-screen threat indicators and shortcut radars.
//!
//! This crate builds on [`offscreen_core`] to provide the overlay a 2D game
//! host attaches to its HUD:
//!
//! - [`indicators`]: pulse rings, edge-clamped creature icons and glowing
//!   warnings for weapons thrown from off-screen.
//! - [`radar`]: one holographic minimap per room exit, showing creatures
//!   near the far end of the pipe before the player can see them.
//! - [`overlay::Overlay`]: the entry points the host calls once per
//!   simulation tick ([`update`](overlay::Overlay::update)) and once per
//!   rendered frame ([`draw`](overlay::Overlay::draw)).
//!
//! The host is reached only through [`host::HudHost`]. [`sandbox`] provides
//! an in-memory host for tests and the headless demo.
//!
//! # Quick Start
//!
//! ```
//! use glam::Vec2;
//! use offscreen_hud::prelude::*;
//!
//! let mut host = SandboxHost::new(Vec2::new(1400.0, 800.0));
//! host.add_room(RoomId(0), true);
//! host.set_camera(RoomId(0), Vec2::ZERO);
//! host.spawn_creature(RoomId(0), CreatureKind::GreenLizard, Vec2::new(-300.0, 400.0));
//!
//! let cfg = IndicatorConfig::default();
//! let mut overlay = Overlay::attach(&host, SenseModel::default());
//! let mut clock = FrameClock::new(TickConfig::default());
//!
//! let step = clock.advance(1.0 / 60.0);
//! for _ in 0..step.ticks {
//!     overlay.update(&mut host, &cfg, clock.fixed_dt() as f32);
//!     host.end_tick();
//! }
//! let frame = overlay.draw(&host, &cfg, step.time_stacker);
//! assert_eq!(frame, overlay.draw(&host, &cfg, step.time_stacker));
//! ```

#![deny(unsafe_code)]

pub mod color;
pub mod config;
pub mod draw;
pub mod host;
pub mod indicators;
pub mod overlay;
pub mod radar;
pub mod sandbox;
pub mod sense;
pub mod tick;

/// World units per room tile.
pub const TILE_SIZE: f32 = 20.0;

/// Simulation rate of the host game.
pub const TICKS_PER_SECOND: f32 = 40.0;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from parsing or validating an [`IndicatorConfig`](config::IndicatorConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("scan_tile_range {value} outside {min}..={max}")]
    ScanRangeOutOfBounds { value: i32, min: i32, max: i32 },

    #[error("minimap_scale {value} outside {min}..={max}")]
    MinimapScaleOutOfBounds { value: f32, min: f32, max: f32 },

    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for hosts embedding the overlay.
pub mod prelude {
    pub use offscreen_core::prelude::*;

    pub use crate::color::Color;
    pub use crate::config::{DisplayMode, IndicatorConfig, RadarMode};
    pub use crate::draw::{DrawCommand, DrawList, Layer, SpriteStyle};
    pub use crate::host::{
        AbstractRoom, Creature, CreatureKind, HudHost, Item, ItemKind, Player, RoomId,
        RoomState, Shortcut, ShortcutKind, WeaponMode,
    };
    pub use crate::indicators::pulse::Pulse;
    pub use crate::indicators::OffscreenIndicators;
    pub use crate::overlay::Overlay;
    pub use crate::radar::minimap::{RadarPhase, ShortcutMinimap};
    pub use crate::radar::set::RadarSet;
    pub use crate::sandbox::SandboxHost;
    pub use crate::sense::SenseModel;
    pub use crate::tick::{FrameClock, FrameStep, TickConfig};
    pub use crate::{ConfigError, TICKS_PER_SECOND, TILE_SIZE};
}
