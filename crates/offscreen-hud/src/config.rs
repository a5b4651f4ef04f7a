//! User-facing overlay settings.
//!
//! The host owns persistence and the options UI; the overlay only receives
//! an [`IndicatorConfig`] snapshot on every update and draw and treats it as
//! immutable for that call. Snapshots may differ from one frame to the next.
//!
//! # JSON form
//!
//! ```
//! use offscreen_hud::config::{DisplayMode, IndicatorConfig, RadarMode};
//!
//! let cfg = IndicatorConfig::from_json(r#"{
//!     "offscreen_display": "icon",
//!     "radar_mode": "mini",
//!     "scan_tile_range": 24
//! }"#).unwrap();
//!
//! assert_eq!(cfg.offscreen_display, DisplayMode::Icon);
//! assert_eq!(cfg.radar_mode, RadarMode::Minimal);
//! assert!(cfg.show_thrown_items, "unset fields keep their defaults");
//! ```

use serde::{Deserialize, Serialize};

use crate::{ConfigError, TILE_SIZE};

pub const SCAN_TILE_RANGE_MIN: i32 = 2;
pub const SCAN_TILE_RANGE_MAX: i32 = 64;
pub const MINIMAP_SCALE_MIN: f32 = 0.01;
pub const MINIMAP_SCALE_MAX: f32 = 1.0;

/// How off-screen creatures are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Hidden,
    #[default]
    Pulse,
    Icon,
}

/// How shortcut radars lay out their blips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RadarMode {
    /// No radars at all.
    #[serde(rename = "disabled")]
    Disabled,
    /// Expanded near a player, compact otherwise.
    #[default]
    #[serde(rename = "default", alias = "dynamic")]
    Dynamic,
    /// Always the spatial layout.
    #[serde(rename = "expand", alias = "expanded")]
    Expanded,
    /// Always the orbiting layout.
    #[serde(rename = "mini", alias = "minimal")]
    Minimal,
}

/// One frame's worth of settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub offscreen_display: DisplayMode,
    /// Glow warnings for weapons thrown off-screen.
    pub show_thrown_items: bool,
    pub radar_mode: RadarMode,
    /// How many tiles from its far entrance a radar senses creatures.
    pub scan_tile_range: i32,
    /// Size of the radar relative to the real layout of the far room.
    pub minimap_scale: f32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            offscreen_display: DisplayMode::Pulse,
            show_thrown_items: true,
            radar_mode: RadarMode::Dynamic,
            scan_tile_range: 16,
            minimap_scale: 0.2,
        }
    }
}

impl IndicatorConfig {
    /// Parse and validate a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(SCAN_TILE_RANGE_MIN..=SCAN_TILE_RANGE_MAX).contains(&self.scan_tile_range) {
            return Err(ConfigError::ScanRangeOutOfBounds {
                value: self.scan_tile_range,
                min: SCAN_TILE_RANGE_MIN,
                max: SCAN_TILE_RANGE_MAX,
            });
        }
        if !self.minimap_scale.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "minimap_scale",
            });
        }
        if !(MINIMAP_SCALE_MIN..=MINIMAP_SCALE_MAX).contains(&self.minimap_scale) {
            return Err(ConfigError::MinimapScaleOutOfBounds {
                value: self.minimap_scale,
                min: MINIMAP_SCALE_MIN,
                max: MINIMAP_SCALE_MAX,
            });
        }
        Ok(())
    }

    /// A copy with every field forced into range. Non-finite scales fall
    /// back to the default.
    pub fn clamped(&self) -> Self {
        let minimap_scale = if self.minimap_scale.is_finite() {
            self.minimap_scale.clamp(MINIMAP_SCALE_MIN, MINIMAP_SCALE_MAX)
        } else {
            Self::default().minimap_scale
        };
        Self {
            scan_tile_range: self
                .scan_tile_range
                .clamp(SCAN_TILE_RANGE_MIN, SCAN_TILE_RANGE_MAX),
            minimap_scale,
            ..self.clone()
        }
    }

    /// This snapshot if valid, otherwise its clamped copy with a warning.
    pub(crate) fn sanitized(&self) -> std::borrow::Cow<'_, Self> {
        match self.validate() {
            Ok(()) => std::borrow::Cow::Borrowed(self),
            Err(e) => {
                tracing::warn!(error = %e, "config snapshot out of range, clamping");
                std::borrow::Cow::Owned(self.clamped())
            }
        }
    }

    /// Radar sensing range in world units.
    pub fn scan_range(&self) -> f32 {
        self.scan_tile_range as f32 * TILE_SIZE
    }

    /// Radius of the expanded radar ring on screen.
    pub fn radar_radius(&self) -> f32 {
        self.scan_range() * self.minimap_scale
    }
}
