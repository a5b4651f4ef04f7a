//! How well a player can perceive a creature they cannot see.
//!
//! Everything here is a pure function of host data. Species traits are
//! kept in explicit tables keyed by [`CreatureKind`], default-first with
//! overrides, so new kinds are added by inserting a row rather than by
//! touching the indicators that read them.

use std::collections::HashMap;

use glam::Vec2;
use offscreen_core::math::{clamp01, inverse_lerp};

use crate::color::{self, Color};
use crate::host::{Creature, CreatureKind, Player};

/// Observer submersion at which nothing off-screen is perceived.
pub const OBSERVER_DEAF_SUBMERSION: f32 = 1.8;

// ---------------------------------------------------------------------------
// Range and strength
// ---------------------------------------------------------------------------

/// Sense range after darkness and submersion have eaten into it.
///
/// `base * (1 - 0.8 * darkness) * (1 - 0.4 * submersion)`, with both
/// modifiers clamped to `[0, 1]` so the range stays positive.
pub fn sense_range(base: f32, darkness: f32, submersion: f32) -> f32 {
    base * (1.0 - 0.8 * clamp01(darkness)) * (1.0 - 0.4 * clamp01(submersion))
}

/// Perception multiplier for the HUD owner: `1` dry, `0` at
/// [`OBSERVER_DEAF_SUBMERSION`] and deeper. No observer means no penalty.
pub fn observer_factor(observer: Option<&Player>) -> f32 {
    match observer {
        Some(p) => inverse_lerp(OBSERVER_DEAF_SUBMERSION, 0.0, p.submersion),
        None => 1.0,
    }
}

/// Apply a creature's own submersion to a strength or alpha: subtract
/// `0.8 * submersion` and clamp to `[0, 1]`.
pub fn submerge(value: f32, submersion: f32) -> f32 {
    clamp01((value - clamp01(submersion) * 0.8).min(1.0))
}

/// Distance from a screen-space point to the screen rectangle; `0` inside.
pub fn edge_distance(screen_pos: Vec2, screen: Vec2) -> f32 {
    screen_pos.distance(clamp_to_screen(screen_pos, screen))
}

pub fn clamp_to_screen(screen_pos: Vec2, screen: Vec2) -> Vec2 {
    screen_pos.clamp(Vec2::ZERO, screen.max(Vec2::ZERO))
}

/// Normalised detectability of a creature near a radar's far entrance.
///
/// Full strength within half the range, fading to zero at the range, then
/// scaled by visibility and reduced by submersion. Always in `[0, 1]`.
pub fn sense_strength(distance: f32, range: f32, visibility: f32, submersion: f32) -> f32 {
    let strength = inverse_lerp(range, range / 2.0, distance) * clamp01(visibility);
    submerge(strength, submersion)
}

// ---------------------------------------------------------------------------
// Visibility table
// ---------------------------------------------------------------------------

/// How a kind's visibility is derived from its concealment state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisibilityRule {
    Constant(f32),
    /// `1 - camouflage`, or `1` when the camouflage state is unavailable.
    Camouflage,
    /// `inverse_lerp(-1, 0, visibility_bonus)`.
    VisibilityBonus,
    /// `1 - mimic`.
    Mimic,
    /// `1 - ceiling_mode`.
    Ceiling,
}

impl VisibilityRule {
    fn apply(self, creature: &Creature) -> f32 {
        let stealth = &creature.stealth;
        let v = match self {
            VisibilityRule::Constant(v) => v,
            VisibilityRule::Camouflage => stealth.camouflage.map_or(1.0, |c| 1.0 - c),
            VisibilityRule::VisibilityBonus => inverse_lerp(-1.0, 0.0, stealth.visibility_bonus),
            VisibilityRule::Mimic => 1.0 - stealth.mimic,
            VisibilityRule::Ceiling => 1.0 - stealth.ceiling_mode,
        };
        clamp01(v)
    }
}

/// Kind → visibility rule, `1.0` for everything not listed.
#[derive(Debug, Clone)]
pub struct VisibilityTable {
    overrides: HashMap<CreatureKind, VisibilityRule>,
}

impl Default for VisibilityTable {
    fn default() -> Self {
        Self::empty()
            .with(CreatureKind::WhiteLizard, VisibilityRule::Camouflage)
            .with(CreatureKind::StowawayBug, VisibilityRule::VisibilityBonus)
            .with(CreatureKind::PoleMimic, VisibilityRule::Mimic)
            .with(CreatureKind::DropBug, VisibilityRule::Ceiling)
            .with(CreatureKind::Spider, VisibilityRule::Constant(0.0))
            .with(CreatureKind::TempleGuard, VisibilityRule::Constant(0.0))
    }
}

impl VisibilityTable {
    pub fn empty() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    pub fn with(mut self, kind: CreatureKind, rule: VisibilityRule) -> Self {
        self.overrides.insert(kind, rule);
        self
    }

    pub fn factor(&self, creature: &Creature) -> f32 {
        self.overrides
            .get(&creature.kind)
            .map_or(1.0, |rule| rule.apply(creature))
    }
}

// ---------------------------------------------------------------------------
// Audible table
// ---------------------------------------------------------------------------

/// Kind → multiplier on motion-triggered pulses, `1.0` by default.
#[derive(Debug, Clone)]
pub struct AudibleTable {
    overrides: HashMap<CreatureKind, f32>,
}

impl Default for AudibleTable {
    fn default() -> Self {
        Self::empty()
            .with(CreatureKind::Centipede, 2.0)
            .with(CreatureKind::Spider, 0.0)
            .with(CreatureKind::TempleGuard, 0.0)
    }
}

impl AudibleTable {
    pub fn empty() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    pub fn with(mut self, kind: CreatureKind, factor: f32) -> Self {
        self.overrides.insert(kind, factor);
        self
    }

    pub fn factor(&self, kind: &CreatureKind) -> f32 {
        self.overrides.get(kind).copied().unwrap_or(1.0)
    }
}

// ---------------------------------------------------------------------------
// Symbolic colour
// ---------------------------------------------------------------------------

/// Generic per-kind symbol colours, the last resort of [`ColorRules`].
#[derive(Debug, Clone)]
pub struct SymbolPalette {
    by_kind: HashMap<CreatureKind, Color>,
    fallback: Color,
}

impl Default for SymbolPalette {
    fn default() -> Self {
        let by_kind = [
            (CreatureKind::GreenLizard, Color::new(0.2, 1.0, 0.0, 1.0)),
            (CreatureKind::PinkLizard, Color::new(1.0, 0.0, 1.0, 1.0)),
            (CreatureKind::BlueLizard, Color::new(0.0, 0.5, 1.0, 1.0)),
            (CreatureKind::WhiteLizard, color::WHITE),
            (CreatureKind::Centipede, Color::new(1.0, 0.6, 0.0, 1.0)),
            (CreatureKind::RedCentipede, Color::new(1.0, 0.0, 0.0, 1.0)),
            (CreatureKind::Centiwing, Color::new(0.2, 1.0, 0.0, 1.0)),
            (CreatureKind::DaddyLongLegs, Color::new(0.0, 0.0, 1.0, 1.0)),
            (CreatureKind::BrotherLongLegs, Color::new(0.455, 0.525, 0.306, 1.0)),
            (CreatureKind::Vulture, Color::new(0.83, 0.79, 0.72, 1.0)),
            (CreatureKind::Scavenger, Color::new(0.7, 0.7, 0.7, 1.0)),
        ]
        .into_iter()
        .collect();
        Self {
            by_kind,
            fallback: Color::new(0.66, 0.66, 0.66, 1.0),
        }
    }
}

impl SymbolPalette {
    pub fn with(mut self, kind: CreatureKind, color: Color) -> Self {
        self.by_kind.insert(kind, color);
        self
    }

    pub fn color_of(&self, kind: &CreatureKind) -> Color {
        self.by_kind
            .get(kind)
            .or_else(|| self.by_kind.get(&kind.family()))
            .copied()
            .unwrap_or(self.fallback)
    }
}

/// A colour rule: `Some` when it applies to the creature.
pub type ColorRule = fn(&Creature) -> Option<Color>;

fn voided(c: &Creature) -> Option<Color> {
    c.status.voided.then_some(color::SATURATED_GOLD)
}

fn giant_centipede(c: &Creature) -> Option<Color> {
    (c.kind.family() == CreatureKind::Centipede && c.status.super_sized)
        .then(|| color::hsl(0.33, 0.5, 0.5))
}

fn slugcat_body(c: &Creature) -> Option<Color> {
    if c.kind != CreatureKind::Slugcat {
        return None;
    }
    let slot = c.status.player_number.unwrap_or(0) as usize;
    color::PLAYER_BODY.get(slot).copied()
}

fn blue_brother(c: &Creature) -> Option<Color> {
    (c.kind == CreatureKind::BrotherLongLegs && c.status.color_class).then_some(color::BLUE)
}

fn overseer_tint(c: &Creature) -> Option<Color> {
    if c.kind == CreatureKind::Overseer {
        c.status.main_color
    } else {
        None
    }
}

/// Priority-ordered colour rules; the first rule that answers wins, then
/// the palette.
#[derive(Clone)]
pub struct ColorRules {
    rules: Vec<ColorRule>,
    palette: SymbolPalette,
}

impl std::fmt::Debug for ColorRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorRules")
            .field("rules", &self.rules.len())
            .field("palette", &self.palette)
            .finish()
    }
}

impl Default for ColorRules {
    fn default() -> Self {
        Self {
            rules: vec![voided, giant_centipede, slugcat_body, blue_brother, overseer_tint],
            palette: SymbolPalette::default(),
        }
    }
}

impl ColorRules {
    pub fn new(rules: Vec<ColorRule>, palette: SymbolPalette) -> Self {
        Self { rules, palette }
    }

    /// Insert a rule ahead of all existing ones.
    pub fn prepend(&mut self, rule: ColorRule) {
        self.rules.insert(0, rule);
    }

    pub fn color_of(&self, creature: &Creature) -> Color {
        self.rules
            .iter()
            .find_map(|rule| rule(creature))
            .unwrap_or_else(|| self.palette.color_of(&creature.kind))
    }
}

// ---------------------------------------------------------------------------
// SenseModel
// ---------------------------------------------------------------------------

/// All species tables in one place; shared read-only by the indicators and
/// the radar.
#[derive(Debug, Clone, Default)]
pub struct SenseModel {
    pub visibility: VisibilityTable,
    pub audible: AudibleTable,
    pub colors: ColorRules,
}

impl SenseModel {
    pub fn visibility(&self, creature: &Creature) -> f32 {
        self.visibility.factor(creature)
    }

    pub fn audible(&self, creature: &Creature) -> f32 {
        self.audible.factor(&creature.kind)
    }

    pub fn symbol_color(&self, creature: &Creature) -> Color {
        self.colors.color_of(creature)
    }
}
