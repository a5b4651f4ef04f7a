//! The host game as the overlay sees it.
//!
//! The overlay reads the host through [`HudHost`] and the plain records
//! below. The host fills them from its own entity, room and camera model;
//! the overlay never keeps references into them across ticks, only
//! [`EntityId`]s and [`RoomId`]s.
//!
//! # Read vs. write
//!
//! Everything is read-only except [`HudHost::realize_room`], the one request
//! the radar makes of the world graph.

use glam::{IVec2, Vec2, Vec3};
use offscreen_core::entity::EntityId;
use serde::{Deserialize, Serialize};

use crate::color::{Color, WHITE};
use crate::TILE_SIZE;

// ---------------------------------------------------------------------------
// Identities and kinds
// ---------------------------------------------------------------------------

/// Index of a room in the host's world graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

/// Species tag of a creature.
///
/// Known kinds get explicit variants; anything else the host reports goes
/// into [`CreatureKind::Other`] and falls through to table defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CreatureKind {
    Slugcat,
    GreenLizard,
    PinkLizard,
    BlueLizard,
    WhiteLizard,
    StowawayBug,
    PoleMimic,
    DropBug,
    Spider,
    BigSpider,
    TempleGuard,
    Centipede,
    SmallCentipede,
    RedCentipede,
    Centiwing,
    AquaCenti,
    DaddyLongLegs,
    BrotherLongLegs,
    Overseer,
    Vulture,
    Scavenger,
    Other(String),
}

impl CreatureKind {
    /// The root of this kind's breeding line; all centipedes share one.
    pub fn family(&self) -> CreatureKind {
        match self {
            CreatureKind::SmallCentipede
            | CreatureKind::RedCentipede
            | CreatureKind::Centiwing
            | CreatureKind::AquaCenti => CreatureKind::Centipede,
            CreatureKind::PinkLizard
            | CreatureKind::BlueLizard
            | CreatureKind::WhiteLizard => CreatureKind::GreenLizard,
            CreatureKind::BrotherLongLegs => CreatureKind::DaddyLongLegs,
            other => other.clone(),
        }
    }
}

/// Item kinds the weapon warning cares about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    Spear,
    ExplosiveSpear,
    Rock,
    FlareBomb,
    SporePlant,
    PuffBall,
    ScavengerBomb,
    SingularityBomb,
    FirecrackerPlant,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponMode {
    #[default]
    Free,
    Carried,
    Thrown,
    StuckInWall,
}

// ---------------------------------------------------------------------------
// Creature
// ---------------------------------------------------------------------------

/// Species-specific concealment state read by the visibility table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stealth {
    /// Lizard skin camouflage in `[0, 1]`; `None` when graphics are not loaded.
    pub camouflage: Option<f32>,
    /// Host visibility bonus, `-1` (invisible) to `0` (normal).
    pub visibility_bonus: f32,
    /// How far a pole mimic has blended into a pole.
    pub mimic: f32,
    /// How far a drop bug has retreated into the ceiling.
    pub ceiling_mode: f32,
}

/// Flags the symbolic colour rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SymbolStatus {
    pub voided: bool,
    pub super_sized: bool,
    /// Slugcat player slot, for body colour.
    pub player_number: Option<u8>,
    /// Alternate colour class (blue brother long legs).
    pub color_class: bool,
    /// Graphics-driven main colour, when the creature has one (overseers).
    pub main_color: Option<Color>,
}

/// One creature in a room, abstract or realized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: EntityId,
    pub kind: CreatureKind,
    /// Main body chunk position this tick and last tick.
    pub pos: Vec2,
    pub last_pos: Vec2,
    /// Whether the creature has a physical body right now.
    pub realized: bool,
    pub dead: bool,
    pub in_shortcut: bool,
    /// How deep under water, `0` dry to `1` fully submerged.
    pub submersion: f32,
    pub small: bool,
    pub stealth: Stealth,
    pub status: SymbolStatus,
}

impl Creature {
    /// Realized, alive and not travelling through a pipe.
    pub fn is_physically_present(&self) -> bool {
        self.realized && !self.dead && !self.in_shortcut
    }

    pub fn pos_at(&self, time_stacker: f32) -> Vec2 {
        self.last_pos.lerp(self.pos, time_stacker.clamp(0.0, 1.0))
    }

    /// Distance moved since the previous tick.
    pub fn step_distance(&self) -> f32 {
        self.pos.distance(self.last_pos)
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: EntityId,
    pub kind: ItemKind,
    /// Whether this item is realized as a weapon object.
    pub weapon: bool,
    pub pos: Vec2,
    pub last_pos: Vec2,
    pub mode: WeaponMode,
    /// Lit fuse on bombs and explosive spears.
    pub ignited: bool,
    /// Unit direction of the last throw.
    pub throw_dir: IVec2,
    pub submersion: f32,
}

impl Item {
    pub fn pos_at(&self, time_stacker: f32) -> Vec2 {
        self.last_pos.lerp(self.pos, time_stacker.clamp(0.0, 1.0))
    }
}

// ---------------------------------------------------------------------------
// Rooms and shortcuts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShortcutKind {
    /// Leads to another room; the only kind that gets a radar.
    RoomExit,
    Normal,
    Den,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortcut {
    pub kind: ShortcutKind,
    pub start_tile: IVec2,
    /// Index into [`RoomState::connections`].
    pub dest_node: usize,
    /// Unit direction the entrance hole faces, into the room.
    pub entrance_dir: IVec2,
}

/// A realized room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomState {
    pub id: RoomId,
    pub shelter: bool,
    /// Whether the room's shortcut graph is built and can be queried.
    pub shortcuts_ready: bool,
    pub creatures: Vec<Creature>,
    pub items: Vec<Item>,
    pub shortcuts: Vec<Shortcut>,
    /// Neighbouring room per exit node; `None` for dead ends.
    pub connections: Vec<Option<RoomId>>,
    /// Tiles carrying an active hidden-exit marker.
    pub hidden_exits: Vec<IVec2>,
}

impl RoomState {
    pub fn middle_of_tile(&self, tile: IVec2) -> Vec2 {
        tile.as_vec2() * TILE_SIZE + Vec2::splat(TILE_SIZE / 2.0)
    }

    pub fn tile_of(&self, pos: Vec2) -> IVec2 {
        (pos / TILE_SIZE).floor().as_ivec2()
    }

    pub fn connection(&self, node: usize) -> Option<RoomId> {
        self.connections.get(node).copied().flatten()
    }

    /// Exit node of this room that leads to `other`.
    pub fn exit_index(&self, other: RoomId) -> Option<usize> {
        self.connections.iter().position(|c| *c == Some(other))
    }

    pub fn shortcut_leading_to_node(&self, node: usize) -> Option<&Shortcut> {
        self.shortcuts
            .iter()
            .find(|s| s.kind == ShortcutKind::RoomExit && s.dest_node == node)
    }

    pub fn is_hidden_exit(&self, tile: IVec2) -> bool {
        self.hidden_exits.contains(&tile)
    }
}

/// What the world graph knows about a room that may not be realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractRoom {
    pub id: RoomId,
    pub creature_count: usize,
    pub realized: bool,
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub realized: bool,
    /// Has an input controller attached.
    pub controlled: bool,
    pub submersion: f32,
}

// ---------------------------------------------------------------------------
// HudHost
// ---------------------------------------------------------------------------

/// Narrow interface to the host game.
pub trait HudHost {
    /// Screen size in world units.
    fn screen_size(&self) -> Vec2;

    /// World position of the camera's bottom-left corner.
    fn camera_pos(&self) -> Vec2;

    /// The room the camera is in, if it is realized.
    fn camera_room(&self) -> Option<&RoomState>;

    /// A realized room. `None` for unknown or unrealized rooms.
    fn room(&self, id: RoomId) -> Option<&RoomState>;

    fn abstract_room(&self, id: RoomId) -> Option<AbstractRoom>;

    /// Ask the host to realize a room. It may take several ticks before
    /// [`room`](Self::room) returns it with a ready shortcut graph.
    fn realize_room(&mut self, id: RoomId);

    /// Ambient darkness at a point, `0` lit to `1` pitch black.
    fn darkness(&self, room: RoomId, pos: Vec2) -> f32;

    /// The player that owns this HUD, if any.
    fn observer(&self) -> Option<Player>;

    fn players(&self) -> Vec<Player>;

    /// Tint of the host's entrance sprite for a shortcut of the camera room.
    fn entrance_color(&self, _shortcut_index: usize) -> Color {
        WHITE
    }

    /// Depth-aware projection to world space. Negative `z` recedes toward
    /// the centre of the screen.
    fn apply_depth(&self, pos: Vec3) -> Vec2 {
        let vanishing = self.camera_pos() + self.screen_size() / 2.0;
        let scale = 1.0 + 0.0025 * pos.z;
        vanishing + (pos.truncate() - vanishing) * scale
    }

    /// Whether a world point is on screen, `margin` units inside the edges.
    fn is_point_in_view(&self, pos: Vec2, margin: f32) -> bool {
        let p = pos - self.camera_pos();
        let screen = self.screen_size();
        p.x > margin && p.y > margin && p.x < screen.x - margin && p.y < screen.y - margin
    }
}
