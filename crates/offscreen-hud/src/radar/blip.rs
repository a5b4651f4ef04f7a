//! One creature on a radar.

use glam::{Vec2, Vec3};
use offscreen_core::entity::EntityId;
use offscreen_core::interp::Buffered;
use offscreen_core::tracker::TrackPolicy;

use crate::color::{self, Color};
use crate::draw::{DrawCommand, DrawList, Layer, SpriteStyle};
use crate::host::{Creature, CreatureKind, HudHost};
use crate::sense::SenseModel;

/// Depth of the floor the blip stalks rise from.
const STALK_DEPTH: f32 = -5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Blip {
    pub kind: CreatureKind,
    pub color: Color,
    pos: Buffered<Vec3>,
    alpha: Buffered<f32>,
}

impl Blip {
    /// A dark blip waiting at `origin`.
    pub fn new(kind: CreatureKind, color: Color, origin: Vec3) -> Self {
        Self {
            kind,
            color,
            pos: Buffered::new(origin),
            alpha: Buffered::new(0.0),
        }
    }

    pub fn push(&mut self, pos: Vec3, alpha: f32) {
        self.pos.push(pos);
        self.alpha.push(alpha);
    }

    pub fn pos(&self) -> Vec3 {
        self.pos.current()
    }

    pub fn alpha(&self) -> f32 {
        self.alpha.current()
    }

    /// Stalk, glow and dot, in back-to-front order.
    pub fn draw<H: HudHost>(
        &self,
        host: &H,
        minimap_scale: f32,
        time_stacker: f32,
        out: &mut DrawList,
    ) {
        let alpha = self.alpha.at(time_stacker);
        if alpha == 0.0 {
            return;
        }
        let camera = host.camera_pos();
        let pos = self.pos.at(time_stacker);
        let screen_pos = host.apply_depth(pos) - camera;
        let root = host.apply_depth(pos.truncate().extend(STALK_DEPTH)) - camera;

        out.push(DrawCommand::Line {
            layer: Layer::Bloom,
            from: root,
            to: screen_pos,
            color: color::GRAY,
            alpha,
        });
        out.push(DrawCommand::Sprite {
            layer: Layer::Bloom,
            style: SpriteStyle::Glow,
            pos: screen_pos,
            scale: Vec2::splat((0.5 + 0.5 * alpha) * 10.0 * minimap_scale),
            rotation: 0.0,
            color: self.color,
            alpha: alpha * 0.25,
        });
        out.push(DrawCommand::Sprite {
            layer: Layer::Bloom,
            style: SpriteStyle::HologramDot,
            pos: screen_pos,
            scale: Vec2::splat(15.0 * minimap_scale),
            rotation: 0.0,
            color: self.color,
            alpha,
        });
    }
}

/// Live creatures of the far room within scan range of its entrance.
pub(crate) struct NearEntrance<'a> {
    pub creatures: &'a [Creature],
    pub entrance: Vec2,
    pub range: f32,
    /// Where new blips start: the near shortcut.
    pub origin: Vec3,
    pub sense: &'a SenseModel,
}

impl<'a> TrackPolicy<EntityId, Blip> for NearEntrance<'a> {
    type Candidate = &'a Creature;

    fn candidates(&mut self) -> Vec<&'a Creature> {
        self.creatures.iter().collect()
    }

    fn key(&self, c: &&'a Creature) -> EntityId {
        c.id
    }

    fn exists(&mut self, c: &&'a Creature) -> bool {
        c.is_physically_present() && c.pos.distance(self.entrance) < self.range
    }

    fn create(&mut self, c: &&'a Creature) -> Blip {
        Blip::new(c.kind.clone(), self.sense.symbol_color(c), self.origin)
    }
}
