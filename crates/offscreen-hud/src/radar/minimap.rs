//! One radar per room exit.
//!
//! A [`ShortcutMinimap`] looks through its pipe into the neighbouring room.
//! It moves through three phases:
//!
//! - [`RadarPhase::Undiscovered`]: the far room holds no creatures and has
//!   never been linked; the radar idles without touching it.
//! - [`RadarPhase::Discovering`]: the far room is being realized, or its
//!   shortcut graph is not ready yet. The radar retries every tick.
//! - [`RadarPhase::Active`]: the far exit is resolved and creatures near it
//!   are tracked as blips.
//!
//! The far exit is resolved exactly once per minimap. If the far room is
//! later unloaded the radar drops back to `Discovering` but keeps its link,
//! so the arrow and blips are never rebuilt.
//!
//! Layout blends between an expanded form, where blips sit at their real
//! offsets from the far entrance scaled by `minimap_scale`, and a compact
//! form, where they orbit the pipe mouth. `warm_up` and `power` gate how
//! much of the radar is visible.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use offscreen_core::entity::EntityId;
use offscreen_core::interp::Buffered;
use offscreen_core::math::{
    aim_angle, clamp01, lerp, move_towards, random_in_circle, random_in_sphere,
    rotate_around_origin, smooth_step,
};
use offscreen_core::tracker::Tracker;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::color;
use crate::config::{IndicatorConfig, RadarMode};
use crate::draw::{DrawCommand, DrawList, Layer, SpriteStyle};
use crate::host::{Creature, HudHost, RoomId, RoomState, ShortcutKind};
use crate::radar::blip::{Blip, NearEntrance};
use crate::radar::hologram::{jitter_ease, HologramRing, Line};
use crate::sense::{self, SenseModel};
use crate::{TICKS_PER_SECOND, TILE_SIZE};

/// A controlled player this close to the pipe mouth counts as nearby.
pub const PLAYER_PROXIMITY: f32 = 60.0;

/// How far `compact` moves per tick in dynamic mode.
const COMPACT_STEP: f32 = 4.0 / 40.0;
/// Seconds for warm-up to rise from 0 to 1.
const WARM_UP_RISE: f32 = 1.0;
/// Seconds for warm-up to fall from 1 to 0.
const WARM_UP_FALL: f32 = 10.0;
/// Seconds for power to swing fully either way.
const POWER_SWING: f32 = 0.1;
const RING_SIDES: usize = 8;
/// Extra clearance, in tiles, when the radar flips to the far side.
const FLIP_CLEARANCE: f32 = 4.0;
/// Blips orbit at full radius once this far from the far entrance.
const ORBIT_FULL_DISTANCE: f32 = 4.0 * TILE_SIZE;

/// Arrow outline in tiles, pointing down before rotation.
const ARROW: [Vec2; 7] = [
    Vec2::new(1.5, 1.5),
    Vec2::new(0.5, 1.5),
    Vec2::new(0.5, 0.0),
    Vec2::new(0.0, -0.5),
    Vec2::new(-0.5, 0.0),
    Vec2::new(-0.5, 1.5),
    Vec2::new(-1.5, 1.5),
];

const ARROW_DEPTH: f32 = -10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadarPhase {
    Undiscovered,
    Discovering,
    Active,
}

/// Everything resolved once the far room's exit is known.
#[derive(Debug)]
struct FarLink {
    room: RoomId,
    /// World position of the far entrance tile centre.
    entrance: Vec2,
    /// Arrow outline, rotated to the far entrance direction, in tiles.
    outline: [Vec2; 7],
    arrow: Vec<Line>,
    blips: Tracker<EntityId, Blip>,
}

impl FarLink {
    /// Find the exit of `far` that leads back to `home`.
    fn resolve(far: &RoomState, home: RoomId) -> Option<Self> {
        let exit = far.exit_index(home)?;
        let shortcut = far.shortcut_leading_to_node(exit)?;
        let rotation = aim_angle(Vec2::ZERO, shortcut.entrance_dir.as_vec2());
        let outline = ARROW.map(|p| rotate_around_origin(p, rotation));
        let arrow = outline
            .windows(2)
            .map(|_| Line::new(Vec3::ZERO, Vec3::ZERO, 1.0))
            .collect();
        Some(Self {
            room: far.id,
            entrance: far.middle_of_tile(shortcut.start_tile),
            outline,
            arrow,
            blips: Tracker::new(),
        })
    }
}

#[derive(Debug)]
pub struct ShortcutMinimap {
    room: RoomId,
    index: usize,
    dest_node: usize,
    /// Centre of the near entrance tile.
    origin: Vec2,
    /// Unit direction the near entrance faces.
    hole: Vec2,
    hidden: bool,
    phase: RadarPhase,
    link: Option<FarLink>,
    player_nearby: bool,
    compact: Buffered<f32>,
    pos: Buffered<Vec2>,
    warm_up: Buffered<f32>,
    power: Buffered<f32>,
    active_time: f32,
    main_ring: HologramRing,
    echo_ring: HologramRing,
    tile_ring: HologramRing,
    rng: Pcg32,
    torn_down: bool,
}

impl ShortcutMinimap {
    /// A radar for shortcut `index` of `room`, or `None` if that shortcut
    /// does not lead to another room.
    pub fn new(room: &RoomState, index: usize, cfg: &IndicatorConfig) -> Option<Self> {
        let shortcut = room
            .shortcuts
            .get(index)
            .filter(|s| s.kind == ShortcutKind::RoomExit)?;
        let origin = room.middle_of_tile(shortcut.start_tile);
        let radius = cfg.radar_radius();
        let seed = (u64::from(room.id.0) << 32) | index as u64;

        Some(Self {
            room: room.id,
            index,
            dest_node: shortcut.dest_node,
            origin,
            hole: shortcut.entrance_dir.as_vec2(),
            hidden: room.is_hidden_exit(shortcut.start_tile),
            phase: RadarPhase::Undiscovered,
            link: None,
            player_nearby: false,
            compact: Buffered::new(0.0),
            pos: Buffered::new(origin),
            warm_up: Buffered::new(0.0),
            power: Buffered::new(0.0),
            active_time: 0.0,
            main_ring: HologramRing::new(Vec3::new(0.0, 0.0, -10.0), radius, 1.0, RING_SIDES),
            echo_ring: HologramRing::new(Vec3::new(0.0, 0.0, -5.0), radius, 0.75, RING_SIDES),
            tile_ring: HologramRing::new(Vec3::new(0.0, 0.0, -5.0), TILE_SIZE, 0.75, RING_SIDES),
            rng: Pcg32::seed_from_u64(seed),
            torn_down: false,
        })
    }

    /// Advance one tick. May ask the host to realize the far room.
    pub fn update<H: HudHost>(
        &mut self,
        host: &mut H,
        cfg: &IndicatorConfig,
        sense_model: &SenseModel,
        dt: f32,
    ) {
        let before = self.phase;
        if let Some(far) = self.refresh(&*host, cfg, sense_model, dt) {
            tracing::debug!(shortcut = self.index, room = ?far, "realizing far room");
            host.realize_room(far);
        }
        if self.phase != before {
            tracing::debug!(
                shortcut = self.index,
                from = ?before,
                to = ?self.phase,
                "radar phase changed"
            );
        }
    }

    /// The tick body; returns a room to realize instead of realizing it.
    fn refresh<H: HudHost>(
        &mut self,
        host: &H,
        cfg: &IndicatorConfig,
        sense_model: &SenseModel,
        dt: f32,
    ) -> Option<RoomId> {
        if self.torn_down {
            return None;
        }
        let room = host.room(self.room)?;

        self.player_nearby = host.players().iter().any(|p| {
            p.realized && p.controlled && p.pos.distance(self.origin) < PLAYER_PROXIMITY
        });
        let compact = match cfg.radar_mode {
            RadarMode::Minimal => 1.0,
            RadarMode::Expanded => 0.0,
            _ if room.shelter || (self.hidden && !self.player_nearby) => 0.0,
            _ => {
                let target = if self.player_nearby { 0.0 } else { 1.0 };
                move_towards(self.compact.current(), target, COMPACT_STEP)
            }
        };
        self.compact.push(compact);
        let cs = smooth_step(0.0, 1.0, compact);

        let radius = cfg.radar_radius();
        let mut offset = self.hole * -radius;
        if !host.is_point_in_view(self.origin + offset, radius) {
            offset = self.hole * (radius + FLIP_CLEARANCE * TILE_SIZE);
        }
        self.pos.push(self.origin + offset.lerp(self.hole * TILE_SIZE, cs));

        let far = match self.discover(host, room) {
            Ok(far) => far,
            Err(request) => {
                self.warm_up.hold();
                self.power.hold();
                return request;
            }
        };
        let link = self.link.as_mut()?;

        let origin = self.origin.extend(0.0);
        let scan = cfg.scan_range();
        link.blips.update(&mut NearEntrance {
            creatures: &far.creatures,
            entrance: link.entrance,
            range: scan,
            origin,
            sense: sense_model,
        });

        let lit = (!self.hidden || self.player_nearby) && !link.blips.is_empty();
        let (warm_target, warm_rate) = if lit {
            (1.0, dt / WARM_UP_RISE)
        } else {
            (0.0, dt / WARM_UP_FALL)
        };
        self.warm_up.step(|w| move_towards(w, warm_target, warm_rate));
        self.power
            .step(|p| move_towards(p, if lit { 1.0 } else { 0.0 }, dt / POWER_SWING));
        let warm_up = self.warm_up.current();
        let power = self.power.current();

        // Blips.
        let by_id: HashMap<EntityId, &Creature> =
            far.creatures.iter().map(|c| (c.id, c)).collect();
        let readings: Vec<(f32, f32)> = link
            .blips
            .keys()
            .map(|id| {
                by_id.get(id).map_or((0.0, 0.0), |c| {
                    let dist = c.pos.distance(link.entrance);
                    let range = sense::sense_range(scan, 0.0, c.submersion);
                    let strength = sense::sense_strength(
                        dist,
                        range,
                        sense_model.visibility(c),
                        c.submersion,
                    );
                    (strength, dist)
                })
            })
            .collect();
        let net_sense: f32 = readings.iter().map(|(s, _)| s).sum();
        self.active_time += 1.0 / TICKS_PER_SECOND / link.blips.len().max(1) as f32;

        let center = self.pos.current().extend(0.0);
        let mut sense_pos = 0.0;
        for ((id, blip), &(strength, dist)) in link.blips.iter_mut().zip(&readings) {
            let Some(c) = by_id.get(id) else {
                continue;
            };
            let faint = 1.0 - strength;
            let mut tracked = ((c.pos - link.entrance) * cfg.minimap_scale).extend(0.0);
            tracked += random_in_sphere(&mut self.rng) * 10.0 * faint
                + Vec3::new(0.0, 0.0, faint * -10.0 - 10.0);
            tracked += (random_in_circle(&mut self.rng) * (1.0 - power) * 5.0).extend(0.0);

            let slot = if net_sense > 0.0 {
                clamp01(sense_pos / net_sense)
            } else {
                0.0
            };
            let angle = slot * TAU + self.active_time;
            let orbit_radius = 15.0 * (2.0 - strength) * (dist / ORBIT_FULL_DISTANCE).min(1.0);
            let orbit = Vec3::new(angle.cos() * orbit_radius, angle.sin() * orbit_radius, -10.0);

            let target = tracked.lerp(orbit, cs) + center;
            let ease = jitter_ease(&mut self.rng, power);
            blip.push(origin.lerp(target, ease), strength * power * warm_up);
            sense_pos += strength;
        }

        // Geometry.
        let scale = TILE_SIZE * cfg.minimap_scale;
        for (line, ends) in link.arrow.iter_mut().zip(link.outline.windows(2)) {
            line.start = (ends[0] * scale).extend(ARROW_DEPTH);
            line.end = (ends[1] * scale).extend(ARROW_DEPTH);
            line.alpha = 1.0 - cs;
            line.update(&mut self.rng, center, origin, power, warm_up);
        }

        self.main_ring.radius = lerp(radius, TILE_SIZE, cs);
        self.echo_ring.radius = radius;
        self.echo_ring.alpha = (1.0 - cs * 8.0).max(0.0) * 0.75;
        self.tile_ring.alpha = (1.0 - cs).max(0.0) * 0.75;
        for ring in [&mut self.main_ring, &mut self.echo_ring, &mut self.tile_ring] {
            ring.update(&mut self.rng, center, origin, power, warm_up);
        }

        None
    }

    /// Walk the discovery state machine. `Ok` carries the realized far
    /// room; `Err` carries an optional realization request and means wait.
    fn discover<'h, H: HudHost>(
        &mut self,
        host: &'h H,
        room: &RoomState,
    ) -> Result<&'h RoomState, Option<RoomId>> {
        let far = room
            .connection(self.dest_node)
            .and_then(|id| host.abstract_room(id));

        if self.link.is_none() && far.map_or(true, |a| a.creature_count == 0) {
            self.phase = RadarPhase::Undiscovered;
            return Err(None);
        }
        let Some(far) = far else {
            self.phase = RadarPhase::Discovering;
            return Err(None);
        };
        if !far.realized {
            self.phase = RadarPhase::Discovering;
            return Err(Some(far.id));
        }
        let Some(far_room) = host.room(far.id).filter(|r| r.shortcuts_ready) else {
            self.phase = RadarPhase::Discovering;
            return Err(None);
        };

        if self.link.is_none() {
            match FarLink::resolve(far_room, self.room) {
                Some(link) => {
                    tracing::debug!(
                        shortcut = self.index,
                        room = ?far_room.id,
                        "shortcut linked to far exit"
                    );
                    self.link = Some(link);
                }
                None => {
                    self.phase = RadarPhase::Discovering;
                    return Err(None);
                }
            }
        }

        self.phase = RadarPhase::Active;
        Ok(far_room)
    }

    /// Emit rings, arrow, blips and glow for `time_stacker`.
    pub fn draw<H: HudHost>(
        &self,
        host: &H,
        cfg: &IndicatorConfig,
        time_stacker: f32,
        out: &mut DrawList,
    ) {
        if self.torn_down {
            return;
        }
        let warm_up = self.warm_up.at(time_stacker);
        let power = self.power.at(time_stacker);
        let cs = smooth_step(0.0, 1.0, self.compact.at(time_stacker));

        let glow_alpha = warm_up * power * 0.1;
        if glow_alpha > 0.0 {
            let at = self.origin.lerp(self.pos.at(time_stacker), power * power);
            let spread = 3.0 * cfg.scan_tile_range as f32 * cfg.minimap_scale;
            out.push(DrawCommand::Sprite {
                layer: Layer::Bloom,
                style: SpriteStyle::Glow,
                pos: host.apply_depth(at.extend(-5.0)) - host.camera_pos(),
                scale: Vec2::splat(lerp(3.0, lerp(spread, 5.0, cs), power)),
                rotation: 0.0,
                color: color::WHITE,
                alpha: glow_alpha,
            });
        }

        let tint = host.entrance_color(self.index);
        if let Some(link) = &self.link {
            for line in &link.arrow {
                line.draw(host, tint, time_stacker, out);
            }
        }
        for ring in [&self.main_ring, &self.echo_ring, &self.tile_ring] {
            ring.draw(host, tint, time_stacker, out);
        }
        if let Some(link) = &self.link {
            for blip in link.blips.values() {
                blip.draw(host, cfg.minimap_scale, time_stacker, out);
            }
        }
    }

    /// Release every blip and stop updating. Returns how many blips were
    /// released; a second call releases nothing.
    pub fn teardown(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        self.torn_down = true;
        let released = self
            .link
            .as_mut()
            .map_or(0, |link| link.blips.cleanup(|_, _| {}));
        tracing::debug!(shortcut = self.index, released, "minimap torn down");
        released
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn room(&self) -> RoomId {
        self.room
    }

    pub fn phase(&self) -> RadarPhase {
        self.phase
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn far_room(&self) -> Option<RoomId> {
        self.link.as_ref().map(|l| l.room)
    }

    pub fn far_entrance(&self) -> Option<Vec2> {
        self.link.as_ref().map(|l| l.entrance)
    }

    pub fn player_nearby(&self) -> bool {
        self.player_nearby
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn pos(&self) -> Vec2 {
        self.pos.current()
    }

    pub fn compact(&self) -> f32 {
        self.compact.current()
    }

    pub fn warm_up(&self) -> f32 {
        self.warm_up.current()
    }

    pub fn power(&self) -> f32 {
        self.power.current()
    }

    pub fn active_time(&self) -> f32 {
        self.active_time
    }

    pub fn blip_count(&self) -> usize {
        self.link.as_ref().map_or(0, |l| l.blips.len())
    }

    pub fn blip(&self, creature: EntityId) -> Option<&Blip> {
        self.link.as_ref().and_then(|l| l.blips.get(&creature))
    }

    pub fn blips(&self) -> impl Iterator<Item = (&EntityId, &Blip)> {
        self.link.iter().flat_map(|l| l.blips.iter())
    }

    /// Lifetime `(created, destroyed)` blip totals.
    pub fn blip_totals(&self) -> (u64, u64) {
        self.link.as_ref().map_or((0, 0), |l| l.blips.totals())
    }
}
