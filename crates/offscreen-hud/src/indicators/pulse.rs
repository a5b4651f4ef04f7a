//! Pulse mode: off-screen creatures periodically emit a fading ring at the
//! screen edge nearest to them.

use glam::Vec2;
use offscreen_core::entity::EntityId;
use offscreen_core::math::{inverse_lerp, lerp};
use offscreen_core::tracker::TrackPolicy;
use serde::{Deserialize, Serialize};

use crate::host::{Creature, HudHost, RoomId};
use crate::sense::{self, SenseModel};

/// Countdown units restored after each emission.
pub const PULSE_INTERVAL: f32 = 100.0;

/// Natural decay is `dt / PULSE_NATURAL_PERIOD` per tick at full visibility.
pub const PULSE_NATURAL_PERIOD: f32 = 4.0;

/// A fade circle the host should spawn in its HUD container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub creature: EntityId,
    /// Screen position, clamped to the screen rectangle.
    pub pos: Vec2,
    pub radius: f32,
    /// Expansion speed; faster for creatures just past the edge.
    pub speed: f32,
    pub alpha: f32,
    /// Ticks until the ring has faded out.
    pub lifetime: f32,
    pub thickness: f32,
}

/// Per-creature pulse countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PulseState {
    progression: f32,
    emitted: u32,
}

impl PulseState {
    pub fn progression(&self) -> f32 {
        self.progression
    }

    /// Pulses emitted since the creature went off-screen.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }

    /// Count down by `decay` and report whether a pulse is due.
    ///
    /// A due pulse restores exactly [`PULSE_INTERVAL`]. The countdown is not
    /// capped, so a creature that was quiet for a while can owe another
    /// pulse soon after.
    pub fn advance(&mut self, decay: f32) -> bool {
        self.progression -= decay;
        if self.progression < 0.0 {
            self.progression += PULSE_INTERVAL;
            self.emitted += 1;
            true
        } else {
            false
        }
    }
}

/// Creatures in the camera room that are alive, realized and off-screen.
pub(crate) struct OffscreenCreatures<'a, H> {
    pub host: &'a H,
    pub creatures: &'a [Creature],
}

impl<'a, H: HudHost> TrackPolicy<EntityId, PulseState> for OffscreenCreatures<'a, H> {
    type Candidate = &'a Creature;

    fn candidates(&mut self) -> Vec<&'a Creature> {
        self.creatures.iter().collect()
    }

    fn key(&self, c: &&'a Creature) -> EntityId {
        c.id
    }

    fn exists(&mut self, c: &&'a Creature) -> bool {
        c.is_physically_present() && !self.host.is_point_in_view(c.pos, 0.0)
    }

    fn create(&mut self, _c: &&'a Creature) -> PulseState {
        PulseState::default()
    }
}

/// Inputs one pulse tick needs besides the creature.
pub(crate) struct PulseContext<'a, H> {
    pub host: &'a H,
    pub room: RoomId,
    pub sense: &'a SenseModel,
    pub observer: f32,
    pub dt: f32,
}

impl<'a, H: HudHost> PulseContext<'a, H> {
    /// Tick one creature's countdown, returning the pulse it emits if any.
    pub fn tick(&self, state: &mut PulseState, creature: &Creature) -> Option<Pulse> {
        let natural = self.dt / PULSE_NATURAL_PERIOD * self.sense.visibility(creature);
        let step = creature.step_distance() * self.sense.audible(creature);
        if !state.advance((natural + step) * self.observer) {
            return None;
        }

        let screen = self.host.screen_size();
        let screen_pos = creature.pos - self.host.camera_pos();
        let range = sense::sense_range(
            screen.x,
            self.host.darkness(self.room, creature.pos),
            creature.submersion,
        );
        let edge = sense::edge_distance(screen_pos, screen);

        Some(Pulse {
            creature: creature.id,
            pos: sense::clamp_to_screen(screen_pos, screen),
            radius: if creature.small { 10.0 } else { 20.0 },
            speed: lerp(1.0, 5.0, inverse_lerp(range, 0.0, edge)) * self.observer,
            alpha: 0.8,
            lifetime: 20.0,
            thickness: 4.0,
        })
    }
}
