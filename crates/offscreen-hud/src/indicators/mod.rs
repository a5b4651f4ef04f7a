//! Off-screen creature and weapon indicators.
//!
//! Exactly one creature presentation is active at a time, chosen by
//! [`DisplayMode`]: [`pulse`] rings emitted from the update pass, or
//! [`icons`] rebuilt every draw. Weapon [`weapon`] warnings are an
//! independent layer toggled by `show_thrown_items`.
//!
//! Pulse countdowns and weapon glows are per-entity state owned by two
//! [`Tracker`]s. Icons keep no state between frames.

pub mod icons;
pub mod pulse;
pub mod weapon;

use std::collections::{HashMap, VecDeque};

use offscreen_core::entity::EntityId;
use offscreen_core::tracker::Tracker;

use crate::config::{DisplayMode, IndicatorConfig};
use crate::draw::DrawList;
use crate::host::{Creature, HudHost, Item};
use crate::sense::{self, SenseModel};

use self::pulse::{OffscreenCreatures, Pulse, PulseContext, PulseState};
use self::weapon::{OffscreenWeapons, WeaponWarning};

/// Undrained pulses kept before the oldest are discarded.
pub const MAX_PENDING_PULSES: usize = 256;

#[derive(Debug, Default)]
pub struct OffscreenIndicators {
    pulses: Tracker<EntityId, PulseState>,
    weapons: Tracker<EntityId, WeaponWarning>,
    /// Pulses emitted since the host last drained them, oldest first.
    emitted: VecDeque<Pulse>,
    discarded: u64,
}

impl OffscreenIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed-rate pass: reconcile both trackers against the camera room and
    /// advance pulse countdowns and weapon glows by `dt` seconds.
    pub fn update<H: HudHost>(
        &mut self,
        host: &H,
        cfg: &IndicatorConfig,
        sense_model: &SenseModel,
        dt: f32,
    ) {
        if cfg.offscreen_display != DisplayMode::Pulse && !self.pulses.is_empty() {
            let dropped = self.pulses.clear(|_, _| {});
            tracing::debug!(dropped, "pulse mode off, pulse trackers cleared");
        }
        if !cfg.show_thrown_items && !self.weapons.is_empty() {
            let dropped = self.weapons.clear(|_, _| {});
            tracing::debug!(dropped, "weapon warnings off, trackers cleared");
        }

        let Some(room) = host.camera_room() else {
            return;
        };
        let observer = sense::observer_factor(host.observer().as_ref());

        if cfg.offscreen_display == DisplayMode::Pulse {
            self.pulses.update(&mut OffscreenCreatures {
                host,
                creatures: &room.creatures,
            });
            let ctx = PulseContext {
                host,
                room: room.id,
                sense: sense_model,
                observer,
                dt,
            };
            let by_id: HashMap<EntityId, &Creature> =
                room.creatures.iter().map(|c| (c.id, c)).collect();
            let mut fresh = Vec::new();
            for (id, state) in self.pulses.iter_mut() {
                let Some(creature) = by_id.get(id) else {
                    continue;
                };
                if let Some(pulse) = ctx.tick(state, creature) {
                    fresh.push(pulse);
                }
            }
            for pulse in fresh {
                self.queue_pulse(pulse);
            }
        }

        if cfg.show_thrown_items {
            self.weapons.update(&mut OffscreenWeapons {
                host,
                items: &room.items,
            });
            let by_id = items_by_id(&room.items);
            for (id, warning) in self.weapons.iter_mut() {
                if let Some(item) = by_id.get(id) {
                    warning.update(item, dt);
                }
            }
        }
    }

    /// Variable-rate pass: icons and weapon glows for `time_stacker`.
    pub fn draw<H: HudHost>(
        &self,
        host: &H,
        cfg: &IndicatorConfig,
        sense_model: &SenseModel,
        time_stacker: f32,
        out: &mut DrawList,
    ) {
        let Some(room) = host.camera_room() else {
            return;
        };

        if cfg.offscreen_display == DisplayMode::Icon {
            let observer = sense::observer_factor(host.observer().as_ref());
            icons::draw_icons(
                host,
                room.id,
                &room.creatures,
                sense_model,
                observer,
                time_stacker,
                out,
            );
        }

        if cfg.show_thrown_items {
            let by_id = items_by_id(&room.items);
            for (id, warning) in self.weapons.iter() {
                if let Some(item) = by_id.get(id) {
                    warning.draw(host, room.id, item, time_stacker, out);
                }
            }
        }
    }

    fn queue_pulse(&mut self, pulse: Pulse) {
        if self.emitted.len() == MAX_PENDING_PULSES {
            self.emitted.pop_front();
            self.discarded += 1;
            tracing::trace!(discarded = self.discarded, "pulse queue full, oldest dropped");
        }
        self.emitted.push_back(pulse);
    }

    /// Hand over every pulse emitted since the last call, oldest first.
    ///
    /// At most [`MAX_PENDING_PULSES`] are held between drains; a host that
    /// skips draining loses the oldest.
    pub fn drain_pulses(&mut self) -> Vec<Pulse> {
        self.emitted.drain(..).collect()
    }

    pub fn pending_pulses(&self) -> usize {
        self.emitted.len()
    }

    /// Pulses dropped unseen because the queue was full.
    pub fn discarded_pulses(&self) -> u64 {
        self.discarded
    }

    pub fn pulse_state(&self, creature: EntityId) -> Option<&PulseState> {
        self.pulses.get(&creature)
    }

    pub fn pulse_count(&self) -> usize {
        self.pulses.len()
    }

    pub fn weapon_warning(&self, item: EntityId) -> Option<&WeaponWarning> {
        self.weapons.get(&item)
    }

    pub fn weapon_count(&self) -> usize {
        self.weapons.len()
    }
}

fn items_by_id(items: &[Item]) -> HashMap<EntityId, &Item> {
    items.iter().map(|i| (i.id, i)).collect()
}
