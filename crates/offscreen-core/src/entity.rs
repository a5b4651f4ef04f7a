//! Entity handles shared between the host game and the overlay.
//!
//! The overlay never owns creatures or items. It only remembers *which* ones
//! it has built visual state for, keyed by an [`EntityId`]: a 64-bit handle
//! with a *generation* in the high 32 bits and a slot *index* in the low 32
//! bits. When the host recycles a slot the generation moves on, so a handle
//! kept across frames can never alias a different creature.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ---------------------------------------------------------------------------
// EntityId
// ---------------------------------------------------------------------------

/// A generational entity handle, stable across frames and compared by value.
///
/// Layout: `[generation: u32 | index: u32]`. Ordering follows the raw value,
/// which keeps tracker iteration deterministic.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Build a handle from a slot index and generation.
    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self(u64::from(generation) << 32 | u64::from(index))
    }

    /// Slot index (low 32 bits).
    #[inline]
    pub fn index(self) -> u32 {
        self.0 as u32
    }

    /// Generation (high 32 bits).
    #[inline]
    pub fn generation(self) -> u32 {
        self.0.wrapping_shr(32) as u32
    }

    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityId")
            .field(&format_args!("{self}"))
            .finish()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

// ---------------------------------------------------------------------------
// EntityAllocator
// ---------------------------------------------------------------------------

/// Hands out [`EntityId`]s for hosts that do not have stable identities of
/// their own (the sandbox host, tests, benchmarks).
///
/// Freed slots are recycled oldest first, one generation later.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    slots: Vec<Slot>,
    recycled: VecDeque<u32>,
    live: usize,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u32,
    occupied: bool,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> EntityId {
        self.live += 1;
        match self.recycled.pop_front() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.occupied = true;
                EntityId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    occupied: true,
                });
                EntityId::new(self.slots.len() as u32 - 1, 0)
            }
        }
    }

    /// Release a handle. Returns `false` for stale or already-freed handles.
    pub fn free(&mut self, id: EntityId) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        slot.occupied = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.recycled.push_back(id.index());
        self.live -= 1;
        true
    }

    /// Whether `id` is occupied and its generation is current.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.slots
            .get(id.index() as usize)
            .is_some_and(|s| s.occupied && s.generation == id.generation())
    }

    pub fn alive_count(&self) -> usize {
        self.live
    }

    fn slot_mut(&mut self, id: EntityId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|s| s.occupied && s.generation == id.generation())
    }
}
