//! In-memory [`HudHost`] for tests, benchmarks and the headless demo.
//!
//! Rooms, creatures, items and players are plain records the caller edits
//! directly. Ids come from an [`EntityAllocator`], so despawned creatures
//! never alias new ones.

use std::collections::{BTreeMap, BTreeSet};

use glam::{IVec2, Vec2};
use offscreen_core::entity::{EntityAllocator, EntityId};

use crate::color::{Color, WHITE};
use crate::host::{
    AbstractRoom, Creature, CreatureKind, HudHost, Item, ItemKind, Player, RoomId, RoomState,
    Shortcut, ShortcutKind, Stealth, SymbolStatus, WeaponMode,
};

/// One end of a room-to-room pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    pub room: RoomId,
    pub tile: IVec2,
    /// Direction the entrance hole faces, into the room.
    pub dir: IVec2,
}

#[derive(Debug)]
pub struct SandboxHost {
    screen: Vec2,
    camera: Vec2,
    camera_room: Option<RoomId>,
    rooms: BTreeMap<RoomId, RoomState>,
    realized: BTreeSet<RoomId>,
    darkness: BTreeMap<RoomId, f32>,
    players: Vec<Player>,
    observer: Option<usize>,
    entrance_colors: BTreeMap<usize, Color>,
    ids: EntityAllocator,
    realize_requests: Vec<RoomId>,
    /// Whether [`HudHost::realize_room`] takes effect immediately.
    auto_realize: bool,
}

impl SandboxHost {
    pub fn new(screen: Vec2) -> Self {
        Self {
            screen,
            camera: Vec2::ZERO,
            camera_room: None,
            rooms: BTreeMap::new(),
            realized: BTreeSet::new(),
            darkness: BTreeMap::new(),
            players: Vec::new(),
            observer: None,
            entrance_colors: BTreeMap::new(),
            ids: EntityAllocator::new(),
            realize_requests: Vec::new(),
            auto_realize: true,
        }
    }

    // -- rooms --------------------------------------------------------------

    /// Add an empty room with a ready shortcut graph, replacing any room
    /// with the same id.
    pub fn add_room(&mut self, id: RoomId, realized: bool) -> &mut RoomState {
        self.set_realized(id, realized);
        let room = self.rooms.entry(id).or_insert_with(|| empty_room(id));
        *room = empty_room(id);
        room
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut RoomState> {
        self.rooms.get_mut(&id)
    }

    pub fn set_realized(&mut self, id: RoomId, realized: bool) {
        if realized {
            self.realized.insert(id);
        } else {
            self.realized.remove(&id);
        }
    }

    pub fn is_realized(&self, id: RoomId) -> bool {
        self.realized.contains(&id)
    }

    pub fn set_auto_realize(&mut self, on: bool) {
        self.auto_realize = on;
    }

    /// Every realization request received, in order.
    pub fn realize_requests(&self) -> &[RoomId] {
        &self.realize_requests
    }

    /// Join two rooms with a pipe. Returns the new shortcut's index in
    /// each room, or `None` if either room is unknown.
    pub fn connect(&mut self, a: Exit, b: Exit) -> Option<(usize, usize)> {
        if !self.rooms.contains_key(&a.room) || !self.rooms.contains_key(&b.room) {
            return None;
        }
        let ia = self.add_exit(a, b.room)?;
        let ib = self.add_exit(b, a.room)?;
        Some((ia, ib))
    }

    fn add_exit(&mut self, exit: Exit, to: RoomId) -> Option<usize> {
        let room = self.rooms.get_mut(&exit.room)?;
        room.connections.push(Some(to));
        room.shortcuts.push(Shortcut {
            kind: ShortcutKind::RoomExit,
            start_tile: exit.tile,
            dest_node: room.connections.len() - 1,
            entrance_dir: exit.dir,
        });
        Some(room.shortcuts.len() - 1)
    }

    /// Mark the exit at `tile` as a hidden one.
    pub fn hide_exit(&mut self, room: RoomId, tile: IVec2) {
        if let Some(r) = self.rooms.get_mut(&room) {
            r.hidden_exits.push(tile);
        }
    }

    pub fn set_darkness(&mut self, room: RoomId, darkness: f32) {
        self.darkness.insert(room, darkness);
    }

    // -- camera ---------------------------------------------------------------

    pub fn set_camera(&mut self, room: RoomId, pos: Vec2) {
        self.camera_room = Some(room);
        self.camera = pos;
    }

    pub fn camera_room_id(&self) -> Option<RoomId> {
        self.camera_room
    }

    pub fn set_entrance_color(&mut self, shortcut: usize, color: Color) {
        self.entrance_colors.insert(shortcut, color);
    }

    // -- creatures and items ------------------------------------------------

    pub fn spawn_creature(&mut self, room: RoomId, kind: CreatureKind, pos: Vec2) -> EntityId {
        let id = self.ids.allocate();
        if let Some(r) = self.rooms.get_mut(&room) {
            r.creatures.push(Creature {
                id,
                kind,
                pos,
                last_pos: pos,
                realized: true,
                dead: false,
                in_shortcut: false,
                submersion: 0.0,
                small: false,
                stealth: Stealth::default(),
                status: SymbolStatus::default(),
            });
        }
        id
    }

    pub fn creature_mut(&mut self, id: EntityId) -> Option<&mut Creature> {
        self.rooms
            .values_mut()
            .flat_map(|r| r.creatures.iter_mut())
            .find(|c| c.id == id)
    }

    /// Set a creature's position for this tick; `last_pos` keeps last tick's.
    pub fn move_creature(&mut self, id: EntityId, pos: Vec2) -> bool {
        match self.creature_mut(id) {
            Some(c) => {
                c.pos = pos;
                true
            }
            None => false,
        }
    }

    pub fn spawn_item(&mut self, room: RoomId, kind: ItemKind, pos: Vec2) -> EntityId {
        let id = self.ids.allocate();
        if let Some(r) = self.rooms.get_mut(&room) {
            r.items.push(Item {
                id,
                kind,
                weapon: true,
                pos,
                last_pos: pos,
                mode: WeaponMode::Free,
                ignited: false,
                throw_dir: IVec2::ZERO,
                submersion: 0.0,
            });
        }
        id
    }

    pub fn item_mut(&mut self, id: EntityId) -> Option<&mut Item> {
        self.rooms
            .values_mut()
            .flat_map(|r| r.items.iter_mut())
            .find(|i| i.id == id)
    }

    /// Remove a creature or item from whichever room holds it.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let mut found = false;
        for room in self.rooms.values_mut() {
            let before = room.creatures.len() + room.items.len();
            room.creatures.retain(|c| c.id != id);
            room.items.retain(|i| i.id != id);
            found |= room.creatures.len() + room.items.len() != before;
        }
        if found {
            self.ids.free(id);
        }
        found
    }

    /// Close the tick: every `last_pos` catches up with `pos`.
    pub fn end_tick(&mut self) {
        for room in self.rooms.values_mut() {
            for c in &mut room.creatures {
                c.last_pos = c.pos;
            }
            for i in &mut room.items {
                i.last_pos = i.pos;
            }
        }
    }

    // -- players ------------------------------------------------------------

    /// Add a realized, controlled player. Returns its slot.
    pub fn add_player(&mut self, pos: Vec2) -> usize {
        self.players.push(Player {
            pos,
            realized: true,
            controlled: true,
            submersion: 0.0,
        });
        self.players.len() - 1
    }

    pub fn player_mut(&mut self, slot: usize) -> Option<&mut Player> {
        self.players.get_mut(slot)
    }

    pub fn set_observer(&mut self, slot: Option<usize>) {
        self.observer = slot;
    }
}

fn empty_room(id: RoomId) -> RoomState {
    RoomState {
        id,
        shelter: false,
        shortcuts_ready: true,
        creatures: Vec::new(),
        items: Vec::new(),
        shortcuts: Vec::new(),
        connections: Vec::new(),
        hidden_exits: Vec::new(),
    }
}

impl HudHost for SandboxHost {
    fn screen_size(&self) -> Vec2 {
        self.screen
    }

    fn camera_pos(&self) -> Vec2 {
        self.camera
    }

    fn camera_room(&self) -> Option<&RoomState> {
        self.camera_room.and_then(|id| self.room(id))
    }

    fn room(&self, id: RoomId) -> Option<&RoomState> {
        if self.realized.contains(&id) {
            self.rooms.get(&id)
        } else {
            None
        }
    }

    fn abstract_room(&self, id: RoomId) -> Option<AbstractRoom> {
        self.rooms.get(&id).map(|r| AbstractRoom {
            id,
            creature_count: r.creatures.len(),
            realized: self.realized.contains(&id),
        })
    }

    fn realize_room(&mut self, id: RoomId) {
        self.realize_requests.push(id);
        if self.auto_realize && self.rooms.contains_key(&id) {
            self.realized.insert(id);
        }
    }

    fn darkness(&self, room: RoomId, _pos: Vec2) -> f32 {
        self.darkness.get(&room).copied().unwrap_or(0.0)
    }

    fn observer(&self) -> Option<Player> {
        self.observer.and_then(|i| self.players.get(i).copied())
    }

    fn players(&self) -> Vec<Player> {
        self.players.clone()
    }

    fn entrance_color(&self, shortcut_index: usize) -> Color {
        self.entrance_colors
            .get(&shortcut_index)
            .copied()
            .unwrap_or(WHITE)
    }
}
