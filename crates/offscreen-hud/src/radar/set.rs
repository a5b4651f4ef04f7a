//! The radars of the room the camera is in.

use crate::config::{IndicatorConfig, RadarMode};
use crate::draw::DrawList;
use crate::host::{HudHost, RoomId};
use crate::radar::minimap::ShortcutMinimap;
use crate::sense::SenseModel;

/// Owns one [`ShortcutMinimap`] per room exit of the camera room.
///
/// Radars are built lazily once the room's shortcut graph is ready and are
/// torn down wholesale when the camera changes room or radars are disabled.
/// Nothing carries over between rooms.
#[derive(Debug, Default)]
pub struct RadarSet {
    room: Option<RoomId>,
    minimaps: Vec<ShortcutMinimap>,
}

impl RadarSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update<H: HudHost>(
        &mut self,
        host: &mut H,
        cfg: &IndicatorConfig,
        sense_model: &SenseModel,
        dt: f32,
    ) {
        let Some(room) = host.camera_room() else {
            return;
        };
        if self.room != Some(room.id) {
            self.change_room(Some(room.id));
        }

        if cfg.radar_mode == RadarMode::Disabled {
            if !self.minimaps.is_empty() {
                let released = self.teardown();
                tracing::debug!(released, "radar disabled, minimaps torn down");
            }
            return;
        }

        if self.minimaps.is_empty() && room.shortcuts_ready {
            self.minimaps = (0..room.shortcuts.len())
                .filter_map(|i| ShortcutMinimap::new(room, i, cfg))
                .collect();
            if !self.minimaps.is_empty() {
                tracing::debug!(
                    room = ?room.id,
                    radars = self.minimaps.len(),
                    "room exits discovered"
                );
            }
        }

        for minimap in &mut self.minimaps {
            minimap.update(host, cfg, sense_model, dt);
        }
    }

    pub fn draw<H: HudHost>(
        &self,
        host: &H,
        cfg: &IndicatorConfig,
        time_stacker: f32,
        out: &mut DrawList,
    ) {
        for minimap in &self.minimaps {
            minimap.draw(host, cfg, time_stacker, out);
        }
    }

    /// Tear down every radar and start over in `room`. Returns how many
    /// blips were released.
    pub fn change_room(&mut self, room: Option<RoomId>) -> usize {
        let released = self.teardown();
        if self.room != room {
            tracing::info!(from = ?self.room, to = ?room, released, "radar room changed");
        }
        self.room = room;
        released
    }

    /// Tear down and drop every radar.
    pub fn teardown(&mut self) -> usize {
        self.minimaps
            .drain(..)
            .map(|mut minimap| minimap.teardown())
            .sum()
    }

    pub fn room(&self) -> Option<RoomId> {
        self.room
    }

    pub fn len(&self) -> usize {
        self.minimaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minimaps.is_empty()
    }

    pub fn minimaps(&self) -> &[ShortcutMinimap] {
        &self.minimaps
    }

    /// The radar for shortcut `index` of the current room.
    pub fn minimap(&self, index: usize) -> Option<&ShortcutMinimap> {
        self.minimaps.iter().find(|m| m.index() == index)
    }
}
