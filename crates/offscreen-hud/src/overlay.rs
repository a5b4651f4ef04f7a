//! The overlay a host attaches to its HUD.

use crate::config::IndicatorConfig;
use crate::draw::DrawList;
use crate::host::{HudHost, RoomId};
use crate::indicators::pulse::Pulse;
use crate::indicators::OffscreenIndicators;
use crate::radar::set::RadarSet;
use crate::sense::SenseModel;

/// Off-screen indicators and shortcut radars behind one update/draw pair.
///
/// Call [`update`](Self::update) once per simulation tick and
/// [`draw`](Self::draw) once per rendered frame. Configuration is passed in
/// every call, so a changed snapshot takes effect on the next tick.
#[derive(Debug)]
pub struct Overlay {
    sense: SenseModel,
    indicators: OffscreenIndicators,
    radar: RadarSet,
}

impl Overlay {
    pub fn attach<H: HudHost>(host: &H, sense: SenseModel) -> Self {
        let room = host.camera_room().map(|r| r.id);
        tracing::info!(?room, screen = ?host.screen_size(), "overlay attached");
        let mut radar = RadarSet::new();
        radar.change_room(room);
        Self {
            sense,
            indicators: OffscreenIndicators::new(),
            radar,
        }
    }

    /// Advance one fixed tick of `dt` seconds.
    pub fn update<H: HudHost>(&mut self, host: &mut H, cfg: &IndicatorConfig, dt: f32) {
        let cfg = cfg.sanitized();
        self.indicators.update(&*host, &cfg, &self.sense, dt);
        self.radar.update(host, &cfg, &self.sense, dt);
    }

    /// Build this frame's draw list. `time_stacker` is the fraction of a
    /// tick elapsed since the last update and is clamped to `[0, 1]`.
    ///
    /// Hosts that also track a time-scale factor keep it to themselves:
    /// every animation here advances in [`update`](Self::update), so drawing
    /// only blends between the last two ticks.
    pub fn draw<H: HudHost>(
        &self,
        host: &H,
        cfg: &IndicatorConfig,
        time_stacker: f32,
    ) -> DrawList {
        let mut out = DrawList::new();
        self.draw_into(host, cfg, time_stacker, &mut out);
        out
    }

    /// Like [`draw`](Self::draw), appending to an existing list.
    pub fn draw_into<H: HudHost>(
        &self,
        host: &H,
        cfg: &IndicatorConfig,
        time_stacker: f32,
        out: &mut DrawList,
    ) {
        let cfg = cfg.sanitized();
        let ts = if time_stacker.is_nan() {
            0.0
        } else {
            time_stacker.clamp(0.0, 1.0)
        };
        self.indicators.draw(host, &cfg, &self.sense, ts, out);
        self.radar.draw(host, &cfg, ts, out);
    }

    /// Tell the overlay the camera moved to `room`. Every radar is torn
    /// down; returns how many blips were released.
    pub fn change_room(&mut self, room: Option<RoomId>) -> usize {
        self.radar.change_room(room)
    }

    /// Pulses emitted since the last call, for the host to spawn.
    pub fn drain_pulses(&mut self) -> Vec<Pulse> {
        self.indicators.drain_pulses()
    }

    pub fn indicators(&self) -> &OffscreenIndicators {
        &self.indicators
    }

    pub fn radar(&self) -> &RadarSet {
        &self.radar
    }

    pub fn sense(&self) -> &SenseModel {
        &self.sense
    }
}
