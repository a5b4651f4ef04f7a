//! Icon mode: a creature badge pinned just inside the screen edge for every
//! off-screen creature. Rebuilt from scratch each frame.

use glam::Vec2;
use offscreen_core::math::{inverse_lerp, lerp};

use crate::draw::{DrawCommand, DrawList};
use crate::host::{Creature, HudHost, RoomId};
use crate::sense::{self, SenseModel};

/// Badge inset from the edge for creatures right past it.
pub const INNER_MARGIN: f32 = 40.0;
/// Badge inset for creatures a full screen away.
pub const OUTER_MARGIN: f32 = 10.0;
/// Distance past the edge at which a badge is fully opaque.
pub const NEAR_DISTANCE: f32 = 50.0;

/// Screen placement and look of one badge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconPlacement {
    pub pos: Vec2,
    pub alpha: f32,
    pub scale: f32,
}

/// Where and how to draw a badge for a creature at `screen_pos`, or `None`
/// if it is on screen or more than a screen beyond the edge.
///
/// `range` is the sense range; `perception` multiplies the alpha (visibility
/// times observer factor) before the creature's own `submersion` is taken off.
pub fn place_icon(
    screen_pos: Vec2,
    screen: Vec2,
    range: f32,
    perception: f32,
    submersion: f32,
) -> Option<IconPlacement> {
    let half = screen / 2.0;
    let past = (screen_pos - half).abs() - half;
    if (past.x < 0.0 && past.y < 0.0) || past.x > screen.x || past.y > screen.y {
        return None;
    }

    // Both axes are normalised by the width.
    let margin = Vec2::new(
        lerp(INNER_MARGIN, OUTER_MARGIN, past.x / screen.x),
        lerp(INNER_MARGIN, OUTER_MARGIN, past.y / screen.x),
    );
    let pos = screen_pos.clamp(margin, (screen - margin).max(margin));

    let dist = past.x.max(past.y);
    let alpha = inverse_lerp(range, NEAR_DISTANCE, dist) * perception;
    Some(IconPlacement {
        pos,
        alpha: sense::submerge(alpha, submersion),
        scale: inverse_lerp(screen.x, 0.0, dist),
    })
}

/// Emit a badge for every off-screen creature of the camera room.
pub(crate) fn draw_icons<H: HudHost>(
    host: &H,
    room: RoomId,
    creatures: &[Creature],
    sense_model: &SenseModel,
    observer: f32,
    time_stacker: f32,
    out: &mut DrawList,
) {
    let screen = host.screen_size();
    let camera = host.camera_pos();
    for creature in creatures.iter().filter(|c| c.is_physically_present()) {
        let pos = creature.pos_at(time_stacker);
        let range = sense::sense_range(screen.x, host.darkness(room, pos), creature.submersion);
        let perception = sense_model.visibility(creature) * observer;
        let Some(icon) = place_icon(pos - camera, screen, range, perception, creature.submersion)
        else {
            continue;
        };
        out.push(DrawCommand::Symbol {
            kind: creature.kind.clone(),
            pos: icon.pos,
            scale: icon.scale,
            color: sense_model.symbol_color(creature),
            alpha: icon.alpha,
            flash: 0.0,
        });
    }
}
