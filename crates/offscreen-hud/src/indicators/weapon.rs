//! Glow warnings for dangerous items flying in from off-screen.

use glam::Vec2;
use offscreen_core::entity::EntityId;
use offscreen_core::interp::Buffered;
use offscreen_core::math::clamp01;
use offscreen_core::tracker::TrackPolicy;

use crate::color::{self, Color};
use crate::draw::{DrawCommand, DrawList, Layer, SpriteStyle};
use crate::host::{HudHost, Item, ItemKind, RoomId, WeaponMode};
use crate::sense;

/// Exponential smoothing rate of glow colour and scale, per second.
pub const WARNING_SMOOTHING: f32 = 8.0;

const THROWN_SCALE: Vec2 = Vec2::new(10.0, 0.5);
const RESTING_SCALE: Vec2 = Vec2::new(5.0, 5.0);

/// Clockwise rotation in degrees that lays local `+x` along `dir`.
fn along_throw(dir: Vec2) -> f32 {
    -dir.y.atan2(dir.x).to_degrees()
}

/// Whether an item deserves a warning, ignoring where it is.
pub fn is_dangerous(item: &Item) -> bool {
    if !item.weapon || item.kind == ItemKind::FirecrackerPlant {
        return false;
    }
    item.mode == WeaponMode::Thrown
        || (item.ignited
            && matches!(
                item.kind,
                ItemKind::ExplosiveSpear | ItemKind::ScavengerBomb | ItemKind::SingularityBomb
            ))
}

/// Kinds that sting rather than kill glow yellow; everything else red.
pub fn warning_color(kind: &ItemKind) -> Color {
    match kind {
        ItemKind::Rock | ItemKind::FlareBomb | ItemKind::SporePlant | ItemKind::PuffBall => {
            color::YELLOW
        }
        _ => color::RED,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponWarning {
    target: Color,
    color: Buffered<Color>,
    scale: Buffered<Vec2>,
    /// Degrees clockwise; turns the sprite's long `+x` axis onto the throw
    /// direction while in flight.
    rotation: f32,
}

impl WeaponWarning {
    pub fn new(kind: &ItemKind) -> Self {
        Self {
            target: warning_color(kind),
            color: Buffered::new(color::WHITE),
            scale: Buffered::new(RESTING_SCALE),
            rotation: 0.0,
        }
    }

    pub fn target_color(&self) -> Color {
        self.target
    }

    pub fn color(&self) -> Color {
        self.color.current()
    }

    pub fn scale(&self) -> Vec2 {
        self.scale.current()
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Ease colour and scale toward their targets by one tick.
    pub fn update(&mut self, item: &Item, dt: f32) {
        let keep = (-dt * WARNING_SMOOTHING).exp();
        let target_scale = if item.mode == WeaponMode::Thrown {
            self.rotation = along_throw(item.throw_dir.as_vec2());
            THROWN_SCALE
        } else {
            RESTING_SCALE
        };
        self.scale.step(|s| target_scale.lerp(s, keep));
        let target = self.target;
        self.color.step(|c| target.lerp(c, keep));
    }

    /// Emit the glow, stretched and faded by how far past the edge the item is.
    pub fn draw<H: HudHost>(
        &self,
        host: &H,
        room: RoomId,
        item: &Item,
        time_stacker: f32,
        out: &mut DrawList,
    ) {
        let pos = item.pos_at(time_stacker);
        let screen = host.screen_size();
        let screen_pos = pos - host.camera_pos();
        let range = sense::sense_range(screen.x, host.darkness(room, pos), item.submersion);
        if range <= 0.0 {
            return;
        }
        let reach = clamp01(sense::edge_distance(screen_pos, screen) / range);

        out.push(DrawCommand::Sprite {
            layer: Layer::Hud,
            style: SpriteStyle::Glow,
            pos: sense::clamp_to_screen(screen_pos, screen),
            scale: self.scale.at(time_stacker) * (1.0 + reach),
            rotation: self.rotation,
            color: self.color.at(time_stacker),
            alpha: 1.0 - reach,
        });
    }
}

/// Dangerous items in the camera room that are off-screen.
pub(crate) struct OffscreenWeapons<'a, H> {
    pub host: &'a H,
    pub items: &'a [Item],
}

impl<'a, H: HudHost> TrackPolicy<EntityId, WeaponWarning> for OffscreenWeapons<'a, H> {
    type Candidate = &'a Item;

    fn candidates(&mut self) -> Vec<&'a Item> {
        self.items.iter().collect()
    }

    fn key(&self, item: &&'a Item) -> EntityId {
        item.id
    }

    fn exists(&mut self, item: &&'a Item) -> bool {
        is_dangerous(item) && !self.host.is_point_in_view(item.pos, 0.0)
    }

    fn create(&mut self, item: &&'a Item) -> WeaponWarning {
        WeaponWarning::new(&item.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use offscreen_core::math::rotate_around_origin;

    fn item(kind: ItemKind, mode: WeaponMode) -> Item {
        Item {
            id: EntityId::new(3, 0),
            kind,
            weapon: true,
            pos: Vec2::ZERO,
            last_pos: Vec2::ZERO,
            mode,
            ignited: false,
            throw_dir: IVec2::X,
            submersion: 0.0,
        }
    }

    #[test]
    fn eligibility() {
        assert!(is_dangerous(&item(ItemKind::Spear, WeaponMode::Thrown)));
        assert!(!is_dangerous(&item(ItemKind::Spear, WeaponMode::Free)));
        assert!(!is_dangerous(&item(ItemKind::FirecrackerPlant, WeaponMode::Thrown)));

        let mut bomb = item(ItemKind::ScavengerBomb, WeaponMode::Carried);
        assert!(!is_dangerous(&bomb));
        bomb.ignited = true;
        assert!(is_dangerous(&bomb));

        let mut rock = item(ItemKind::Rock, WeaponMode::Free);
        rock.ignited = true;
        assert!(!is_dangerous(&rock), "only fused kinds count when ignited");

        let mut prop = item(ItemKind::Spear, WeaponMode::Thrown);
        prop.weapon = false;
        assert!(!is_dangerous(&prop));
    }

    #[test]
    fn color_by_lethality() {
        assert_eq!(warning_color(&ItemKind::Rock), color::YELLOW);
        assert_eq!(warning_color(&ItemKind::PuffBall), color::YELLOW);
        assert_eq!(warning_color(&ItemKind::Spear), color::RED);
        assert_eq!(warning_color(&ItemKind::Other("bee".into())), color::RED);
    }

    #[test]
    fn glow_starts_white_and_eases_to_target() {
        let spear = item(ItemKind::Spear, WeaponMode::Thrown);
        let mut w = WeaponWarning::new(&spear.kind);
        assert_eq!(w.color(), color::WHITE);

        w.update(&spear, 0.025);
        let keep = (-0.025f32 * 8.0).exp();
        let expected = color::RED.lerp(color::WHITE, keep);
        assert!((w.color() - expected).length() < 1e-6);
        assert!(w.scale().x > 5.0 && w.scale().y < 5.0, "stretching");

        for _ in 0..400 {
            w.update(&spear, 0.025);
        }
        assert!((w.color() - color::RED).length() < 1e-4);
        assert!((w.scale() - THROWN_SCALE).length() < 1e-3);
        assert!(w.rotation().abs() < 1e-4, "throw to +x needs no turn");
    }

    #[test]
    fn glow_stretches_along_the_throw() {
        for dir in [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y] {
            let mut spear = item(ItemKind::Spear, WeaponMode::Thrown);
            spear.throw_dir = dir;
            let mut w = WeaponWarning::new(&spear.kind);
            for _ in 0..400 {
                w.update(&spear, 0.025);
            }
            let long_axis = rotate_around_origin(Vec2::X, w.rotation());
            assert!(
                long_axis.dot(dir.as_vec2()) > 0.99,
                "throw {dir}: rotation {} puts the long axis at {long_axis}",
                w.rotation()
            );
            assert!(w.scale().x > w.scale().y);
        }
    }

    #[test]
    fn landed_weapon_relaxes_round() {
        let mut spear = item(ItemKind::Spear, WeaponMode::Thrown);
        let mut w = WeaponWarning::new(&spear.kind);
        for _ in 0..200 {
            w.update(&spear, 0.025);
        }
        spear.mode = WeaponMode::StuckInWall;
        for _ in 0..400 {
            w.update(&spear, 0.025);
        }
        assert!((w.scale() - RESTING_SCALE).length() < 1e-3);
    }
}
