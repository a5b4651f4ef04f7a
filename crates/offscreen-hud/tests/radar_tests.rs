//! Integration tests for shortcut radars: discovery, gating, layout modes
//! and teardown.

use glam::{IVec2, Vec2};
use offscreen_hud::prelude::*;
use offscreen_hud::radar::minimap::PLAYER_PROXIMITY;
use offscreen_hud::sandbox::Exit;

const HOME: RoomId = RoomId(1);
const FAR: RoomId = RoomId(2);
const DT: f32 = 0.025;

/// Centre of the home exit tile (10, 10).
const HOME_EXIT: Vec2 = Vec2::new(210.0, 210.0);
/// Centre of the far exit tile (3, 4).
const FAR_EXIT: Vec2 = Vec2::new(70.0, 90.0);

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn world() -> SandboxHost {
    let mut host = SandboxHost::new(Vec2::new(1400.0, 800.0));
    host.add_room(HOME, true);
    host.add_room(FAR, true);
    host.connect(
        Exit {
            room: HOME,
            tile: IVec2::new(10, 10),
            dir: IVec2::Y,
        },
        Exit {
            room: FAR,
            tile: IVec2::new(3, 4),
            dir: IVec2::X,
        },
    );
    host.set_camera(HOME, Vec2::ZERO);
    host
}

fn config(mode: RadarMode) -> IndicatorConfig {
    IndicatorConfig {
        offscreen_display: DisplayMode::Hidden,
        show_thrown_items: false,
        radar_mode: mode,
        ..Default::default()
    }
}

fn run(overlay: &mut Overlay, host: &mut SandboxHost, cfg: &IndicatorConfig, ticks: usize) {
    for _ in 0..ticks {
        overlay.update(host, cfg, DT);
        host.end_tick();
    }
}

fn radar(overlay: &Overlay) -> &ShortcutMinimap {
    overlay.radar().minimap(0).expect("radar for shortcut 0")
}

// ---------------------------------------------------------------------------
// Building and discovery
// ---------------------------------------------------------------------------

#[test]
fn one_radar_per_room_exit() {
    let mut host = world();
    host.room_mut(HOME).unwrap().shortcuts.push(Shortcut {
        kind: ShortcutKind::Den,
        start_tile: IVec2::new(20, 3),
        dest_node: 7,
        entrance_dir: IVec2::NEG_Y,
    });
    let cfg = config(RadarMode::Dynamic);
    let mut overlay = Overlay::attach(&host, SenseModel::default());
    run(&mut overlay, &mut host, &cfg, 1);

    assert_eq!(overlay.radar().len(), 1);
    assert_eq!(overlay.radar().room(), Some(HOME));
    assert_eq!(radar(&overlay).origin(), HOME_EXIT);
}

#[test]
fn radars_wait_for_the_shortcut_graph() {
    let mut host = world();
    host.room_mut(HOME).unwrap().shortcuts_ready = false;
    let cfg = config(RadarMode::Dynamic);
    let mut overlay = Overlay::attach(&host, SenseModel::default());

    run(&mut overlay, &mut host, &cfg, 5);
    assert!(overlay.radar().is_empty());

    host.room_mut(HOME).unwrap().shortcuts_ready = true;
    run(&mut overlay, &mut host, &cfg, 1);
    assert_eq!(overlay.radar().len(), 1);
}

#[test]
fn far_exit_is_linked_once() {
    let mut host = world();
    let id = host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    let cfg = config(RadarMode::Dynamic);
    let mut overlay = Overlay::attach(&host, SenseModel::default());
    run(&mut overlay, &mut host, &cfg, 1);

    let map = radar(&overlay);
    assert_eq!(map.phase(), RadarPhase::Active);
    assert_eq!(map.far_room(), Some(FAR));
    assert_eq!(map.far_entrance(), Some(FAR_EXIT));
    assert!(map.blip(id).is_some());

    // Rewiring the far room afterwards does not move the link.
    host.room_mut(FAR).unwrap().shortcuts[0].start_tile = IVec2::new(30, 30);
    run(&mut overlay, &mut host, &cfg, 3);
    assert_eq!(radar(&overlay).far_entrance(), Some(FAR_EXIT));
}

#[test]
fn unloaded_far_room_keeps_its_link() {
    let mut host = world();
    host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    let cfg = config(RadarMode::Dynamic);
    let mut overlay = Overlay::attach(&host, SenseModel::default());
    run(&mut overlay, &mut host, &cfg, 10);
    let warm_up = radar(&overlay).warm_up();
    assert!(warm_up > 0.0);

    host.set_auto_realize(false);
    host.set_realized(FAR, false);
    run(&mut overlay, &mut host, &cfg, 3);

    let map = radar(&overlay);
    assert_eq!(map.phase(), RadarPhase::Discovering);
    assert!(map.is_linked());
    assert_eq!(map.warm_up(), warm_up, "held while waiting");
    assert_eq!(host.realize_requests(), &[FAR, FAR, FAR]);
}

// ---------------------------------------------------------------------------
// Blips
// ---------------------------------------------------------------------------

#[test]
fn blips_follow_scan_range() {
    let mut host = world();
    let near = host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    let far = host.spawn_creature(FAR, CreatureKind::PinkLizard, Vec2::new(1000.0, 90.0));
    let cfg = config(RadarMode::Dynamic);
    let mut overlay = Overlay::attach(&host, SenseModel::default());
    run(&mut overlay, &mut host, &cfg, 1);

    let map = radar(&overlay);
    assert_eq!(map.blip_count(), 1);
    assert!(map.blip(near).is_some());
    assert!(map.blip(far).is_none());

    host.move_creature(near, Vec2::new(900.0, 90.0));
    host.move_creature(far, Vec2::new(120.0, 120.0));
    run(&mut overlay, &mut host, &cfg, 1);

    let map = radar(&overlay);
    assert!(map.blip(near).is_none());
    assert!(map.blip(far).is_some());
    assert_eq!(map.blip_totals(), (2, 1));
}

#[test]
fn blips_start_at_the_near_shortcut() {
    let mut host = world();
    let id = host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    let cfg = config(RadarMode::Dynamic);
    let mut overlay = Overlay::attach(&host, SenseModel::default());
    run(&mut overlay, &mut host, &cfg, 1);

    // Power is still low on the first tick, so the blip barely leaves the pipe.
    let blip = radar(&overlay).blip(id).unwrap();
    assert!((blip.pos().truncate() - HOME_EXIT).length() < 60.0);
}

#[test]
fn imperceptible_creatures_keep_finite_positions() {
    let mut host = world();
    let a = host.spawn_creature(FAR, CreatureKind::Spider, Vec2::new(100.0, 90.0));
    let b = host.spawn_creature(FAR, CreatureKind::Spider, Vec2::new(90.0, 120.0));
    let cfg = config(RadarMode::Minimal);
    let mut overlay = Overlay::attach(&host, SenseModel::default());
    run(&mut overlay, &mut host, &cfg, 60);

    let map = radar(&overlay);
    for id in [a, b] {
        let blip = map.blip(id).unwrap();
        assert!(blip.pos().is_finite());
        assert_eq!(blip.alpha(), 0.0);
    }
    let frame = overlay.draw(&host, &cfg, 0.5);
    let dots = frame
        .sprites()
        .filter(|c| {
            matches!(
                c,
                DrawCommand::Sprite {
                    style: SpriteStyle::HologramDot,
                    ..
                }
            )
        })
        .count();
    assert_eq!(dots, 0, "invisible blips are not drawn");
}

// ---------------------------------------------------------------------------
// Warm-up, power and layout
// ---------------------------------------------------------------------------

#[test]
fn visible_exit_warms_up_within_a_second() {
    let mut host = world();
    host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    let cfg = config(RadarMode::Dynamic);
    let mut overlay = Overlay::attach(&host, SenseModel::default());

    run(&mut overlay, &mut host, &cfg, 4);
    assert_eq!(radar(&overlay).power(), 1.0);
    run(&mut overlay, &mut host, &cfg, 40);
    assert_eq!(radar(&overlay).warm_up(), 1.0);
}

#[test]
fn empty_far_side_powers_down() {
    let mut host = world();
    let id = host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    let cfg = config(RadarMode::Dynamic);
    let mut overlay = Overlay::attach(&host, SenseModel::default());
    run(&mut overlay, &mut host, &cfg, 50);

    host.move_creature(id, Vec2::new(1200.0, 90.0));
    run(&mut overlay, &mut host, &cfg, 4);
    let map = radar(&overlay);
    assert_eq!(map.power(), 0.0);
    // Warm-up fades ten times slower than it rises.
    assert!(map.warm_up() > 0.9);
}

#[test]
fn hidden_exit_stays_dark_until_a_player_comes_close() {
    let mut host = world();
    host.hide_exit(HOME, IVec2::new(10, 10));
    host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    let cfg = config(RadarMode::Dynamic);
    let mut overlay = Overlay::attach(&host, SenseModel::default());

    run(&mut overlay, &mut host, &cfg, 60);
    let map = radar(&overlay);
    assert!(map.is_hidden());
    assert_eq!(map.warm_up(), 0.0);
    assert_eq!(map.power(), 0.0);
    assert_eq!(map.compact(), 0.0);

    let slot = host.add_player(HOME_EXIT + Vec2::new(PLAYER_PROXIMITY - 10.0, 0.0));
    run(&mut overlay, &mut host, &cfg, 45);
    let map = radar(&overlay);
    assert!(map.player_nearby());
    assert_eq!(map.warm_up(), 1.0);

    host.player_mut(slot).unwrap().controlled = false;
    run(&mut overlay, &mut host, &cfg, 1);
    assert!(!radar(&overlay).player_nearby());
}

#[test]
fn layout_modes_pin_compactness() {
    let mut host = world();
    host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    let mut overlay = Overlay::attach(&host, SenseModel::default());

    run(&mut overlay, &mut host, &config(RadarMode::Minimal), 1);
    assert_eq!(radar(&overlay).compact(), 1.0);

    run(&mut overlay, &mut host, &config(RadarMode::Expanded), 1);
    assert_eq!(radar(&overlay).compact(), 0.0);

    // Dynamic with nobody around drifts compact over ten ticks.
    run(&mut overlay, &mut host, &config(RadarMode::Dynamic), 5);
    let halfway = radar(&overlay).compact();
    assert!(halfway > 0.3 && halfway < 0.7);
    run(&mut overlay, &mut host, &config(RadarMode::Dynamic), 10);
    assert_eq!(radar(&overlay).compact(), 1.0);
}

#[test]
fn minimal_stays_compact_with_a_player_at_the_exit() {
    let mut host = world();
    host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    host.add_player(HOME_EXIT + Vec2::new(PLAYER_PROXIMITY / 2.0, 0.0));
    let cfg = config(RadarMode::Minimal);
    let mut overlay = Overlay::attach(&host, SenseModel::default());

    for _ in 0..20 {
        run(&mut overlay, &mut host, &cfg, 1);
        let map = radar(&overlay);
        assert!(map.player_nearby());
        assert_eq!(map.compact(), 1.0);
    }
}

#[test]
fn expanded_stays_open_with_nobody_near() {
    let mut host = world();
    host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    host.add_player(HOME_EXIT + Vec2::new(PLAYER_PROXIMITY * 5.0, 0.0));
    let cfg = config(RadarMode::Expanded);
    let mut overlay = Overlay::attach(&host, SenseModel::default());

    for _ in 0..20 {
        run(&mut overlay, &mut host, &cfg, 1);
        let map = radar(&overlay);
        assert!(!map.player_nearby());
        assert_eq!(map.compact(), 0.0);
    }
}

#[test]
fn compact_radar_sits_on_the_pipe_mouth() {
    let mut host = world();
    let cfg = config(RadarMode::Minimal);
    let mut overlay = Overlay::attach(&host, SenseModel::default());
    run(&mut overlay, &mut host, &cfg, 1);
    // One tile out along the entrance direction.
    assert_eq!(radar(&overlay).pos(), HOME_EXIT + Vec2::new(0.0, 20.0));
}

// ---------------------------------------------------------------------------
// Teardown
// ---------------------------------------------------------------------------

#[test]
fn disabling_tears_radars_down() {
    let mut host = world();
    host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    let mut overlay = Overlay::attach(&host, SenseModel::default());
    run(&mut overlay, &mut host, &config(RadarMode::Dynamic), 5);
    assert_eq!(overlay.radar().len(), 1);

    run(&mut overlay, &mut host, &config(RadarMode::Disabled), 1);
    assert!(overlay.radar().is_empty());
    assert!(overlay.draw(&host, &config(RadarMode::Disabled), 0.5).is_empty());

    run(&mut overlay, &mut host, &config(RadarMode::Dynamic), 1);
    assert_eq!(overlay.radar().len(), 1, "rebuilt fresh");
    assert_eq!(radar(&overlay).blip_totals(), (1, 0));
    assert!(radar(&overlay).warm_up() <= DT);
}

#[test]
fn changing_room_starts_over() {
    let mut host = world();
    host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    host.spawn_creature(FAR, CreatureKind::BlueLizard, Vec2::new(80.0, 100.0));
    let cfg = config(RadarMode::Dynamic);
    let mut overlay = Overlay::attach(&host, SenseModel::default());
    run(&mut overlay, &mut host, &cfg, 5);
    assert_eq!(radar(&overlay).blip_count(), 2);

    host.set_camera(FAR, Vec2::ZERO);
    assert_eq!(overlay.change_room(Some(FAR)), 2);
    assert!(overlay.radar().is_empty());

    run(&mut overlay, &mut host, &cfg, 1);
    assert_eq!(overlay.radar().room(), Some(FAR));
    assert_eq!(radar(&overlay).room(), FAR);
}

#[test]
fn camera_move_is_noticed_without_being_told() {
    let mut host = world();
    let cfg = config(RadarMode::Dynamic);
    let mut overlay = Overlay::attach(&host, SenseModel::default());
    run(&mut overlay, &mut host, &cfg, 1);
    assert_eq!(radar(&overlay).room(), HOME);

    host.set_camera(FAR, Vec2::ZERO);
    run(&mut overlay, &mut host, &cfg, 1);
    assert_eq!(overlay.radar().room(), Some(FAR));
    assert_eq!(radar(&overlay).room(), FAR);
    assert_eq!(radar(&overlay).origin(), FAR_EXIT);
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

#[test]
fn active_radar_draws_hologram_and_blips() {
    let mut host = world();
    host.spawn_creature(FAR, CreatureKind::GreenLizard, Vec2::new(100.0, 90.0));
    host.set_entrance_color(0, Color::new(0.0, 1.0, 1.0, 1.0));
    let cfg = config(RadarMode::Expanded);
    let mut overlay = Overlay::attach(&host, SenseModel::default());
    run(&mut overlay, &mut host, &cfg, 60);

    let frame = overlay.draw(&host, &cfg, 0.5);
    assert!(frame.lines().count() > 3 * 8, "three rings plus arrow and stalk");
    assert!(frame.iter().all(|c| c.alpha() > 0.0 && c.alpha() <= 1.0));
    let dots = frame
        .sprites()
        .filter(|c| {
            matches!(
                c,
                DrawCommand::Sprite {
                    style: SpriteStyle::HologramDot,
                    ..
                }
            )
        })
        .count();
    assert_eq!(dots, 1);
    assert!(frame.lines().any(|c| matches!(
        c,
        DrawCommand::Line { color, .. } if *color == Color::new(0.0, 1.0, 1.0, 1.0)
    )));
    assert_eq!(frame, overlay.draw(&host, &cfg, 0.5));
}
