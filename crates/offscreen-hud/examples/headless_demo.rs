//! Headless overlay demo -- two rooms, a prowling lizard, a thrown spear and
//! a radar looking through the pipe next door.
//!
//! Run with:
//!   RUST_LOG=offscreen_hud=debug cargo run --example headless_demo -p offscreen-hud

use anyhow::Context;
use glam::{IVec2, Vec2};
use offscreen_hud::prelude::*;
use offscreen_hud::sandbox::Exit;
use tracing_subscriber::EnvFilter;

const HOME: RoomId = RoomId(0);
const NEXT: RoomId = RoomId(1);
const SECONDS: usize = 5;
const FPS: usize = 60;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            IndicatorConfig::from_json(&text).with_context(|| format!("parsing config {path}"))?
        }
        None => IndicatorConfig::default(),
    };
    tracing::info!(?cfg, "config loaded");

    // -- world ---------------------------------------------------------------

    let mut host = SandboxHost::new(Vec2::new(1366.0, 768.0));
    host.add_room(HOME, true);
    host.add_room(NEXT, false);
    host.connect(
        Exit {
            room: HOME,
            tile: IVec2::new(60, 20),
            dir: IVec2::NEG_X,
        },
        Exit {
            room: NEXT,
            tile: IVec2::new(1, 8),
            dir: IVec2::X,
        },
    )
    .context("connecting rooms")?;
    host.set_entrance_color(0, Color::new(0.4, 0.9, 1.0, 1.0));
    host.set_camera(HOME, Vec2::ZERO);
    host.add_player(Vec2::new(600.0, 400.0));

    let lizard = host.spawn_creature(HOME, CreatureKind::PinkLizard, Vec2::new(-300.0, 500.0));
    host.spawn_creature(NEXT, CreatureKind::Scavenger, Vec2::new(90.0, 170.0));
    host.spawn_creature(NEXT, CreatureKind::Centipede, Vec2::new(160.0, 200.0));
    let spear = host.spawn_item(HOME, ItemKind::Spear, Vec2::new(1600.0, 380.0));
    if let Some(item) = host.item_mut(spear) {
        item.mode = WeaponMode::Thrown;
        item.throw_dir = IVec2::NEG_X;
    }

    // -- loop ----------------------------------------------------------------

    let mut overlay = Overlay::attach(&host, SenseModel::default());
    let mut clock = FrameClock::new(TickConfig::default());
    let mut pulses = 0;
    let mut commands = 0;

    for frame in 0..SECONDS * FPS {
        let step = clock.advance(1.0 / FPS as f64);
        for _ in 0..step.ticks {
            let t = clock.sim_time() as f32;
            host.move_creature(lizard, Vec2::new(-300.0 + 40.0 * t.sin(), 500.0));
            if let Some(item) = host.item_mut(spear) {
                item.pos.x -= 12.0;
                if item.pos.x < 1000.0 {
                    item.mode = WeaponMode::StuckInWall;
                }
            }

            overlay.update(&mut host, &cfg, clock.fixed_dt() as f32);
            host.end_tick();

            for pulse in overlay.drain_pulses() {
                tracing::debug!(pos = ?pulse.pos, speed = pulse.speed, "pulse");
                pulses += 1;
            }
        }

        let list = overlay.draw(&host, &cfg, step.time_stacker);
        commands += list.len();
        if frame % FPS == 0 {
            println!(
                "t={:>4.1}s  lines={:>3}  sprites={:>2}  symbols={:>2}",
                clock.sim_time(),
                list.lines().count(),
                list.sprites().count(),
                list.symbols().count(),
            );
        }
    }

    println!();
    println!("ticks:           {}", clock.tick_count());
    println!("pulses emitted:  {pulses}");
    println!("draw commands:   {commands}");
    println!("weapon warnings: {}", overlay.indicators().weapon_count());
    for map in overlay.radar().minimaps() {
        println!(
            "radar {} -> {:?}: {:?}, {} blips, warm-up {:.2}",
            map.index(),
            map.far_room(),
            map.phase(),
            map.blip_count(),
            map.warm_up(),
        );
    }
    Ok(())
}
