//! Agent sandbox demo
//!
//! Runs the simulation headless: a pointer-driven player entity on team 0
//! and a team of followers chasing it. Pointer clicks are scripted, draw
//! commands go to a logging sink, and the loop runs a fixed timestep.

use sim_engine::foundation::time::Timer;
use sim_engine::prelude::*;

const DT: f32 = 1.0 / 60.0;
const FRAMES: u32 = 1_800; // 30 simulated seconds

/// Render sink that logs draw commands instead of rasterizing them
#[derive(Default)]
struct LogRenderSink;

impl RenderSink for LogRenderSink {
    fn draw_sprite(&mut self, sprite: &SpriteParams) {
        log::debug!(
            "sprite {:?} at ({:.1}, {:.1}) rot {:.2}",
            sprite.visual,
            sprite.position.x,
            sprite.position.y,
            sprite.rotation
        );
    }

    fn draw_debug(&mut self, primitive: &DebugPrimitive) {
        log::trace!("debug {:?}", primitive);
    }
}

/// Scripted pointer clicks standing in for a real input device
fn scripted_pointer(frame: u32) -> PointerState {
    let click = |x, y| PointerState {
        position: Vec2::new(x, y),
        primary_down: true,
    };
    match frame {
        60 => click(700.0, 500.0),
        600 => click(100.0, 450.0),
        1_200 => click(400.0, 80.0),
        _ => PointerState::default(),
    }
}

fn build_world(config: &SimConfig) -> Result<(World, EntityId), SpawnError> {
    let mut world = World::new(config);

    let player_team = world.create_team();
    let mut player = Entity::new(&config.entity, Vec2::new(400.0, 300.0))?;
    player.attach_behavior(Box::new(PlayerInput::new(&config.behavior)));
    player.set_tint(Color::new(0.4, 0.8, 1.0, 1.0));
    let player_id = world
        .add_player(player, player_team)
        .expect("player team was just created");

    let follower_team = world.create_team();
    let spawn_points = [
        Vec2::new(60.0, 60.0),
        Vec2::new(740.0, 60.0),
        Vec2::new(60.0, 540.0),
        Vec2::new(740.0, 540.0),
    ];
    for point in spawn_points {
        let mut follower = Entity::new(&config.entity, point)?;
        follower.attach_behavior(Box::new(FollowBehavior::new(&config.behavior)));
        world
            .add_player(follower, follower_team)
            .expect("follower team was just created");
    }

    let mut factory = HeadlessVisualFactory::new(config.entity.radius);
    world.create_all_visuals(&mut factory)?;

    Ok((world, player_id))
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = SimConfig::load_or_default("sandbox.toml");
    log::info!(
        "world {}x{}, friction {}, gravity {}",
        config.world.width,
        config.world.height,
        config.world.friction,
        config.world.gravity
    );

    let (mut world, player_id) = match build_world(&config) {
        Ok(built) => built,
        Err(e) => {
            log::error!("failed to build world: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("spawned {} entities", world.entity_count());

    let mut tracker = PointerTracker::new();
    let mut sink = LogRenderSink;
    let mut timer = Timer::new();

    for frame in 0..FRAMES {
        timer.update();
        let snapshot = tracker.update(scripted_pointer(frame));
        if snapshot.primary_pressed {
            log::info!(
                "frame {}: click at ({:.0}, {:.0})",
                frame,
                snapshot.position.x,
                snapshot.position.y
            );
        }
        world.set_pointer(snapshot);
        world.update(DT);

        world.render(&mut sink);
        world.render_debug_info(&mut sink);

        if frame % 300 == 0 {
            if let Some(player) = world.entity(player_id) {
                log::info!(
                    "frame {}: player at ({:.1}, {:.1}) speed {:.1}",
                    frame,
                    player.position().x,
                    player.position().y,
                    player.speed()
                );
            }
        }
    }

    log::info!(
        "simulated {} frames ({:.1} s of world time) in {:.2} s wall time",
        timer.frame_count(),
        f64::from(FRAMES) * f64::from(DT),
        timer.total_time()
    );
}
