use anyhow::Result;
use reef_patrol::assets::AssetManager;
use reef_patrol::cli::CliOverrides;
use reef_patrol::config::{AppConfig, AppConfigOverrides};
use reef_patrol::ecs::EcsWorld;
use reef_patrol::events::GameEvent;
use reef_patrol::scene::Scene;
use reef_patrol::time::FrameClock;

const CONFIG_PATH: &str = "reef_patrol.json";

fn main() {
    let overrides = match CliOverrides::parse_from_env() {
        Ok(parsed) => parsed.into_config_overrides(),
        Err(err) => {
            eprintln!("[cli] {err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = run(overrides) {
        eprintln!("Simulation error: {err:?}");
        std::process::exit(1);
    }
}

fn run(overrides: AppConfigOverrides) -> Result<()> {
    let mut config = AppConfig::load_or_default(CONFIG_PATH);
    config.apply_overrides(&overrides);

    let scene = match &config.scene.path {
        Some(path) => Scene::load_from_path(path)?,
        None => Scene::shark_patrol(config.patrol.sample_count),
    };
    if let Some(name) = &scene.metadata.name {
        println!("[scene] {name}");
    }

    let mut assets = AssetManager::new();
    for dependency in &scene.dependencies.models {
        assets.retain_model(dependency.key(), dependency.path())?;
    }

    let mut ecs = EcsWorld::with_policy(config.patrol.overshoot);
    let spawned = ecs.spawn_scene(&scene, &assets)?;
    println!(
        "[scene] spawned {} entities, overshoot policy {}",
        spawned.len(),
        config.patrol.overshoot.label()
    );

    let dt = 1.0 / config.sim.tick_rate.max(1.0);
    let mut clock = FrameClock::new();
    for _ in 0..config.sim.frames {
        ecs.update(dt);
        clock.tick();
    }

    let events = ecs.drain_events();
    let segments =
        events.iter().filter(|event| matches!(event, GameEvent::SegmentReached { .. })).count();
    for event in
        events.iter().filter(|event| !matches!(event, GameEvent::SegmentReached { .. }))
    {
        println!("[events] {event}");
    }
    println!("[patrol] {segments} segment transitions");

    for entity in &spawned {
        if let Some(info) = ecs.patrol_info(*entity) {
            println!(
                "[patrol] entity={} position=({:.2}, {:.2}, {:.2}) segment={}->{} fraction={:.2} speed={:.2}",
                entity.index(),
                info.translation.x,
                info.translation.y,
                info.translation.z,
                info.origin,
                info.target,
                info.fraction,
                info.speed
            );
        }
    }

    println!(
        "[sim] {} frames in {:.1} ms ({:.3} ms/frame)",
        clock.frames(),
        clock.elapsed_seconds() * 1000.0,
        clock.average_frame_seconds() * 1000.0
    );
    Ok(())
}
