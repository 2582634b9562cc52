//! Headless симуляция IRONSIGHT
//!
//! Два агента разных фракций, стрелок держит винтовку и стреляет по
//! противнику в sphere scene. Animator detached: все переходы мгновенные.

use bevy::prelude::*;
use ironsight_simulation::scene::SceneSphere;
use ironsight_simulation::*;

fn main() {
    let seed = 42;
    log_info(&format!("Starting IRONSIGHT headless simulation (seed: {})", seed));

    let mut app = create_headless_app(seed);

    let target_position = Vec3::new(0.0, 1.0, -20.0);
    let world = app.world_mut();
    let target = world
        .spawn((
            Actor { faction_id: 2 },
            Health::new(200),
            Animator::detached(),
            Transform::from_translation(target_position - Vec3::Y),
        ))
        .id();

    world.insert_resource(SceneQueries::new(SphereScene::new().with_sphere(SceneSphere {
        center: target_position,
        radius: 0.6,
        owner: target,
        tag: scene::ColliderTag::Untagged,
        is_trigger: false,
    })));
    app.add_plugins(SimulationPlugin);

    let world = app.world_mut();
    let rifle = world.spawn(Gun::new(WeaponConfig::rifle())).id();
    let shooter = world
        .spawn((
            Actor { faction_id: 1 },
            Animator::detached(),
            WeaponHolder::with_target(rifle),
            AimTarget(target_position),
        ))
        .id();

    // Запускаем 600 тиков симуляции (10 секунд)
    for tick in 0..600 {
        if let Some(mut intents) = app.world_mut().get_mut::<IntentSet>(shooter) {
            intents.input_aim();
            intents.input_fire_on_condition(1);
            if tick % 120 == 0 {
                intents.input_reload();
            }
        }
        app.update();

        if tick % 100 == 0 {
            let health = app.world().get::<Health>(target).map(|h| h.current).unwrap_or(0);
            let ammo = app.world().get::<Gun>(rifle).map(|g| g.ammo.loaded).unwrap_or(0);
            log_info(&format!("Tick {}: target health {}, rifle ammo {}", tick, health, ammo));
        }
    }

    log_info("Simulation complete!");
}
