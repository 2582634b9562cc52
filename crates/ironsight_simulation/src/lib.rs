//! IRONSIGHT Simulation Core
//!
//! ECS-симуляция боевого поведения агентов на Bevy 0.16
//!
//! HYBRID ARCHITECTURE:
//! - ECS = decision layer (arbitration, equip/reload, cover, fire resolution)
//! - Host = animation graph, physics geometry, scene queries, rendering
//!
//! Граница с host'ом: message passing: intents и sensors внутрь,
//! trigger outbox (`Animator`) и outbound events наружу.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod animation;
pub mod arbitration;
pub mod combat;
pub mod components;
pub mod config;
pub mod cover;
pub mod equipment;
pub mod logger;
pub mod scene;
pub mod shooting;

// Re-export базовых типов для удобства
pub use animation::{AnimationCallback, AnimationOracle, Animator, CallbackKind, Motion};
pub use arbitration::{AgentState, ArbitrationPlugin, CurrentAction, FriendFilter, IntentSet, Jumped, Landed};
pub use combat::{CombatPlugin, DamageDealt, Dead, EntityDied};
pub use components::*;
pub use config::{CombatConfig, ConfigError};
pub use cover::{CoverOffsets, CoverPlugin, CoverSpot, EnteredCover, ExitedCover};
pub use equipment::{
    BulletLoaded, EquipState, EquipmentPlugin, FullyLoaded, Pumped, ReloadCycle, WeaponChanged, WeaponHolder,
};
pub use logger::*;
pub use scene::{HitTarget, SceneHit, SceneQueries, SceneQuery, ScenePlugin, SphereScene, TargetRegistry};
pub use shooting::{
    EmptyFire, FireStarted, FireStopped, Fired, Gun, Recoil, ShootingPlugin, SuccessfulHit, Unzoomed, WeaponConfig,
    Zoomed,
};

/// Фазы simulation tick'а (FixedUpdate, строго последовательно)
///
/// 1. Sense: host sensors, life state, target registry
/// 2. Arbitrate: movement + exclusive actions
/// 3. Equip: equip/unequip lifecycle, reload cycle
/// 4. Cover: enter / maintain / exit
/// 5. Gate: aim/fire gate
/// 6. CoverOffset: side peek / back step sub-FSM
/// 7. Weapons: fire resolution, recoil
/// 8. Damage: hit records → Health
/// 9. Cleanup: one-shot intents
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    Sense,
    Arbitrate,
    Equip,
    Cover,
    Gate,
    CoverOffset,
    Weapons,
    Damage,
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Детерминистичный RNG (seed по умолчанию, если host не вставил свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
        if !app.world().contains_resource::<CombatConfig>() {
            app.init_resource::<CombatConfig>();
        }

        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .configure_sets(
                FixedUpdate,
                (
                    TickSet::Sense,
                    TickSet::Arbitrate,
                    TickSet::Equip,
                    TickSet::Cover,
                    TickSet::Gate,
                    TickSet::CoverOffset,
                    TickSet::Weapons,
                    TickSet::Damage,
                    TickSet::Cleanup,
                )
                    .chain(),
            )
            .add_event::<AnimationCallback>()
            // Подсистемы
            .add_plugins((
                ScenePlugin,
                ArbitrationPlugin,
                EquipmentPlugin,
                CoverPlugin,
                ShootingPlugin,
                CombatPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную: один `app.update()` = один fixed tick
/// (первый update: нулевой delta, FixedUpdate ещё не срабатывает).
/// `SimulationPlugin` добавляет вызывающий (после своих SceneQueries / config).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Debug-snapshot всех `T` в мире (сравнение прогонов на детерминизм)
///
/// Порядок: по `Entity::to_bits`, так что результат не зависит от
/// порядка итерации archetype'ов.
pub fn world_snapshot<T>(world: &mut World) -> Vec<u8>
where
    T: Component + std::fmt::Debug,
{
    let mut query = world.query::<(Entity, &T)>();
    let mut rows: Vec<(u64, String)> = query
        .iter(world)
        .map(|(entity, component)| (entity.to_bits(), format!("{:?}", component)))
        .collect();
    rows.sort_by_key(|(bits, _)| *bits);

    rows.into_iter()
        .flat_map(|(bits, row)| {
            let mut bytes = bits.to_le_bytes().to_vec();
            bytes.extend_from_slice(row.as_bytes());
            bytes.push(b'\n');
            bytes
        })
        .collect()
}
