//! Damage application система
//!
//! Обрабатывает SuccessfulHit события и применяет урон к health root цели:
//! - Body / BodyPart: урон уже с multiplier части тела (HitRecord::damage)
//! - Shield: поглощает, урона нет
//! - World: нет health root, урона нет

use bevy::prelude::*;

use crate::components::Health;
use crate::scene::TargetRegistry;
use crate::shooting::{HitPart, HitRecord, SuccessfulHit};

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв (Health <= 0)
///
/// Ставится в `track_life_state`, снимается при воскрешении.
/// Деспавн не автоматический: трупы остаются на месте.
#[derive(Component, Debug)]
pub struct Dead;

/// Кому и сколько урона от hit record (None = урона нет)
pub fn damage_target(record: &HitRecord, registry: &TargetRegistry) -> Option<(Entity, u32)> {
    if matches!(record.part, HitPart::Shield | HitPart::World) || record.damage == 0 {
        return None;
    }
    let root = registry.health_root(record.target)?;
    Some((root, record.damage))
}

/// Система: apply damage от SuccessfulHit событий
///
/// 1. Читаем SuccessfulHit события
/// 2. Находим health root цели через registry
/// 3. Применяем damage к Health
/// 4. Генерируем DamageDealt и EntityDied события
pub fn apply_hit_damage(
    mut hit_events: EventReader<SuccessfulHit>,
    registry: Res<TargetRegistry>,
    mut targets: Query<&mut Health>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
) {
    for SuccessfulHit(record) in hit_events.read() {
        let Some((target, damage)) = damage_target(record, &registry) else {
            continue;
        };

        let Ok(mut health) = targets.get_mut(target) else {
            crate::log_warning(&format!("⚠️ SuccessfulHit: target {:?} has no Health component", target));
            continue;
        };

        let was_alive = health.is_alive();
        if !was_alive {
            continue;
        }
        health.take_damage(damage);
        let target_died = !health.is_alive();

        crate::log(&format!(
            "💥 Damage applied: {:?} → {:?} ({} damage, health: {})",
            record.instigator, target, damage, health.current
        ));

        damage_dealt_events.write(DamageDealt {
            attacker: record.instigator,
            target,
            damage,
            target_died,
        });

        if target_died {
            entity_died_events.write(EntityDied {
                entity: target,
                killer: Some(record.instigator),
            });
            crate::log_info(&format!("☠️ Entity {:?} killed by {:?}", target, record.instigator));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{HealthStatus, TargetEntry, TargetKind};

    fn record(target: Entity, part: HitPart, damage: u32) -> HitRecord {
        HitRecord {
            position: Vec3::ZERO,
            normal: Vec3::Z,
            damage,
            instigator: Entity::from_raw(99),
            target,
            part,
        }
    }

    fn registry() -> TargetRegistry {
        let mut registry = TargetRegistry::default();
        registry.register(
            Entity::from_raw(1),
            TargetEntry {
                parent: None,
                kind: TargetKind::Body,
                health: Some(HealthStatus {
                    accepts_hits: true,
                    side: Some(1),
                }),
            },
        );
        registry.register(
            Entity::from_raw(2),
            TargetEntry {
                parent: Some(Entity::from_raw(1)),
                kind: TargetKind::BodyPart { damage_multiplier: 2.0 },
                health: None,
            },
        );
        registry
    }

    #[test]
    fn test_body_part_damage_goes_to_health_root() {
        let registry = registry();
        let hit = record(Entity::from_raw(2), HitPart::BodyPart, 30);
        assert_eq!(damage_target(&hit, &registry), Some((Entity::from_raw(1), 30)));
    }

    #[test]
    fn test_shield_and_world_absorb() {
        let registry = registry();
        assert_eq!(damage_target(&record(Entity::from_raw(1), HitPart::Shield, 20), &registry), None);
        assert_eq!(damage_target(&record(Entity::from_raw(7), HitPart::World, 20), &registry), None);
    }

    #[test]
    fn test_lethal_hit_raises_death() {
        let mut world = World::new();
        world.init_resource::<Events<SuccessfulHit>>();
        world.init_resource::<Events<DamageDealt>>();
        world.init_resource::<Events<EntityDied>>();

        let target = world.spawn(Health::new(25)).id();
        let mut registry = TargetRegistry::default();
        registry.register(
            target,
            TargetEntry {
                parent: None,
                kind: TargetKind::Body,
                health: Some(HealthStatus {
                    accepts_hits: true,
                    side: None,
                }),
            },
        );
        world.insert_resource(registry);

        world.send_event(SuccessfulHit(record(target, HitPart::Body, 20)));
        world.send_event(SuccessfulHit(record(target, HitPart::Body, 20)));
        world.send_event(SuccessfulHit(record(target, HitPart::Body, 20)));

        let mut schedule = Schedule::default();
        schedule.add_systems(apply_hit_damage);
        schedule.run(&mut world);

        assert_eq!(world.get::<Health>(target).map(|h| h.current), Some(0));

        let dealt: Vec<DamageDealt> = world
            .resource_mut::<Events<DamageDealt>>()
            .drain()
            .collect();
        // Третий hit по трупу не засчитывается
        assert_eq!(dealt.len(), 2);
        assert!(dealt[1].target_died);

        let died = world.resource::<Events<EntityDied>>();
        assert_eq!(died.len(), 1);
    }
}
