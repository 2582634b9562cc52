//! Target registry: кто есть кто для hit filter
//!
//! Явный resource вместо глобальных таблиц: scene objects → роль (body /
//! body part / shield / prop) + ownership parent + health root.
//! Синхронизируется из `HitTarget` + `Health` компонентов каждый tick.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::components::{Actor, Health};

/// Защита от циклов в parent chain
const MAX_LINEAGE_DEPTH: usize = 32;

/// Роль scene object для hit resolution
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TargetKind {
    /// Тело агента / разрушаемого объекта
    #[default]
    Body,
    /// Hitbox части тела (урон × multiplier, health у parent)
    BodyPart { damage_multiplier: f32 },
    /// Направленный щит (блокирует, урона не получает)
    Shield { forward: Vec3 },
    /// Статика без health
    Prop,
}

/// Компонент: регистрация entity в `TargetRegistry`
///
/// `parent`: владелец (body part → агент, щит → агент, оружие → агент).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct HitTarget {
    pub parent: Option<Entity>,
    pub kind: TargetKind,
}

impl HitTarget {
    pub fn body_part(owner: Entity, damage_multiplier: f32) -> Self {
        Self {
            parent: Some(owner),
            kind: TargetKind::BodyPart { damage_multiplier },
        }
    }

    pub fn shield(owner: Entity, forward: Vec3) -> Self {
        Self {
            parent: Some(owner),
            kind: TargetKind::Shield {
                forward: forward.normalize_or_zero(),
            },
        }
    }

    pub fn prop() -> Self {
        Self {
            parent: None,
            kind: TargetKind::Prop,
        }
    }
}

/// Health-часть записи (есть только у health root кандидатов)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthStatus {
    /// false = мёртвый (hits проходят насквозь)
    pub accepts_hits: bool,
    /// Faction ID (None = нейтральный объект)
    pub side: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetEntry {
    pub parent: Option<Entity>,
    pub kind: TargetKind,
    pub health: Option<HealthStatus>,
}

/// Resource: registry всех hit targets
#[derive(Resource, Debug, Default)]
pub struct TargetRegistry {
    entries: HashMap<Entity, TargetEntry>,
}

impl TargetRegistry {
    pub fn register(&mut self, entity: Entity, entry: TargetEntry) {
        self.entries.insert(entity, entry);
    }

    pub fn unregister(&mut self, entity: Entity) -> Option<TargetEntry> {
        self.entries.remove(&entity)
    }

    pub fn lookup(&self, entity: Entity) -> Option<&TargetEntry> {
        self.entries.get(&entity)
    }

    /// Self + все предки (ограничено `MAX_LINEAGE_DEPTH`)
    pub fn lineage(&self, entity: Entity) -> impl Iterator<Item = Entity> + '_ {
        std::iter::successors(Some(entity), move |current| {
            self.entries.get(current).and_then(|entry| entry.parent)
        })
        .take(MAX_LINEAGE_DEPTH)
    }

    /// `entity` == `root` или потомок `root` (firer hierarchy check)
    pub fn is_within(&self, entity: Entity, root: Entity) -> bool {
        self.lineage(entity).any(|ancestor| ancestor == root)
    }

    /// Ближайший ancestor-or-self с health
    pub fn health_root(&self, entity: Entity) -> Option<Entity> {
        self.lineage(entity).find(|ancestor| {
            self.entries
                .get(ancestor)
                .is_some_and(|entry| entry.health.is_some())
        })
    }

    pub fn health_of(&self, entity: Entity) -> Option<HealthStatus> {
        self.entries.get(&entity).and_then(|entry| entry.health)
    }

    pub fn side_of(&self, entity: Entity) -> Option<u64> {
        self.health_root(entity)
            .and_then(|root| self.health_of(root))
            .and_then(|health| health.side)
    }

    /// Forward щита (None если entity не щит)
    pub fn shield_forward(&self, entity: Entity) -> Option<Vec3> {
        match self.entries.get(&entity)?.kind {
            TargetKind::Shield { forward } => Some(forward),
            _ => None,
        }
    }

    pub fn damage_multiplier(&self, entity: Entity) -> f32 {
        match self.entries.get(&entity).map(|entry| entry.kind) {
            Some(TargetKind::BodyPart { damage_multiplier }) => damage_multiplier.max(0.0),
            _ => 1.0,
        }
    }
}

/// Система: sync registry из `HitTarget` / `Health` / `Actor`
///
/// Changed-фильтр → O(изменений), удалённые HitTarget убираются из registry.
pub fn sync_target_registry(
    mut registry: ResMut<TargetRegistry>,
    changed: Query<
        (Entity, &HitTarget, Option<&Health>, Option<&Actor>),
        Or<(Changed<HitTarget>, Changed<Health>, Changed<Actor>)>,
    >,
    mut removed: RemovedComponents<HitTarget>,
) {
    for entity in removed.read() {
        if registry.unregister(entity).is_some() {
            crate::logger::log(&format!("🗑️ Target {:?} unregistered", entity));
        }
    }

    for (entity, target, health, actor) in changed.iter() {
        let health = health.map(|health| HealthStatus {
            accepts_hits: health.is_alive(),
            side: actor.map(|actor| actor.faction_id),
        });

        registry.register(
            entity,
            TargetEntry {
                parent: target.parent,
                kind: target.kind,
                health,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    fn agent_entry(side: u64) -> TargetEntry {
        TargetEntry {
            parent: None,
            kind: TargetKind::Body,
            health: Some(HealthStatus {
                accepts_hits: true,
                side: Some(side),
            }),
        }
    }

    #[test]
    fn test_body_part_resolves_to_owner_health_root() {
        let mut registry = TargetRegistry::default();
        registry.register(entity(1), agent_entry(7));
        registry.register(
            entity(2),
            TargetEntry {
                parent: Some(entity(1)),
                kind: TargetKind::BodyPart { damage_multiplier: 2.0 },
                health: None,
            },
        );

        assert_eq!(registry.health_root(entity(2)), Some(entity(1)));
        assert_eq!(registry.side_of(entity(2)), Some(7));
        assert_eq!(registry.damage_multiplier(entity(2)), 2.0);
        assert!(registry.is_within(entity(2), entity(1)));
        assert!(!registry.is_within(entity(1), entity(2)));
    }

    #[test]
    fn test_unknown_entity_has_no_root() {
        let registry = TargetRegistry::default();
        assert_eq!(registry.health_root(entity(99)), None);
        assert_eq!(registry.damage_multiplier(entity(99)), 1.0);
        assert_eq!(registry.lineage(entity(99)).count(), 1);
    }

    #[test]
    fn test_parent_cycle_is_bounded() {
        let mut registry = TargetRegistry::default();
        let prop = |parent| TargetEntry {
            parent: Some(parent),
            kind: TargetKind::Prop,
            health: None,
        };
        registry.register(entity(1), prop(entity(2)));
        registry.register(entity(2), prop(entity(1)));

        assert_eq!(registry.lineage(entity(1)).count(), MAX_LINEAGE_DEPTH);
        assert_eq!(registry.health_root(entity(1)), None);
    }

    #[test]
    fn test_sync_registers_and_unregisters() {
        let mut world = World::new();
        world.init_resource::<TargetRegistry>();

        let agent = world.spawn((HitTarget::default(), Health::new(50))).id();
        let shield = world.spawn(HitTarget::shield(agent, Vec3::Z)).id();

        world.run_system_once(sync_target_registry).expect("system runs");
        {
            let registry = world.resource::<TargetRegistry>();
            assert!(registry.lookup(agent).is_some());
            assert_eq!(registry.shield_forward(shield), Some(Vec3::Z));
            assert_eq!(registry.health_root(shield), Some(agent));
        }

        world.entity_mut(shield).remove::<HitTarget>();
        world.run_system_once(sync_target_registry).expect("system runs");
        assert!(world.resource::<TargetRegistry>().lookup(shield).is_none());
    }
}
