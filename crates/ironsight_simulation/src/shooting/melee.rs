//! Melee sweep selection

use crate::scene::{SceneHit, TargetRegistry};
use bevy::prelude::Entity;

fn bears_health(hit: &SceneHit, registry: &TargetRegistry) -> bool {
    registry
        .health_root(hit.owner)
        .and_then(|root| registry.health_of(root))
        .is_some_and(|health| health.accepts_hits)
}

/// Выбор цели sphere sweep'а
///
/// Себя (и свою иерархию) пропускаем. Живая цель с health важнее любой
/// геометрии; среди равных: ближайшая.
pub fn select_melee_hit(hits: &[SceneHit], attacker: Entity, registry: &TargetRegistry) -> Option<SceneHit> {
    let not_self = |hit: &&SceneHit| !registry.is_within(hit.owner, attacker);

    hits.iter()
        .filter(not_self)
        .filter(|hit| bears_health(hit, registry))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
        .or_else(|| hits.iter().filter(not_self).min_by(|a, b| a.distance.total_cmp(&b.distance)))
        .copied()
}
