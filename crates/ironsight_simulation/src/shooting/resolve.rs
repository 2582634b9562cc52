//! Raycast → hit resolution (filters, tie-break, friend detection)

use bevy::prelude::*;

use crate::arbitration::FriendFilter;
use crate::scene::{ColliderTag, SceneHit, TargetKind, TargetRegistry};

/// Hits ближе этого: артефакт (коллайдер дула / старт внутри геометрии)
pub const MIN_HIT_DISTANCE: f32 = 0.05;

/// Щит блокирует, если dot(shield_forward, normal) не ниже этого
pub const SHIELD_FACING_LIMIT: f32 = -0.2;

/// Во что попали
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    BodyPart,
    Shield,
    /// Геометрия без health
    World,
}

/// Засчитанное попадание (immutable, живёт один event dispatch)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub position: Vec3,
    pub normal: Vec3,
    pub damage: u32,
    pub instigator: Entity,
    pub target: Entity,
    pub part: HitPart,
}

fn is_shield(hit: &SceneHit, registry: &TargetRegistry) -> bool {
    hit.tag == ColliderTag::Shield || registry.shield_forward(hit.owner).is_some()
}

/// Health root есть, но он больше не принимает hits (мёртвый)
fn refuses_hits(entity: Entity, registry: &TargetRegistry) -> bool {
    registry
        .health_root(entity)
        .and_then(|root| registry.health_of(root))
        .is_some_and(|health| !health.accepts_hits)
}

/// Минимальная distance hit'а для луча из `origin`
///
/// При override origin (камера) всё между ним и дулом не засчитывается:
/// floor = проекция (muzzle - origin) на направление выстрела.
pub fn hit_floor(muzzle: Vec3, origin: Vec3, direction: Vec3) -> f32 {
    (muzzle - origin).dot(direction).max(MIN_HIT_DISTANCE)
}

/// Проходит ли кандидат фильтры
pub fn accepts_hit(hit: &SceneHit, firer: Entity, min_distance: f32, registry: &TargetRegistry) -> bool {
    if hit.distance < min_distance {
        return false;
    }
    if registry.is_within(hit.owner, firer) {
        return false;
    }

    if hit.is_trigger {
        return match hit.tag {
            ColliderTag::BodyPart => !refuses_hits(hit.owner, registry),
            ColliderTag::Shield => registry
                .shield_forward(hit.owner)
                .is_none_or(|forward| forward.dot(hit.normal) >= SHIELD_FACING_LIMIT),
            ColliderTag::Untagged => false,
        };
    }

    !refuses_hits(hit.owner, registry)
}

/// Ближайший принятый hit; при равной distance: первый в порядке query
pub fn select_hit(
    hits: &[SceneHit],
    firer: Entity,
    min_distance: f32,
    registry: &TargetRegistry,
) -> Option<SceneHit> {
    hits.iter()
        .filter(|hit| accepts_hit(hit, firer, min_distance, registry))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
        .copied()
}

/// Friend hit: засчитывать нельзя (ammo и эффекты остаются)
pub fn is_friend(hit: &SceneHit, firer: Entity, filter: FriendFilter, registry: &TargetRegistry) -> bool {
    if is_shield(hit, registry) {
        return false;
    }
    let Some(root) = registry.health_root(hit.owner) else {
        return false;
    };

    match filter {
        FriendFilter::SelfIgnore => root == firer,
        FriendFilter::Side(side) => root == firer || registry.side_of(root) == Some(side),
    }
}

pub fn hit_part(hit: &SceneHit, registry: &TargetRegistry) -> HitPart {
    if is_shield(hit, registry) {
        return HitPart::Shield;
    }
    let kind = registry.lookup(hit.owner).map(|entry| entry.kind);
    if hit.tag == ColliderTag::BodyPart || matches!(kind, Some(TargetKind::BodyPart { .. })) {
        return HitPart::BodyPart;
    }
    if registry.health_root(hit.owner).is_some() {
        HitPart::Body
    } else {
        HitPart::World
    }
}

/// Hit → record (damage с multiplier части тела)
pub fn build_record(hit: &SceneHit, instigator: Entity, base_damage: u32, registry: &TargetRegistry) -> HitRecord {
    let multiplier = registry.damage_multiplier(hit.owner);
    HitRecord {
        position: hit.point,
        normal: hit.normal,
        damage: (base_damage as f32 * multiplier).round() as u32,
        instigator,
        target: hit.owner,
        part: hit_part(hit, registry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{HealthStatus, TargetEntry};

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    fn hit(owner: Entity, distance: f32) -> SceneHit {
        SceneHit {
            point: Vec3::new(0.0, 0.0, -distance),
            normal: Vec3::Z,
            distance,
            tag: ColliderTag::Untagged,
            is_trigger: false,
            owner,
        }
    }

    fn agent(side: u64, alive: bool) -> TargetEntry {
        TargetEntry {
            parent: None,
            kind: TargetKind::Body,
            health: Some(HealthStatus {
                accepts_hits: alive,
                side: Some(side),
            }),
        }
    }

    fn registry() -> TargetRegistry {
        let mut registry = TargetRegistry::default();
        registry.register(entity(1), agent(1, true)); // firer
        registry.register(entity(2), agent(1, true)); // союзник
        registry.register(entity(3), agent(2, true)); // враг
        registry.register(entity(4), agent(2, false)); // мёртвый враг
        registry.register(
            entity(5),
            TargetEntry {
                parent: Some(entity(3)),
                kind: TargetKind::Shield { forward: Vec3::Z },
                health: None,
            },
        );
        registry.register(
            entity(6),
            TargetEntry {
                parent: Some(entity(1)),
                kind: TargetKind::BodyPart { damage_multiplier: 2.0 },
                health: None,
            },
        );
        registry
    }

    #[test]
    fn test_closest_accepted_hit_wins_ties_keep_query_order() {
        let registry = registry();
        let hits = [hit(entity(3), 10.0), hit(entity(2), 5.0), hit(entity(9), 5.0)];

        let selected = select_hit(&hits, entity(1), MIN_HIT_DISTANCE, &registry);
        assert_eq!(selected.map(|h| h.owner), Some(entity(2)));
    }

    #[test]
    fn test_filters() {
        let registry = registry();
        let firer = entity(1);

        // Собственная иерархия
        assert!(!accepts_hit(&hit(entity(6), 3.0), firer, MIN_HIT_DISTANCE, &registry));
        // Слишком близко
        assert!(!accepts_hit(&hit(entity(3), 0.01), firer, MIN_HIT_DISTANCE, &registry));
        // Мёртвый: насквозь
        assert!(!accepts_hit(&hit(entity(4), 3.0), firer, MIN_HIT_DISTANCE, &registry));
        // Нетегированный trigger
        let mut trigger = hit(entity(3), 3.0);
        trigger.is_trigger = true;
        assert!(!accepts_hit(&trigger, firer, MIN_HIT_DISTANCE, &registry));
        trigger.tag = ColliderTag::BodyPart;
        assert!(accepts_hit(&trigger, firer, MIN_HIT_DISTANCE, &registry));
        // Стена без registry записи
        assert!(accepts_hit(&hit(entity(9), 3.0), firer, MIN_HIT_DISTANCE, &registry));
    }

    #[test]
    fn test_override_origin_raises_floor() {
        let registry = registry();
        // Камера на 3.5m позади дула: стена на 1.2m от камеры лежит за оружием
        let floor = hit_floor(Vec3::new(0.2, 1.4, -0.5), Vec3::new(0.2, 1.4, 3.0), Vec3::NEG_Z);
        assert!((floor - 3.5).abs() < 1e-5);

        let hits = [hit(entity(9), 1.2), hit(entity(3), 13.0)];
        let selected = select_hit(&hits, entity(1), floor, &registry);
        assert_eq!(selected.map(|h| h.owner), Some(entity(3)));

        // Origin впереди дула: floor не опускается ниже константы
        let ahead = hit_floor(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::NEG_Z);
        assert_eq!(ahead, MIN_HIT_DISTANCE);
    }

    #[test]
    fn test_shield_facing() {
        let registry = registry();
        let mut shield = hit(entity(5), 3.0);
        shield.tag = ColliderTag::Shield;
        shield.is_trigger = true;

        shield.normal = Vec3::Z;
        assert!(accepts_hit(&shield, entity(1), MIN_HIT_DISTANCE, &registry));
        shield.normal = Vec3::new(0.0, 0.0, -1.0);
        assert!(!accepts_hit(&shield, entity(1), MIN_HIT_DISTANCE, &registry));

        // Щит никогда не friend, даже той же фракции
        assert!(!is_friend(&shield, entity(1), FriendFilter::Side(2), &registry));
        assert_eq!(hit_part(&shield, &registry), HitPart::Shield);
    }

    #[test]
    fn test_friend_detection() {
        let registry = registry();
        let firer = entity(1);

        assert!(is_friend(&hit(entity(2), 4.0), firer, FriendFilter::Side(1), &registry));
        assert!(!is_friend(&hit(entity(3), 4.0), firer, FriendFilter::Side(1), &registry));
        assert!(!is_friend(&hit(entity(2), 4.0), firer, FriendFilter::SelfIgnore, &registry));
        assert!(!is_friend(&hit(entity(9), 4.0), firer, FriendFilter::Side(1), &registry));
    }

    #[test]
    fn test_body_part_damage_multiplier() {
        let registry = registry();
        let record = build_record(&hit(entity(6), 2.0), entity(3), 15, &registry);
        assert_eq!(record.damage, 30);
        assert_eq!(record.part, HitPart::BodyPart);

        let wall = build_record(&hit(entity(9), 2.0), entity(3), 15, &registry);
        assert_eq!(wall.part, HitPart::World);
    }
}
