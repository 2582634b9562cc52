//! Tests for the gun rate limiter and ammo accounting.

#[cfg(test)]
mod tests {
    use super::super::gun::*;
    use super::super::weapon::WeaponConfig;
    use crate::arbitration::FriendFilter;
    use bevy::prelude::*;

    fn gun(config: WeaponConfig) -> Gun {
        let mut gun = Gun::new(config);
        gun.allow(true);
        gun.allow_melee(true);
        gun
    }

    #[test]
    fn test_catch_up_fires_four_groups_in_one_long_tick() {
        let mut gun = gun(WeaponConfig {
            rate_of_fire: 20.0,
            magazine: 30,
            ..WeaponConfig::rifle()
        });

        gun.try_fire_now(None);
        let tick = gun.fire_tick(0.2);

        let delays: Vec<f32> = tick.groups.iter().map(|g| g.delay).collect();
        assert_eq!(delays.len(), 4, "delays: {:?}", delays);
        for (delay, expected) in delays.iter().zip([0.0, 0.05, 0.10, 0.15]) {
            assert!((delay - expected).abs() < 1e-4, "delays: {:?}", delays);
        }
        assert_eq!(gun.ammo.loaded, 26);
        assert_eq!(tick.edge, Some(FireEdge::Started));
    }

    #[test]
    fn test_idle_time_does_not_bank_shots() {
        let mut gun = gun(WeaponConfig {
            rate_of_fire: 20.0,
            ..WeaponConfig::rifle()
        });

        // Долгий простой
        for _ in 0..10 {
            assert!(gun.fire_tick(0.2).groups.is_empty());
        }
        assert_eq!(gun.fire_wait(), 0.0);

        gun.try_fire_now(None);
        assert_eq!(gun.fire_tick(1.0 / 60.0).groups.len(), 1);
    }

    #[test]
    fn test_single_consume_with_pellets() {
        let mut gun = gun(WeaponConfig {
            bullets_per_shot: 3,
            consume_single_bullet_per_shot: true,
            magazine: 5,
            rate_of_fire: 2.0,
            ..WeaponConfig::shotgun()
        });

        gun.try_fire_now(None);
        let tick = gun.fire_tick(0.1);
        assert_eq!(tick.groups, vec![ShotGroup { delay: 0.0, projectiles: 3 }]);
        assert_eq!(gun.ammo.loaded, 4);
    }

    #[test]
    fn test_per_projectile_consume_stops_early_when_empty() {
        let mut gun = gun(WeaponConfig {
            bullets_per_shot: 3,
            consume_single_bullet_per_shot: false,
            ..WeaponConfig::shotgun()
        })
        .with_ammo(2);

        gun.try_fire_now(None);
        let tick = gun.fire_tick(0.1);
        assert_eq!(tick.groups.len(), 1);
        assert_eq!(tick.groups[0].projectiles, 2);
        assert_eq!(gun.ammo.loaded, 0);
    }

    #[test]
    fn test_empty_click_is_rate_limited() {
        let mut gun = gun(WeaponConfig {
            rate_of_fire: 2.0,
            ..WeaponConfig::pistol()
        })
        .with_ammo(0);

        gun.try_fire_now(None);
        assert!(gun.fire_tick(0.1).empty_click);

        // 0.5s fire delay ещё не прошло
        gun.try_fire_now(None);
        assert!(!gun.fire_tick(0.1).empty_click);
        assert_eq!(gun.ammo.loaded, 0);
    }

    #[test]
    fn test_fire_when_ready_is_sticky_until_resolved() {
        let mut gun = Gun::new(WeaponConfig::pistol());
        gun.fire_when_ready();

        // Gate закрыт: запрос ждёт
        assert!(gun.fire_tick(0.1).groups.is_empty());
        assert!(gun.is_requested());

        gun.allow(true);
        assert_eq!(gun.fire_tick(0.1).groups.len(), 1);
        assert!(!gun.is_requested());
    }

    #[test]
    fn test_try_fire_now_is_one_tick_only() {
        let mut gun = gun(WeaponConfig::rifle());
        gun.try_fire_now(Some(FriendFilter::Side(2)));
        let first = gun.fire_tick(0.2);
        assert_eq!(first.friend_filter, Some(FriendFilter::Side(2)));

        let second = gun.fire_tick(0.2);
        assert!(second.groups.is_empty());
        assert_eq!(second.edge, Some(FireEdge::Stopped));
    }

    #[test]
    fn test_claim_and_release() {
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let mut gun = Gun::new(WeaponConfig::rifle());

        assert!(gun.try_claim(a));
        assert!(gun.try_claim(a));
        assert!(!gun.try_claim(b));

        gun.release(b);
        assert_eq!(gun.owner, Some(a));

        gun.release(a);
        assert!(gun.try_claim(b));
    }

    #[test]
    fn test_melee_cooldown() {
        let mut knife = gun(WeaponConfig::knife());
        knife.request_melee();
        assert!(knife.take_melee_request());

        knife.request_melee();
        assert!(!knife.take_melee_request());

        knife.fire_tick(1.0);
        knife.request_melee();
        assert!(knife.take_melee_request());
    }
}
