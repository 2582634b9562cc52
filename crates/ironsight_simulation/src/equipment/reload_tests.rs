//! Tests for the reload cycle (magazine, bullet-by-bullet, pump).

#[cfg(test)]
mod tests {
    use super::super::reload::*;
    use crate::animation::{Animator, Motion};
    use crate::shooting::{Gun, WeaponConfig};

    fn shotgun(loaded: u32) -> Gun {
        Gun::new(WeaponConfig {
            magazine: 4,
            ..WeaponConfig::shotgun()
        })
        .with_ammo(loaded)
    }

    #[test]
    fn test_magazine_reload_waits_for_callback() {
        let mut gun = Gun::new(WeaponConfig::rifle()).with_ammo(3);
        let mut animator = Animator::default();
        let mut cycle = ReloadCycle::default();

        assert!(cycle.request_reload(&mut gun, &mut animator).is_empty());
        assert_eq!(cycle.phase, ReloadPhase::LoadingMagazine);
        assert_eq!(animator.pending_triggers(), &[Motion::ReloadMagazine]);

        // Stale bullet callback не действует на magazine reload
        assert!(cycle.on_bullet_loaded(&mut gun, &mut animator).is_empty());

        let outcome = cycle.on_magazine_loaded(&mut gun, &mut animator);
        assert!(outcome.fully_loaded);
        assert_eq!(gun.ammo.loaded, 30);
        assert!(cycle.is_idle());
    }

    #[test]
    fn test_bullets_load_one_per_callback_then_pump() {
        let mut gun = shotgun(2);
        let mut animator = Animator::default();
        let mut cycle = ReloadCycle::default();

        cycle.request_reload(&mut gun, &mut animator);
        assert_eq!(cycle.phase, ReloadPhase::LoadingBullet);

        let first = cycle.on_bullet_loaded(&mut gun, &mut animator);
        assert!(first.bullet_loaded && !first.fully_loaded);
        assert_eq!(gun.ammo.loaded, 3);
        assert_eq!(cycle.phase, ReloadPhase::LoadingBullet);

        let last = cycle.on_bullet_loaded(&mut gun, &mut animator);
        assert!(last.bullet_loaded && last.fully_loaded);
        assert_eq!(cycle.phase, ReloadPhase::Pumping);
        assert!(animator.pending_triggers().contains(&Motion::Pump));

        assert!(cycle.on_pumped(&mut gun, &mut animator).pumped);
        assert!(cycle.is_idle());
    }

    #[test]
    fn test_reload_during_pending_pump_is_deferred() {
        let mut gun = shotgun(1);
        let mut animator = Animator::default();
        let mut cycle = ReloadCycle::default();

        cycle.schedule_pump(0.2);
        assert!(cycle.request_reload(&mut gun, &mut animator).is_empty());
        assert!(cycle.has_deferred_reload());
        assert_eq!(cycle.phase, ReloadPhase::Idle);

        // Countdown
        assert!(cycle.tick(0.1, &mut gun, &mut animator, 2.0).is_empty());
        cycle.tick(0.15, &mut gun, &mut animator, 2.0);
        assert_eq!(cycle.phase, ReloadPhase::Pumping);

        // Второй запрос: всё тот же один слот
        cycle.request_reload(&mut gun, &mut animator);

        let outcome = cycle.on_pumped(&mut gun, &mut animator);
        assert!(outcome.pumped);
        assert_eq!(cycle.phase, ReloadPhase::LoadingBullet);
        assert!(!cycle.has_deferred_reload());
    }

    #[test]
    fn test_interrupt_only_during_bullet_load() {
        let mut gun = shotgun(1);
        let mut animator = Animator::default();
        let mut cycle = ReloadCycle::default();

        assert!(!cycle.interrupt(&mut animator));

        cycle.request_reload(&mut gun, &mut animator);
        assert!(cycle.interrupt(&mut animator));
        assert!(animator.pending_triggers().contains(&Motion::InterruptReload));
        assert!(cycle.is_idle());

        // Поздний callback после interrupt: stale
        assert!(cycle.on_bullet_loaded(&mut gun, &mut animator).is_empty());
        assert_eq!(gun.ammo.loaded, 1);
    }

    #[test]
    fn test_silent_oracle_forces_magazine() {
        let mut gun = Gun::new(WeaponConfig::pistol()).with_ammo(0);
        let mut animator = Animator::default();
        let mut cycle = ReloadCycle::default();
        cycle.request_reload(&mut gun, &mut animator);

        let mut outcome = ReloadOutcome::default();
        for _ in 0..25 {
            outcome = cycle.tick(0.1, &mut gun, &mut animator, 2.0);
            if !outcome.is_empty() {
                break;
            }
        }
        assert!(outcome.forced && outcome.fully_loaded);
        assert_eq!(gun.ammo.loaded, 12);
    }

    #[test]
    fn test_detached_animator_loads_everything_at_once() {
        let mut gun = shotgun(0);
        let mut animator = Animator::detached();
        let mut cycle = ReloadCycle::default();

        let outcome = cycle.request_reload(&mut gun, &mut animator);
        assert!(outcome.bullet_loaded && outcome.fully_loaded && outcome.pumped);
        assert_eq!(gun.ammo.loaded, 4);
        assert!(cycle.is_idle());
    }

    #[test]
    fn test_reserve_limits_reload() {
        let mut gun = Gun::new(WeaponConfig {
            reserve: Some(0),
            ..WeaponConfig::rifle()
        })
        .with_ammo(5);
        let mut animator = Animator::default();
        let mut cycle = ReloadCycle::default();

        assert!(cycle.request_reload(&mut gun, &mut animator).is_empty());
        assert!(cycle.is_idle());
    }
}
