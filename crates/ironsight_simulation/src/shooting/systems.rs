//! Shooting system implementations
//!
//! # Systems
//!
//! - `gate_aim_and_fire`: aim/zoom state, fire routing, разрешение стрельбы
//! - `resolve_weapon_fire`: rate limiter → spread → raycast → hit records; melee sweep
//! - `decay_recoil`: внешний recoil из intents + линейное затухание

use bevy::prelude::*;

use super::events::*;
use super::gun::{FireEdge, Gun};
use super::melee::select_melee_hit;
use super::recoil::Recoil;
use super::resolve::{build_record, hit_floor, is_friend, select_hit};
use super::spread;
use crate::animation::{AnimationOracle, Animator, Motion};
use crate::arbitration::{AgentState, IntentSet};
use crate::components::{AimTarget, RaycastOriginOverride};
use crate::config::CombatConfig;
use crate::cover::{CoverOffsets, DesiredOffsets};
use crate::equipment::{ReloadCycle, ReloadPhase, WeaponHolder};
use crate::scene::{SceneQueries, TargetRegistry};
use crate::DeterministicRng;

/// Система: aim/fire gate
///
/// Aiming: aim intent + alive + idle action + оружие equipped и в руке.
/// Fire permitted: aiming + оружие готово (нет reload/pump) + ствол не
/// заблокирован + в укрытии ни одна offset ось не в полёте (кроме can-aim)
/// и не стоит на пороге Entering.
pub fn gate_aim_and_fire(
    config: Res<CombatConfig>,
    mut agents: Query<(
        Entity,
        &IntentSet,
        &mut AgentState,
        &WeaponHolder,
        &mut ReloadCycle,
        &CoverOffsets,
        &mut Animator,
    )>,
    mut guns: Query<&mut Gun>,
    mut zoomed: EventWriter<Zoomed>,
    mut unzoomed: EventWriter<Unzoomed>,
) {
    for (agent, intents, mut state, holder, mut reload, offsets, mut animator) in agents.iter_mut() {
        let idle = state.alive && state.action.is_idle();
        let aiming = idle && intents.aim && holder.is_ready();
        let zoom = aiming && intents.zoom;

        match (state.zoomed, zoom) {
            (false, true) => {
                zoomed.write(Zoomed { agent });
            }
            (true, false) => {
                unzoomed.write(Unzoomed { agent });
            }
            _ => {}
        }
        state.aiming = aiming;
        state.zoomed = zoom;

        let Some(mut gun) = holder.in_hand().and_then(|weapon| guns.get_mut(weapon).ok()) else {
            continue;
        };

        if !state.alive {
            gun.cancel_fire();
            gun.allow(false);
            gun.allow_melee(false);
            continue;
        }

        let offsets_clear = match state.cover {
            Some(cover) if aiming => offsets.permits_aim_toward(
                DesiredOffsets::for_aim(&cover, &config.cover),
                state.is_moving(),
                &*animator,
            ),
            Some(_) => offsets.permits_aim(),
            None => true,
        };
        // Всё кроме reload: interrupt только ради выстрела, который gate пропустит
        let gate_open = aiming && !state.weapon_blocked && offsets_clear;

        let mut wants_fire = intents.fire.is_some() || intents.fire_when_ready;
        if wants_fire && reload.phase == ReloadPhase::LoadingBullet && !gun.config.is_melee() {
            if gate_open && gun.config.fire_interrupts_reload {
                reload.interrupt(&mut *animator);
                crate::log(&format!("✋ {:?} interrupted bullet reload to fire", agent));
            } else {
                wants_fire = false;
            }
        }

        let ready = holder.is_ready() && reload.is_idle();
        let permitted = gate_open && ready;

        if gun.config.is_melee() {
            if wants_fire || intents.melee {
                gun.request_melee();
            }
            gun.allow(false);
        } else {
            if wants_fire {
                if let Some(fire) = intents.fire {
                    gun.try_fire_now(fire.friend_filter);
                }
                if intents.fire_when_ready {
                    gun.fire_when_ready();
                }
            }
            if intents.melee {
                gun.request_melee();
            }
            gun.allow(permitted);
        }
        gun.allow_melee(idle && ready);
    }
}

/// Луч выстрела до spread
struct AimRay {
    origin: Vec3,
    direction: Vec3,
    /// Дуло в мире: от него считается floor при override origin
    muzzle: Vec3,
}

fn aim_ray(
    transform: &Transform,
    muzzle_offset: [f32; 3],
    aim_target: Option<&AimTarget>,
    origin_override: Option<&RaycastOriginOverride>,
) -> AimRay {
    let muzzle = transform.translation + transform.rotation * Vec3::from_array(muzzle_offset);
    let origin = origin_override.map_or(muzzle, |o| o.0);

    let forward = transform.forward().as_vec3();
    let direction = aim_target
        .map(|target| (target.0 - origin).normalize_or(forward))
        .unwrap_or(forward);

    AimRay {
        origin,
        direction,
        muzzle,
    }
}

/// Система: weapon fire resolution (после gate и cover offsets)
///
/// 1. Rate limiter (catch-up loop) → shot groups
/// 2. Каждый projectile: spread → raycast → ближайший принятый hit за floor дула
/// 3. Friend suppression: ammo и отдача тратятся, hit не засчитывается
/// 4. Melee: sphere sweep, приоритет целям с health
pub fn resolve_weapon_fire(
    time: Res<Time<Fixed>>,
    config: Res<CombatConfig>,
    scene: Res<SceneQueries>,
    registry: Res<TargetRegistry>,
    mut rng: ResMut<DeterministicRng>,
    mut agents: Query<(
        Entity,
        &AgentState,
        &WeaponHolder,
        &Transform,
        Option<&AimTarget>,
        Option<&RaycastOriginOverride>,
        &mut Recoil,
        &mut Animator,
    )>,
    mut guns: Query<&mut Gun>,
    mut fired: EventWriter<Fired>,
    mut empty_fire: EventWriter<EmptyFire>,
    mut fire_started: EventWriter<FireStarted>,
    mut fire_stopped: EventWriter<FireStopped>,
    mut hits: EventWriter<SuccessfulHit>,
) {
    let dt = time.delta_secs();

    for (agent, state, holder, transform, aim_target, origin_override, mut recoil, mut animator) in agents.iter_mut() {
        let Some(weapon) = holder.in_hand() else {
            continue;
        };
        let Ok(mut gun) = guns.get_mut(weapon) else {
            continue;
        };

        let tick = gun.fire_tick(dt);
        match tick.edge {
            Some(FireEdge::Started) => {
                fire_started.write(FireStarted { agent, weapon });
            }
            Some(FireEdge::Stopped) => {
                fire_stopped.write(FireStopped { agent, weapon });
            }
            None => {}
        }
        if tick.empty_click {
            empty_fire.write(EmptyFire { agent, weapon });
        }

        let ray = aim_ray(transform, gun.config.muzzle_offset, aim_target, origin_override);

        // === Melee ===
        if gun.take_melee_request() {
            animator.request_trigger(Motion::Melee);
            let sweep = scene
                .0
                .sphere_sweep(ray.origin, gun.config.melee_radius, ray.direction, gun.config.distance);

            if let Some(hit) = select_melee_hit(&sweep, agent, &registry) {
                let record = build_record(&hit, agent, gun.config.melee_damage, &registry);
                crate::log(&format!(
                    "🗡️ {:?} melee hit {:?} ({:?}, {} dmg)",
                    agent, record.target, record.part, record.damage
                ));
                hits.write(SuccessfulHit(record));
            }
        }

        if tick.groups.is_empty() {
            continue;
        }

        // === Ranged ===
        let multiplier = if state.zoomed {
            config.aim.zoom_error_multiplier
        } else {
            1.0
        };
        let half_angle = spread::half_angle(
            gun.config.spread_degrees,
            multiplier,
            config.aim.movement_error * state.move_magnitude,
        );

        let mut landed_groups = 0;
        for group in tick.groups.iter().filter(|group| group.projectiles > 0) {
            let direction = recoil.apply(ray.direction);
            let mut suppressed_all = true;

            for _ in 0..group.projectiles {
                let offset = spread::sample_offset(&mut rng.rng);
                let shot = spread::apply_offset(direction, offset, half_angle);
                let candidates = scene.0.raycast(ray.origin, shot, gun.config.distance);
                let floor = hit_floor(ray.muzzle, ray.origin, shot);

                let Some(hit) = select_hit(&candidates, agent, floor, &registry) else {
                    suppressed_all = false;
                    continue;
                };
                if tick
                    .friend_filter
                    .is_some_and(|filter| is_friend(&hit, agent, filter, &registry))
                {
                    continue;
                }
                suppressed_all = false;

                let record = build_record(&hit, agent, gun.config.damage, &registry);
                hits.write(SuccessfulHit(record));
            }

            if !suppressed_all {
                landed_groups += 1;
            }
            recoil.add(gun.config.recoil_vertical, gun.config.recoil_horizontal);
            animator.request_trigger(Motion::Fire);
        }

        if landed_groups > 0 {
            fired.write(Fired {
                agent,
                weapon,
                groups: landed_groups,
            });
        } else {
            crate::log(&format!("🤝 {:?}: friendly target in line of fire, hits suppressed", agent));
        }
    }
}

/// Система: recoil (внешний input + decay)
pub fn decay_recoil(
    time: Res<Time<Fixed>>,
    config: Res<CombatConfig>,
    mut agents: Query<(&IntentSet, &mut Recoil)>,
) {
    let dt = time.delta_secs();
    for (intents, mut recoil) in agents.iter_mut() {
        if intents.recoil != Vec2::ZERO {
            recoil.add(intents.recoil.x, intents.recoil.y);
        }
        if !recoil.is_settled() {
            recoil.decay(dt, config.recoil.base_recovery);
        }
    }
}
