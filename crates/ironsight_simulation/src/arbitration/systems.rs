//! Arbitration system implementations
//!
//! Порядок внутри tick'а задаёт `TickSet` (lib.rs):
//! Sense → Arbitrate → Equip → Cover → Gate → CoverOffset → Weapons → Damage → Cleanup

use bevy::prelude::*;

use super::action::{
    advance_action, arbitrate, pick_request, ActionProgress, ActionRequest, Arbitration,
    ArbitrationContext,
};
use super::events::{Jumped, Landed};
use super::intents::IntentSet;
use super::state::AgentState;
use crate::animation::{AnimationOracle, Animator};
use crate::combat::Dead;
use crate::components::{Health, SensorReadings};
use crate::config::CombatConfig;
use crate::cover::{CoverExitReason, CoverOffsets, ExitedCover};
use crate::equipment::{ReloadCycle, WeaponHolder};
use crate::shooting::Gun;

/// Система: host sensors → AgentState
pub fn read_sensors(mut agents: Query<(&SensorReadings, &mut AgentState)>) {
    for (sensors, mut state) in agents.iter_mut() {
        state.grounded = sensors.grounded;
        state.weapon_blocked = sensors.weapon_blocked;
    }
}

/// Система: alive/dead по Health
///
/// Смерть бросает action, equip transition, reload, cover и offsets.
/// Intents мёртвого агента принимаются, но не разрешаются.
pub fn track_life_state(
    mut commands: Commands,
    mut agents: Query<(
        Entity,
        &Health,
        &mut AgentState,
        &mut WeaponHolder,
        &mut ReloadCycle,
        &mut CoverOffsets,
    )>,
    mut guns: Query<&mut Gun>,
    mut exited_cover: EventWriter<ExitedCover>,
) {
    for (agent, health, mut state, mut holder, mut reload, mut offsets) in agents.iter_mut() {
        match (state.alive, health.is_alive()) {
            (true, false) => {
                if let Some(cover) = state.cover {
                    exited_cover.write(ExitedCover {
                        agent,
                        cover_id: cover.spot.id,
                        reason: CoverExitReason::Died,
                    });
                }
                state.die();

                if let Some(weapon) = holder.abandon() {
                    if let Ok(mut gun) = guns.get_mut(weapon) {
                        gun.release(agent);
                    }
                }
                reload.reset();
                offsets.reset();

                commands.entity(agent).insert(Dead);
                crate::log_info(&format!("💀 {:?} died, pending transitions abandoned", agent));
            }
            (false, true) => {
                state.resurrect();
                commands.entity(agent).remove::<Dead>();
                crate::log_info(&format!("✨ {:?} resurrected", agent));
            }
            _ => {}
        }
    }
}

/// Система: movement + exclusive actions (jump/roll/throw/climb/custom)
///
/// 1. Движение → MovementMode
/// 2. Текущий action продвигается (oracle / ground sensor)
/// 3. Один победитель среди запросов tick'а стартует или вытесняет текущий
pub fn resolve_actions(
    time: Res<Time<Fixed>>,
    config: Res<CombatConfig>,
    mut agents: Query<(
        Entity,
        &IntentSet,
        &mut AgentState,
        &WeaponHolder,
        &mut CoverOffsets,
        &mut Animator,
    )>,
    guns: Query<&Gun>,
    mut jumped: EventWriter<Jumped>,
    mut landed: EventWriter<Landed>,
    mut exited_cover: EventWriter<ExitedCover>,
) {
    let dt = time.delta_secs();
    let arbitration = &config.arbitration;
    let max_wait = config.oracle.max_wait_secs;

    for (agent, intents, mut state, holder, mut offsets, mut animator) in agents.iter_mut() {
        if !state.alive {
            continue;
        }

        state.apply_movement(intents.movement, intents.crouch, arbitration);

        let grounded = state.grounded;
        match advance_action(
            &mut state.action,
            dt,
            grounded,
            &*animator,
            max_wait,
            arbitration.max_airborne_secs,
        ) {
            ActionProgress::Running => {}
            ActionProgress::Landed => {
                landed.write(Landed { agent });
            }
            ActionProgress::Finished(kind) => {
                crate::log(&format!("🏁 {:?} finished {:?}", agent, kind));
            }
            ActionProgress::ForcedFinish(kind) => {
                crate::log_warning(&format!(
                    "⏱️ {:?}: {:?} not reported by animation oracle, forcing completion",
                    agent, kind
                ));
            }
        }

        let context = ArbitrationContext {
            grounded,
            heavy_weapon: holder
                .in_hand()
                .and_then(|weapon| guns.get(weapon).ok())
                .is_some_and(|gun| gun.config.is_heavy()),
        };

        let Some(request) = pick_request(intents, &context) else {
            continue;
        };

        match arbitrate(&state.action, &request, &context) {
            Arbitration::Drop(reason) => {
                crate::log(&format!("🚫 {:?} dropped {:?}: {:?}", agent, request.kind(), reason));
                continue;
            }
            Arbitration::Supersede(active) => {
                crate::log(&format!("⏩ {:?} {:?} superseded by {:?}", agent, active, request.kind()));
            }
            Arbitration::Start => {
                crate::log(&format!("▶️ {:?} starts {:?}", agent, request.kind()));
            }
        }

        let motion = request.motion(arbitration.vault_max_height);
        state.action = request.into_action(arbitration.vault_max_height);
        animator.request_trigger(motion);

        if request.needs_ground() {
            if let Some(cover) = state.cover.take() {
                offsets.reset();
                exited_cover.write(ExitedCover {
                    agent,
                    cover_id: cover.spot.id,
                    reason: CoverExitReason::ActionStarted,
                });
            }
        }

        if matches!(request, ActionRequest::Jump(_)) {
            jumped.write(Jumped { agent });
        }
    }
}

/// Система: one-shot intents живут один tick
pub fn clear_intents(mut agents: Query<&mut IntentSet>) {
    for mut intents in agents.iter_mut() {
        intents.set_if_neq(IntentSet::default());
    }
}
