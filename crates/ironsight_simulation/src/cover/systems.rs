//! Cover system implementations
//!
//! - `resolve_cover`: enter / maintain / exit + re-facing
//! - `tick_cover_offsets`: side peek / back step sub-FSM

use bevy::prelude::*;

use super::events::{CoverExitReason, EnteredCover, ExitedCover};
use super::offset::{CoverOffsets, DesiredOffsets, OffsetTick};
use super::spot::ActiveCover;
use crate::animation::Animator;
use crate::arbitration::{AgentState, IntentSet};
use crate::components::SensorReadings;
use crate::config::CombatConfig;

/// Проекция движения на касательную, после которой агент разворачивается
const REFACE_THRESHOLD: f32 = 0.3;

/// Система: cover decision
///
/// В укрытии остаёмся пока host считает его валидным и нет leave intent.
/// Выбивающие actions (jump/roll/climb) снимают cover ещё в arbitration.
pub fn resolve_cover(
    mut agents: Query<(
        Entity,
        &IntentSet,
        &SensorReadings,
        &Transform,
        &mut AgentState,
        &mut CoverOffsets,
    )>,
    mut entered: EventWriter<EnteredCover>,
    mut exited: EventWriter<ExitedCover>,
) {
    for (agent, intents, sensors, transform, mut state, mut offsets) in agents.iter_mut() {
        if !state.alive {
            continue;
        }

        if let Some(mut cover) = state.cover {
            let reason = if !sensors.current_cover_valid {
                Some(CoverExitReason::Invalidated)
            } else if intents.leave_cover {
                Some(CoverExitReason::Requested)
            } else {
                None
            };

            if let Some(reason) = reason {
                state.cover = None;
                offsets.reset();
                exited.write(ExitedCover {
                    agent,
                    cover_id: cover.spot.id,
                    reason,
                });
                crate::log(&format!("🧱 {:?} left cover {} ({:?})", agent, cover.spot.id, reason));
                continue;
            }

            if state.is_moving() && cover.reface(state.move_direction, REFACE_THRESHOLD) {
                crate::log(&format!("↔️ {:?} faces {:?} in cover {}", agent, cover.facing, cover.spot.id));
                state.cover = Some(cover);
            }
            continue;
        }

        if !intents.take_cover || !state.action.is_idle() || !state.grounded {
            continue;
        }
        let Some(spot) = sensors.cover_candidate else {
            continue;
        };

        let heading = if state.is_moving() {
            state.move_direction
        } else {
            transform.forward().as_vec3()
        };
        let cover = ActiveCover::enter(spot, heading);
        state.cover = Some(cover);
        offsets.reset();

        entered.write(EnteredCover {
            agent,
            cover_id: spot.id,
        });
        crate::log(&format!("🧱 {:?} entered cover {} facing {:?}", agent, spot.id, cover.facing));
    }
}

/// Система: cover-offset sub-FSM (после aim gate)
pub fn tick_cover_offsets(
    time: Res<Time<Fixed>>,
    config: Res<CombatConfig>,
    mut agents: Query<(Entity, &AgentState, &mut CoverOffsets, &mut Animator)>,
) {
    let dt = time.delta_secs();

    for (agent, state, mut offsets, mut animator) in agents.iter_mut() {
        let Some(cover) = state.cover.filter(|_| state.alive) else {
            if !offsets.is_idle() {
                offsets.reset();
            }
            continue;
        };

        let params = OffsetTick {
            dt,
            free: state.is_moving(),
            max_wait: config.oracle.max_wait_secs,
            config: &config.cover,
        };

        let desired = if state.aiming {
            DesiredOffsets::for_aim(&cover, &config.cover)
        } else {
            DesiredOffsets::default()
        };

        let offsets = &mut *offsets;
        if let Some(phase) = offsets.side.tick(desired.side, params, &mut *animator) {
            crate::log(&format!("🔀 {:?} side offset → {:?}", agent, phase));
        }
        if let Some(phase) = offsets.back.tick(desired.back, params, &mut *animator) {
            crate::log(&format!("🔀 {:?} back offset → {:?}", agent, phase));
        }
    }
}
