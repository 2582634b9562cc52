//! Equipment system implementations
//!
//! # Systems
//!
//! - `drive_equip_transitions`: callbacks GrabWeapon/Equip/Unequip,
//!   таймауты, старт новых transitions (ownership claim/release)
//! - `drive_reload_cycles`: callbacks BulletLoad/MagazineLoad/Pump,
//!   reload/pump intents, pump countdown, таймауты

use bevy::prelude::*;
use std::collections::HashSet;

use super::events::*;
use super::lifecycle::{EquipChange, EquipState, WeaponHolder};
use super::reload::{ReloadCycle, ReloadOutcome};
use crate::animation::{AnimationCallback, AnimationOracle, Animator, CallbackKind};
use crate::arbitration::{AgentState, IntentSet};
use crate::config::CombatConfig;
use crate::shooting::Gun;

/// Callbacks tick'а без дублей (один callback kind на агента)
fn dedupe_callbacks(
    callbacks: &mut EventReader<AnimationCallback>,
    relevant: impl Fn(CallbackKind) -> bool,
) -> Vec<AnimationCallback> {
    let mut seen = HashSet::new();
    callbacks
        .read()
        .filter(|callback| relevant(callback.kind))
        .filter(|callback| seen.insert((callback.agent, callback.kind)))
        .copied()
        .collect()
}

/// Итоговое оружие в руке за tick (WeaponChanged не чаще раза за tick)
#[derive(Default)]
struct HandChanges(Vec<(Entity, Option<Entity>)>);

impl HandChanges {
    fn record(&mut self, agent: Entity, weapon: Option<Entity>) {
        match self.0.iter_mut().find(|(known, _)| *known == agent) {
            Some(entry) => entry.1 = weapon,
            None => self.0.push((agent, weapon)),
        }
    }
}

/// Ownership + логирование для изменений lifecycle
fn settle_changes(
    agent: Entity,
    changes: Vec<EquipChange>,
    guns: &mut Query<&mut Gun>,
    hands: &mut HandChanges,
) -> bool {
    let mut unequipped = false;
    for change in changes {
        match change {
            EquipChange::Grabbed(weapon) => {
                crate::log(&format!("🔫 {:?} grabbed weapon {:?}", agent, weapon));
                hands.record(agent, Some(weapon));
            }
            EquipChange::Equipped(weapon) => {
                crate::log(&format!("✅ {:?} equipped {:?}", agent, weapon));
            }
            EquipChange::Unequipped(weapon) => {
                if let Ok(mut gun) = guns.get_mut(weapon) {
                    gun.release(agent);
                }
                crate::log(&format!("📦 {:?} unequipped {:?}", agent, weapon));
                hands.record(agent, None);
                unequipped = true;
            }
        }
    }
    unequipped
}

/// Claim target оружия и старт Equipping
fn begin_equip_target(
    agent: Entity,
    holder: &mut WeaponHolder,
    oracle: &mut dyn AnimationOracle,
    guns: &mut Query<&mut Gun>,
) -> Vec<EquipChange> {
    let Some(weapon) = holder.target else {
        return Vec::new();
    };

    let Ok(mut gun) = guns.get_mut(weapon) else {
        if holder.note_rejected(weapon) {
            crate::log_warning(&format!("⚠️ {:?}: target weapon {:?} has no Gun", agent, weapon));
        }
        return Vec::new();
    };

    if !gun.try_claim(agent) {
        if holder.note_rejected(weapon) {
            crate::log_warning(&format!(
                "⚠️ {:?}: weapon {:?} is held by {:?}, equip postponed",
                agent, weapon, gun.owner
            ));
        }
        return Vec::new();
    }

    crate::log(&format!("🔄 {:?} Unequipped → Equipping {:?}", agent, weapon));
    holder.begin_equip(weapon, oracle)
}

/// Система: equip/unequip lifecycle
pub fn drive_equip_transitions(
    time: Res<Time<Fixed>>,
    config: Res<CombatConfig>,
    mut callbacks: EventReader<AnimationCallback>,
    mut agents: Query<(Entity, &AgentState, &mut WeaponHolder, &mut ReloadCycle, &mut Animator)>,
    mut guns: Query<&mut Gun>,
    mut weapon_changed: EventWriter<WeaponChanged>,
) {
    let dt = time.delta_secs();
    let max_wait = config.oracle.max_wait_secs;
    let mut hands = HandChanges::default();

    // 1. Callbacks (stale игнорируются самим lifecycle)
    let equip_callbacks = dedupe_callbacks(&mut callbacks, |kind| {
        matches!(kind, CallbackKind::GrabWeapon | CallbackKind::Equip | CallbackKind::Unequip)
    });
    for callback in equip_callbacks {
        let Ok((agent, state, mut holder, _, mut animator)) = agents.get_mut(callback.agent) else {
            continue;
        };
        if !state.alive {
            continue;
        }

        let changes = match callback.kind {
            CallbackKind::GrabWeapon => holder.on_grab(),
            CallbackKind::Equip => holder.on_equip_finished(),
            _ => holder.on_unequip_finished(),
        };
        if settle_changes(agent, changes, &mut guns, &mut hands) {
            // Unequip закончен → сразу equip pending target
            let changes = begin_equip_target(agent, &mut holder, &mut *animator, &mut guns);
            settle_changes(agent, changes, &mut guns, &mut hands);
        }
    }

    // 2. Таймауты + новые transitions
    for (agent, state, mut holder, mut reload, mut animator) in agents.iter_mut() {
        if !state.alive {
            continue;
        }

        let forced = holder.tick_wait(dt, max_wait);
        if !forced.is_empty() {
            crate::log_warning(&format!(
                "⏱️ {:?}: equip callbacks timed out after {:.2}s, forcing {:?}",
                agent, max_wait, forced
            ));
            if settle_changes(agent, forced, &mut guns, &mut hands) {
                let changes = begin_equip_target(agent, &mut holder, &mut *animator, &mut guns);
                settle_changes(agent, changes, &mut guns, &mut hands);
            }
        }

        if !holder.wants_change() {
            continue;
        }

        // Preconditions: на земле, не reload, инструмент не в непрерывном использовании
        let in_use = holder
            .in_hand()
            .and_then(|weapon| guns.get(weapon).ok())
            .is_some_and(|gun| gun.is_firing());
        if !state.grounded || reload.is_reloading() || in_use {
            continue;
        }

        let changes = match holder.state() {
            EquipState::Equipped => {
                crate::log(&format!("🔄 {:?} Equipped → Unequipping {:?}", agent, holder.in_hand()));
                reload.reset();
                holder.begin_unequip(&mut *animator)
            }
            EquipState::Unequipped => begin_equip_target(agent, &mut holder, &mut *animator, &mut guns),
            _ => Vec::new(),
        };
        if settle_changes(agent, changes, &mut guns, &mut hands) {
            let changes = begin_equip_target(agent, &mut holder, &mut *animator, &mut guns);
            settle_changes(agent, changes, &mut guns, &mut hands);
        }
    }

    for (agent, weapon) in hands.0 {
        weapon_changed.write(WeaponChanged { agent, weapon });
    }
}

/// Система: reload / pump
pub fn drive_reload_cycles(
    time: Res<Time<Fixed>>,
    config: Res<CombatConfig>,
    mut callbacks: EventReader<AnimationCallback>,
    mut agents: Query<(Entity, &AgentState, &IntentSet, &WeaponHolder, &mut ReloadCycle, &mut Animator)>,
    mut guns: Query<&mut Gun>,
    mut bullet_loaded: EventWriter<BulletLoaded>,
    mut fully_loaded: EventWriter<FullyLoaded>,
    mut pumped: EventWriter<Pumped>,
) {
    let dt = time.delta_secs();
    let max_wait = config.oracle.max_wait_secs;

    let reload_callbacks = dedupe_callbacks(&mut callbacks, |kind| {
        matches!(
            kind,
            CallbackKind::BulletLoad | CallbackKind::MagazineLoad | CallbackKind::Pump
        )
    });

    for (agent, state, intents, holder, mut reload, mut animator) in agents.iter_mut() {
        if !state.alive {
            continue;
        }
        let Some(weapon) = holder.in_hand() else {
            continue;
        };
        let Ok(mut gun) = guns.get_mut(weapon) else {
            continue;
        };

        let mut outcome = ReloadOutcome::default();

        for callback in reload_callbacks.iter().filter(|callback| callback.agent == agent) {
            outcome.merge(match callback.kind {
                CallbackKind::BulletLoad => reload.on_bullet_loaded(&mut gun, &mut *animator),
                CallbackKind::MagazineLoad => reload.on_magazine_loaded(&mut gun, &mut *animator),
                _ => reload.on_pumped(&mut gun, &mut *animator),
            });
        }

        let ticked = reload.tick(dt, &mut gun, &mut *animator, max_wait);
        if ticked.forced {
            crate::log_warning(&format!(
                "⏱️ {:?}: reload callbacks timed out after {:.2}s, forcing {:?}",
                agent, max_wait, reload.phase
            ));
        }
        outcome.merge(ticked);

        if let Some(delay) = intents.pump {
            reload.schedule_pump(delay);
        }

        if intents.reload && holder.is_ready() && !gun.config.is_melee() {
            let before = reload.phase;
            outcome.merge(reload.request_reload(&mut gun, &mut *animator));
            if reload.phase != before {
                crate::log(&format!("🔃 {:?} reload: {:?} → {:?}", agent, before, reload.phase));
            }
        }

        if outcome.bullet_loaded {
            bullet_loaded.write(BulletLoaded {
                agent,
                weapon,
                loaded: gun.ammo.loaded,
            });
        }
        if outcome.fully_loaded {
            crate::log(&format!("🔋 {:?} weapon {:?} fully loaded ({})", agent, weapon, gun.ammo.loaded));
            fully_loaded.write(FullyLoaded { agent, weapon });
        }
        if outcome.pumped {
            pumped.write(Pumped { agent, weapon });
        }
    }
}
