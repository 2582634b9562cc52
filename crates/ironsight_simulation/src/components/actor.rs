//! Базовые компоненты агентов: Actor, Health

use bevy::prelude::*;

use crate::animation::Animator;
use crate::arbitration::{AgentState, IntentSet};
use crate::components::SensorReadings;
use crate::cover::CoverOffsets;
use crate::equipment::{ReloadCycle, WeaponHolder};
use crate::scene::HitTarget;
use crate::shooting::Recoil;

/// Агент (игрок или AI): корень всего боевого state
///
/// Через Required Components сразу получает arbitration state, intents,
/// equip lifecycle + reload, cover offsets, recoil и animator outbox.
/// `HitTarget` по умолчанию = Body (health root для registry).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(
    Health,
    Transform,
    AgentState,
    IntentSet,
    WeaponHolder,
    ReloadCycle,
    CoverOffsets,
    Recoil,
    Animator,
    SensorReadings,
    HitTarget
)]
pub struct Actor {
    /// Stable ID фракции ("side" для friend detection)
    pub faction_id: u64,
}

/// Здоровье
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }
}
