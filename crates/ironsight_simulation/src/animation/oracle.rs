//! Animation Oracle boundary
//!
//! Core никогда не управляет анимацией напрямую:
//! - пишет trigger requests в outbox (`Animator::drain_triggers` забирает host)
//! - читает playing/progress, которые host обновляет каждый frame
//! - completion callbacks приходят отдельно (`AnimationCallback` event)

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

/// Motion (анимационный state), который core может запросить
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Equip,
    Unequip,
    ReloadMagazine,
    ReloadBullet,
    InterruptReload,
    Pump,
    Fire,
    Melee,
    Jump,
    Roll,
    Climb,
    Vault,
    Throw,
    CoverSideEnter,
    CoverSideExit,
    CoverBackEnter,
    CoverBackExit,
    Custom(u32),
}

impl Motion {
    /// Имя trigger'а в animation graph host'а
    pub fn name(&self) -> &'static str {
        match self {
            Motion::Equip => "equip",
            Motion::Unequip => "unequip",
            Motion::ReloadMagazine => "reload_magazine",
            Motion::ReloadBullet => "reload_bullet",
            Motion::InterruptReload => "interrupt_reload",
            Motion::Pump => "pump",
            Motion::Fire => "fire",
            Motion::Melee => "melee",
            Motion::Jump => "jump",
            Motion::Roll => "roll",
            Motion::Climb => "climb",
            Motion::Vault => "vault",
            Motion::Throw => "throw",
            Motion::CoverSideEnter => "cover_side_enter",
            Motion::CoverSideExit => "cover_side_exit",
            Motion::CoverBackEnter => "cover_back_enter",
            Motion::CoverBackExit => "cover_back_exit",
            Motion::Custom(_) => "custom",
        }
    }
}

/// Что core может спросить/попросить у animation layer
pub trait AnimationOracle {
    fn request_trigger(&mut self, motion: Motion);

    fn is_playing(&self, motion: Motion) -> bool;

    /// 0.0..=1.0, для не играющего motion = 0.0
    fn normalized_progress(&self, motion: Motion) -> f32;

    /// false = в animation graph нет такого state → переходы мгновенные
    fn supports(&self, _motion: Motion) -> bool {
        true
    }
}

/// Per-agent proxy animation graph'а
///
/// # Host contract
/// - каждый frame: `drain_triggers()` → запустить анимации
/// - каждый frame: `report_progress` / `report_stopped` для играющих motions
/// - один раз при spawn: `mark_missing` для states, которых нет в graph
#[derive(Component, Debug, Clone, Default)]
pub struct Animator {
    triggers: Vec<Motion>,
    playing: HashMap<Motion, f32>,
    missing: HashSet<Motion>,
    detached: bool,
}

impl Animator {
    /// Animator без animation graph: все переходы мгновенные
    pub fn detached() -> Self {
        Self {
            detached: true,
            ..Self::default()
        }
    }

    pub fn mark_missing(&mut self, motion: Motion) {
        self.missing.insert(motion);
    }

    pub fn report_progress(&mut self, motion: Motion, progress: f32) {
        self.playing.insert(motion, progress.clamp(0.0, 1.0));
    }

    pub fn report_stopped(&mut self, motion: Motion) {
        self.playing.remove(&motion);
    }

    pub fn pending_triggers(&self) -> &[Motion] {
        &self.triggers
    }

    pub fn drain_triggers(&mut self) -> Vec<Motion> {
        std::mem::take(&mut self.triggers)
    }
}

impl AnimationOracle for Animator {
    fn request_trigger(&mut self, motion: Motion) {
        if self.detached || self.missing.contains(&motion) {
            return;
        }
        // Повторный request в том же frame = тот же trigger
        if !self.triggers.contains(&motion) {
            self.triggers.push(motion);
        }
    }

    fn is_playing(&self, motion: Motion) -> bool {
        self.playing.contains_key(&motion)
    }

    fn normalized_progress(&self, motion: Motion) -> f32 {
        self.playing.get(&motion).copied().unwrap_or(0.0)
    }

    fn supports(&self, motion: Motion) -> bool {
        !self.detached && !self.missing.contains(&motion)
    }
}
