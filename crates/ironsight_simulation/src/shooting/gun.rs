//! Gun: weapon instance (config + mutable counters + fire control)
//!
//! Живёт на отдельной weapon entity. Агент ссылается на неё через
//! `WeaponHolder` (weak link), владение: через `owner` (claim/release).

use bevy::prelude::*;

use super::weapon::{Ammo, WeaponConfig};
use crate::arbitration::FriendFilter;

/// Погрешность catch-up loop'а (накопленная ошибка f32 от `+= fire_delay`)
const FIRE_WAIT_EPSILON: f32 = 1e-5;

/// Одна shot group внутри tick'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotGroup {
    /// Смещение от начала tick'а (секунды)
    pub delay: f32,
    /// Сколько projectiles реально вылетело
    pub projectiles: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireEdge {
    Started,
    Stopped,
}

/// Итог одного tick'а rate limiter'а
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FireTick {
    pub groups: Vec<ShotGroup>,
    /// Запросили выстрел, а магазин пуст
    pub empty_click: bool,
    pub edge: Option<FireEdge>,
    pub friend_filter: Option<FriendFilter>,
}

/// Weapon instance
#[derive(Component, Debug, Clone)]
pub struct Gun {
    pub config: WeaponConfig,
    pub ammo: Ammo,
    /// Агент, держащий оружие (None = свободно)
    pub owner: Option<Entity>,
    /// Countdown до следующей группы
    fire_wait: f32,
    melee_cooldown: f32,
    requested_now: bool,
    fire_when_ready: bool,
    melee_requested: bool,
    allowed: bool,
    melee_allowed: bool,
    was_firing: bool,
    friend_filter: Option<FriendFilter>,
}

impl Gun {
    pub fn new(config: WeaponConfig) -> Self {
        let config = config.sanitized();
        Self {
            ammo: Ammo::full(&config),
            config,
            owner: None,
            fire_wait: 0.0,
            melee_cooldown: 0.0,
            requested_now: false,
            fire_when_ready: false,
            melee_requested: false,
            allowed: false,
            melee_allowed: false,
            was_firing: false,
            friend_filter: None,
        }
    }

    pub fn with_ammo(mut self, loaded: u32) -> Self {
        self.ammo.loaded = loaded.min(self.ammo.capacity);
        self
    }

    // === Ownership ===

    /// Claim при начале equip. false = держит другой агент.
    pub fn try_claim(&mut self, agent: Entity) -> bool {
        match self.owner {
            Some(owner) if owner != agent => false,
            _ => {
                self.owner = Some(agent);
                true
            }
        }
    }

    /// Release при завершении unequip (только владельцем)
    pub fn release(&mut self, agent: Entity) {
        if self.owner == Some(agent) {
            self.owner = None;
            self.cancel_fire();
            self.was_firing = false;
            self.allowed = false;
            self.melee_allowed = false;
        }
    }

    // === Fire commands ===

    /// Выстрел в этом tick'е (сбрасывается в конце tick'а)
    pub fn try_fire_now(&mut self, friend_filter: Option<FriendFilter>) {
        self.requested_now = true;
        if friend_filter.is_some() {
            self.friend_filter = friend_filter;
        }
    }

    /// Sticky: держится до первой разрешённой попытки
    pub fn fire_when_ready(&mut self) {
        self.fire_when_ready = true;
    }

    pub fn cancel_fire(&mut self) {
        self.requested_now = false;
        self.fire_when_ready = false;
        self.friend_filter = None;
    }

    /// Gate: разрешена ли стрельба в этом tick'е
    pub fn allow(&mut self, allowed: bool) {
        self.allowed = allowed;
    }

    /// Melee не требует прицеливания: отдельный gate
    pub fn allow_melee(&mut self, allowed: bool) {
        self.melee_allowed = allowed;
    }

    pub fn is_requested(&self) -> bool {
        self.requested_now || self.fire_when_ready
    }

    /// Trigger зажат и gate открыт (continuous use)
    pub fn is_firing(&self) -> bool {
        self.was_firing
    }

    pub fn fire_wait(&self) -> f32 {
        self.fire_wait
    }

    // === Melee ===

    pub fn request_melee(&mut self) {
        self.melee_requested = true;
    }

    pub fn melee_ready(&self) -> bool {
        self.melee_cooldown <= 0.0
    }

    /// Снимает melee request; true = атаковать сейчас (cooldown стартует)
    pub fn take_melee_request(&mut self) -> bool {
        let requested = std::mem::take(&mut self.melee_requested);
        if requested && self.melee_allowed && self.melee_ready() {
            self.melee_cooldown = self.config.melee_cooldown;
            return true;
        }
        false
    }

    // === Rate limiter ===

    /// Один tick rate limiter'а: catch-up loop + ammo
    ///
    /// `fire_wait -= dt`, пока `fire_wait < 0`: группа со смещением `delay`,
    /// `fire_wait += fire_delay`. Без стрельбы fire_wait не уходит ниже 0
    /// (простой не копит выстрелы).
    pub fn fire_tick(&mut self, dt: f32) -> FireTick {
        self.melee_cooldown = (self.melee_cooldown - dt).max(0.0);

        let firing = self.is_requested() && self.allowed;
        let edge = match (self.was_firing, firing) {
            (false, true) => Some(FireEdge::Started),
            (true, false) => Some(FireEdge::Stopped),
            _ => None,
        };
        self.was_firing = firing;

        let mut report = FireTick {
            edge,
            friend_filter: self.friend_filter,
            ..FireTick::default()
        };

        self.fire_wait -= dt;
        if !firing {
            self.fire_wait = self.fire_wait.max(0.0);
            self.requested_now = false;
            self.friend_filter = None;
            return report;
        }

        let fire_delay = self.config.fire_delay();
        let mut delay = 0.0;
        while self.fire_wait < -FIRE_WAIT_EPSILON {
            if self.ammo.is_empty() {
                // Щелчок не чаще fire_delay
                report.empty_click = true;
                self.fire_wait = fire_delay;
                break;
            }

            let projectiles = self.spend_group();
            report.groups.push(ShotGroup { delay, projectiles });

            self.fire_wait += fire_delay;
            delay += fire_delay;
        }

        if !report.groups.is_empty() || report.empty_click {
            self.fire_when_ready = false;
        }
        self.requested_now = false;
        self.friend_filter = None;
        report
    }

    /// Патроны на одну группу → сколько projectiles вылетает
    fn spend_group(&mut self) -> u32 {
        let per_shot = self.config.bullets_per_shot;
        if self.config.consume_single_bullet_per_shot {
            if self.ammo.consume(1) == 1 {
                per_shot
            } else {
                0
            }
        } else {
            self.ammo.consume(per_shot)
        }
    }
}
