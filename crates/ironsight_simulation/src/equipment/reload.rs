//! Reload cycle (параллельно equip lifecycle)
//!
//! - Magazine: Idle → LoadingMagazine → Idle
//! - Bullet: Idle → LoadingBullet (по патрону за callback) → (Pumping)? → Idle
//!
//! Pump планируется с задержкой. Reload во время pending pump
//! откладывается (один слот) до завершения pump.

use bevy::prelude::*;

use crate::animation::{AnimationOracle, Motion};
use crate::shooting::{Gun, ReloadMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReloadPhase {
    #[default]
    Idle,
    LoadingMagazine,
    LoadingBullet,
    Pumping,
}

/// Что произошло за tick (каждый флаг → один event)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReloadOutcome {
    pub bullet_loaded: bool,
    pub fully_loaded: bool,
    pub pumped: bool,
    /// Oracle не ответил: phase завершена по таймауту
    pub forced: bool,
}

impl ReloadOutcome {
    pub fn merge(&mut self, other: ReloadOutcome) {
        self.bullet_loaded |= other.bullet_loaded;
        self.fully_loaded |= other.fully_loaded;
        self.pumped |= other.pumped;
        self.forced |= other.forced;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Компонент: reload state агента (для оружия в руке)
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct ReloadCycle {
    pub phase: ReloadPhase,
    /// Countdown до запланированного pump
    pump_in: Option<f32>,
    deferred_reload: bool,
    elapsed: f32,
}

impl ReloadCycle {
    /// Нет reload/pump (и pump не запланирован): оружие готово
    pub fn is_idle(&self) -> bool {
        self.phase == ReloadPhase::Idle && self.pump_in.is_none()
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.phase, ReloadPhase::LoadingMagazine | ReloadPhase::LoadingBullet)
    }

    pub fn pump_pending(&self) -> bool {
        self.pump_in.is_some() || self.phase == ReloadPhase::Pumping
    }

    pub fn has_deferred_reload(&self) -> bool {
        self.deferred_reload
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn enter(&mut self, phase: ReloadPhase) {
        self.phase = phase;
        self.elapsed = 0.0;
    }

    pub fn request_reload(&mut self, gun: &mut Gun, oracle: &mut dyn AnimationOracle) -> ReloadOutcome {
        if !gun.ammo.can_reload() {
            return ReloadOutcome::default();
        }
        if self.pump_pending() {
            self.deferred_reload = true;
            return ReloadOutcome::default();
        }
        if self.phase != ReloadPhase::Idle {
            return ReloadOutcome::default();
        }

        match gun.config.reload_mode {
            ReloadMode::Magazine => {
                self.enter(ReloadPhase::LoadingMagazine);
                if !oracle.supports(Motion::ReloadMagazine) {
                    return self.on_magazine_loaded(gun, oracle);
                }
                oracle.request_trigger(Motion::ReloadMagazine);
                ReloadOutcome::default()
            }
            ReloadMode::Bullet | ReloadMode::BulletThenPump => {
                self.enter(ReloadPhase::LoadingBullet);
                if !oracle.supports(Motion::ReloadBullet) {
                    // Без анимации: заряжаем всё сразу
                    let mut outcome = ReloadOutcome::default();
                    for _ in 0..=gun.ammo.capacity {
                        if self.phase != ReloadPhase::LoadingBullet {
                            break;
                        }
                        outcome.merge(self.on_bullet_loaded(gun, oracle));
                    }
                    return outcome;
                }
                oracle.request_trigger(Motion::ReloadBullet);
                ReloadOutcome::default()
            }
        }
    }

    /// Callback: магазин вставлен
    pub fn on_magazine_loaded(&mut self, gun: &mut Gun, _oracle: &mut dyn AnimationOracle) -> ReloadOutcome {
        if self.phase != ReloadPhase::LoadingMagazine {
            return ReloadOutcome::default();
        }
        gun.ammo.load_magazine();
        self.enter(ReloadPhase::Idle);
        ReloadOutcome {
            fully_loaded: gun.ammo.is_full(),
            ..ReloadOutcome::default()
        }
    }

    /// Callback: один патрон вставлен
    pub fn on_bullet_loaded(&mut self, gun: &mut Gun, oracle: &mut dyn AnimationOracle) -> ReloadOutcome {
        if self.phase != ReloadPhase::LoadingBullet {
            return ReloadOutcome::default();
        }

        let mut outcome = ReloadOutcome {
            bullet_loaded: gun.ammo.load_bullet(),
            ..ReloadOutcome::default()
        };

        if gun.ammo.can_reload() {
            // Следующий патрон
            self.elapsed = 0.0;
            oracle.request_trigger(Motion::ReloadBullet);
            return outcome;
        }

        outcome.fully_loaded = gun.ammo.is_full();
        if gun.config.reload_mode == ReloadMode::BulletThenPump {
            outcome.merge(self.begin_pump(gun, oracle));
        } else {
            self.enter(ReloadPhase::Idle);
        }
        outcome
    }

    /// Выстрел во время загрузки патронов
    pub fn interrupt(&mut self, oracle: &mut dyn AnimationOracle) -> bool {
        if self.phase != ReloadPhase::LoadingBullet {
            return false;
        }
        oracle.request_trigger(Motion::InterruptReload);
        self.enter(ReloadPhase::Idle);
        true
    }

    /// Pump через `delay` секунд (игнорируется во время reload / pump)
    pub fn schedule_pump(&mut self, delay: f32) {
        if self.phase != ReloadPhase::Idle || self.pump_in.is_some() {
            return;
        }
        self.pump_in = Some(delay.max(0.0));
    }

    fn begin_pump(&mut self, gun: &mut Gun, oracle: &mut dyn AnimationOracle) -> ReloadOutcome {
        self.pump_in = None;
        self.enter(ReloadPhase::Pumping);
        if !oracle.supports(Motion::Pump) {
            return self.on_pumped(gun, oracle);
        }
        oracle.request_trigger(Motion::Pump);
        ReloadOutcome::default()
    }

    /// Callback: pump закончен → отложенный reload стартует
    pub fn on_pumped(&mut self, gun: &mut Gun, oracle: &mut dyn AnimationOracle) -> ReloadOutcome {
        if self.phase != ReloadPhase::Pumping {
            return ReloadOutcome::default();
        }
        self.enter(ReloadPhase::Idle);

        let mut outcome = ReloadOutcome {
            pumped: true,
            ..ReloadOutcome::default()
        };
        if std::mem::take(&mut self.deferred_reload) {
            outcome.merge(self.request_reload(gun, oracle));
        }
        outcome
    }

    /// Pump countdown + cap ожидания callback'ов
    pub fn tick(&mut self, dt: f32, gun: &mut Gun, oracle: &mut dyn AnimationOracle, max_wait: f32) -> ReloadOutcome {
        if let Some(remaining) = self.pump_in.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 && self.phase == ReloadPhase::Idle {
                return self.begin_pump(gun, oracle);
            }
        }

        if self.phase == ReloadPhase::Idle {
            return ReloadOutcome::default();
        }

        self.elapsed += dt;
        if self.elapsed < max_wait {
            return ReloadOutcome::default();
        }

        let mut outcome = match self.phase {
            ReloadPhase::LoadingMagazine => self.on_magazine_loaded(gun, oracle),
            ReloadPhase::LoadingBullet => self.on_bullet_loaded(gun, oracle),
            ReloadPhase::Pumping => self.on_pumped(gun, oracle),
            ReloadPhase::Idle => ReloadOutcome::default(),
        };
        outcome.forced = true;
        outcome
    }
}
