//! Cover-offset sub-FSM (side peek / back step)
//!
//! Каждая ось: None → Entering → Using → Exiting → None.
//! Entering/Exiting не пропускаются пока играет transition анимация;
//! мгновенный snap только когда агент свободно движется или motion'а нет.
//! Using → Entering невозможен: смена цели идёт через Exiting.

use bevy::prelude::*;

use crate::animation::{AnimationOracle, Motion};
use super::spot::ActiveCover;
use crate::config::CoverOffsetConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetPhase {
    #[default]
    None,
    Entering,
    Using,
    Exiting,
}

/// Параметры одного tick'а оси
#[derive(Debug, Clone, Copy)]
pub struct OffsetTick<'a> {
    pub dt: f32,
    /// Агент свободно движется → snap без анимации
    pub free: bool,
    pub max_wait: f32,
    pub config: &'a CoverOffsetConfig,
}

/// Одна ось offset'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetAxis {
    pub phase: OffsetPhase,
    /// Текущий offset (для host'а)
    pub live: Vec3,
    pub target: Vec3,
    /// Transition зашёл достаточно далеко: можно целиться
    pub can_aim_from_here: bool,
    start: Vec3,
    progress: f32,
    elapsed: f32,
    enter_motion: Motion,
    exit_motion: Motion,
}

const SAME_TARGET_EPSILON: f32 = 1e-4;

impl OffsetAxis {
    pub fn new(enter_motion: Motion, exit_motion: Motion) -> Self {
        Self {
            phase: OffsetPhase::None,
            live: Vec3::ZERO,
            target: Vec3::ZERO,
            can_aim_from_here: false,
            start: Vec3::ZERO,
            progress: 0.0,
            elapsed: 0.0,
            enter_motion,
            exit_motion,
        }
    }

    pub fn side() -> Self {
        Self::new(Motion::CoverSideEnter, Motion::CoverSideExit)
    }

    pub fn back() -> Self {
        Self::new(Motion::CoverBackEnter, Motion::CoverBackExit)
    }

    /// Transition анимация в процессе
    pub fn in_flight(&self) -> bool {
        matches!(self.phase, OffsetPhase::Entering | OffsetPhase::Exiting)
    }

    /// Не мешает ли ось прицеливанию
    pub fn permits_aim(&self) -> bool {
        !self.in_flight() || self.can_aim_from_here
    }

    /// Ось ещё в None, но на этом tick'е уйдёт в Entering (не snap)
    pub fn awaits_entry(&self, desired: Option<Vec3>, free: bool, oracle: &dyn AnimationOracle) -> bool {
        self.phase == OffsetPhase::None && desired.is_some() && !free && oracle.supports(self.enter_motion)
    }

    /// Мгновенно в None (выход из укрытия, смерть)
    pub fn reset(&mut self) {
        *self = Self::new(self.enter_motion, self.exit_motion);
    }

    fn snap_to(&mut self, desired: Option<Vec3>) {
        match desired {
            Some(target) => {
                self.phase = OffsetPhase::Using;
                self.live = target;
                self.target = target;
                self.can_aim_from_here = true;
            }
            None => self.reset(),
        }
    }

    fn begin(&mut self, phase: OffsetPhase, target: Vec3, oracle: &mut dyn AnimationOracle) {
        let motion = match phase {
            OffsetPhase::Entering => self.enter_motion,
            _ => self.exit_motion,
        };
        oracle.request_trigger(motion);
        self.phase = phase;
        self.start = self.live;
        self.target = target;
        self.progress = 0.0;
        self.elapsed = 0.0;
        self.can_aim_from_here = false;
    }

    /// Progress transition'а: считается только пока motion играет
    fn advance(&mut self, motion: Motion, dt: f32, oracle: &dyn AnimationOracle) {
        self.elapsed += dt;
        if oracle.is_playing(motion) {
            self.progress = self.progress.max(oracle.normalized_progress(motion));
        }
    }

    /// Один tick оси. Возвращает новую phase если она сменилась.
    pub fn tick(
        &mut self,
        desired: Option<Vec3>,
        params: OffsetTick<'_>,
        oracle: &mut dyn AnimationOracle,
    ) -> Option<OffsetPhase> {
        let before = self.phase;

        match self.phase {
            OffsetPhase::None => {
                if let Some(target) = desired {
                    if params.free || !oracle.supports(self.enter_motion) {
                        self.snap_to(Some(target));
                    } else {
                        self.begin(OffsetPhase::Entering, target, oracle);
                    }
                }
            }

            OffsetPhase::Entering => {
                if params.free {
                    self.snap_to(desired);
                } else {
                    self.advance(self.enter_motion, params.dt, oracle);
                    self.live = self.start.lerp(self.target, self.progress.min(1.0));
                    self.can_aim_from_here = self.progress >= params.config.aim_threshold;

                    if self.progress >= params.config.complete_threshold || self.elapsed >= params.max_wait {
                        // Цель могла смениться: Using старой цели, дальше через Exiting
                        self.phase = OffsetPhase::Using;
                        self.live = self.target;
                        self.can_aim_from_here = true;
                    }
                }
            }

            OffsetPhase::Using => {
                self.can_aim_from_here = true;
                let keep = desired.is_some_and(|target| target.distance_squared(self.target) < SAME_TARGET_EPSILON);
                if !keep {
                    if params.free || !oracle.supports(self.exit_motion) {
                        // Snap в None, новая цель (если есть): Entering на следующем tick
                        self.snap_to(None);
                    } else {
                        self.begin(OffsetPhase::Exiting, Vec3::ZERO, oracle);
                        // Ещё в позиции offset'а, прицел пока держим
                        self.can_aim_from_here = true;
                    }
                }
            }

            OffsetPhase::Exiting => {
                if params.free {
                    self.snap_to(None);
                } else {
                    self.advance(self.exit_motion, params.dt, oracle);
                    self.live = self.start.lerp(Vec3::ZERO, self.progress.min(1.0));
                    self.can_aim_from_here = 1.0 - self.progress >= params.config.aim_threshold;

                    if self.progress >= params.config.complete_threshold || self.elapsed >= params.max_wait {
                        self.reset();
                    }
                }
            }
        }

        (self.phase != before).then_some(self.phase)
    }
}

/// Куда хотят оси при прицеливании из укрытия
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DesiredOffsets {
    pub side: Option<Vec3>,
    pub back: Option<Vec3>,
}

impl DesiredOffsets {
    pub fn for_aim(cover: &ActiveCover, config: &CoverOffsetConfig) -> Self {
        Self {
            side: cover.spot.side_peek(cover.facing, config.side_offset),
            back: cover.spot.back_step(config.back_offset),
        }
    }
}

/// Компонент: обе оси offset'а агента
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CoverOffsets {
    pub side: OffsetAxis,
    pub back: OffsetAxis,
}

impl Default for CoverOffsets {
    fn default() -> Self {
        Self {
            side: OffsetAxis::side(),
            back: OffsetAxis::back(),
        }
    }
}

impl CoverOffsets {
    pub fn reset(&mut self) {
        self.side.reset();
        self.back.reset();
    }

    pub fn is_idle(&self) -> bool {
        self.side.phase == OffsetPhase::None && self.back.phase == OffsetPhase::None
    }

    pub fn permits_aim(&self) -> bool {
        self.side.permits_aim() && self.back.permits_aim()
    }

    /// Разрешает ли прицел с учётом offset'ов, которые вот-вот начнутся
    pub fn permits_aim_toward(&self, desired: DesiredOffsets, free: bool, oracle: &dyn AnimationOracle) -> bool {
        self.permits_aim()
            && !self.side.awaits_entry(desired.side, free, oracle)
            && !self.back.awaits_entry(desired.back, free, oracle)
    }

    /// Суммарный offset от anchor (host двигает модель)
    pub fn total(&self) -> Vec3 {
        self.side.live + self.back.live
    }
}
