//! Recoil accumulator

use bevy::prelude::*;

use super::spread;

/// Предел накопленной отдачи по каждой оси (градусы)
pub const MAX_RECOIL_DEGREES: f32 = 30.0;

/// Накопленная отдача агента
///
/// Растёт на каждую shot group, линейно гаснет к 0 со скоростью
/// `recovery_rate × base_recovery` градусов в секунду.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Recoil {
    /// Вверх (градусы)
    pub vertical: f32,
    /// Вправо (градусы)
    pub horizontal: f32,
    pub recovery_rate: f32,
}

impl Default for Recoil {
    fn default() -> Self {
        Self {
            vertical: 0.0,
            horizontal: 0.0,
            recovery_rate: 1.0,
        }
    }
}

impl Recoil {
    pub fn add(&mut self, vertical: f32, horizontal: f32) {
        self.vertical = (self.vertical + vertical).clamp(-MAX_RECOIL_DEGREES, MAX_RECOIL_DEGREES);
        self.horizontal = (self.horizontal + horizontal).clamp(-MAX_RECOIL_DEGREES, MAX_RECOIL_DEGREES);
    }

    pub fn is_settled(&self) -> bool {
        self.vertical == 0.0 && self.horizontal == 0.0
    }

    /// Линейный decay без перелёта через 0
    pub fn decay(&mut self, dt: f32, base_recovery: f32) {
        let step = (self.recovery_rate * base_recovery * dt).max(0.0);
        self.vertical = approach_zero(self.vertical, step);
        self.horizontal = approach_zero(self.horizontal, step);
    }

    /// Aim direction со сдвигом отдачи
    pub fn apply(&self, direction: Vec3) -> Vec3 {
        if self.is_settled() {
            return direction;
        }
        spread::rotate(direction, -self.horizontal, self.vertical)
    }
}

fn approach_zero(value: f32, step: f32) -> f32 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else {
        (value + step).min(0.0)
    }
}
