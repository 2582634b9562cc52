//! Host-written sensor компоненты
//!
//! Host (physics/geometry layer) пишет сюда каждый tick, core только читает.
//! Cover-геометрия, ground check и weapon obstruction: не наша зона.

use bevy::prelude::*;

use crate::cover::CoverSpot;

/// Показания сенсоров агента (заполняет host перед FixedUpdate)
#[derive(Component, Debug, Clone, PartialEq)]
pub struct SensorReadings {
    /// Стоит на земле (ground check)
    pub grounded: bool,
    /// Ствол упёрся в стену: стрелять нельзя
    pub weapon_blocked: bool,
    /// Ближайшее подходящее укрытие (None = нет кандидата)
    pub cover_candidate: Option<CoverSpot>,
    /// Текущее укрытие всё ещё валидно (re-evaluation против геометрии)
    pub current_cover_valid: bool,
}

impl Default for SensorReadings {
    fn default() -> Self {
        Self {
            grounded: true,
            weapon_blocked: false,
            cover_candidate: None,
            current_cover_valid: true,
        }
    }
}

/// Точка прицеливания (world space)
///
/// Без неё агент целится по forward своего Transform.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AimTarget(pub Vec3);

/// Внешне переопределённый origin raycast'а (обычно камера игрока)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct RaycastOriginOverride(pub Vec3);
