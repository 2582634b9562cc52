//! Combat tuning (resource + JSON loading)
//!
//! Все значения имеют defaults (`#[serde(default)]`), так что JSON может
//! переопределять только нужные поля. Невалидные значения не отвергаются,
//! а зажимаются в `sanitized()`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Ошибки загрузки конфигурации (единственное fallible место крейта)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Глобальные параметры боевой симуляции
#[derive(Resource, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub arbitration: ArbitrationConfig,
    pub oracle: OracleConfig,
    pub cover: CoverOffsetConfig,
    pub aim: AimConfig,
    pub recoil: RecoilConfig,
}

/// Action arbitration (jump/roll/climb/...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbitrationConfig {
    /// Magnitude ниже: считаем что агент стоит
    pub move_threshold: f32,
    /// Magnitude выше: бег (ниже: шаг)
    pub run_magnitude: f32,
    /// Climb target ниже этой высоты → vault вместо climb (метры)
    pub vault_max_height: f32,
    /// Максимум времени в воздухе до принудительного Landed (секунды)
    pub max_airborne_secs: f32,
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            move_threshold: 0.1,
            run_magnitude: 0.6,
            vault_max_height: 1.2,
            max_airborne_secs: 3.0,
        }
    }
}

/// Animation oracle boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Cap ожидания любого callback/progress (секунды), потом force-complete
    pub max_wait_secs: f32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self { max_wait_secs: 2.0 }
    }
}

/// Cover-offset sub-FSM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverOffsetConfig {
    /// Side peek offset вдоль касательной укрытия (метры)
    pub side_offset: f32,
    /// Back-step offset от стены (метры)
    pub back_offset: f32,
    /// Progress анимации, после которого ось считается Using / None
    pub complete_threshold: f32,
    /// Progress, после которого уже можно целиться (`can_aim_from_here`)
    pub aim_threshold: f32,
}

impl Default for CoverOffsetConfig {
    fn default() -> Self {
        Self {
            side_offset: 0.6,
            back_offset: 0.35,
            complete_threshold: 0.9,
            aim_threshold: 0.5,
        }
    }
}

/// Aim error modifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    /// Error multiplier в zoom
    pub zoom_error_multiplier: f32,
    /// Доп. ошибка (градусы) на единицу movement magnitude
    pub movement_error: f32,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            zoom_error_multiplier: 0.5,
            movement_error: 2.0,
        }
    }
}

/// Recoil recovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoilConfig {
    /// Градусы в секунду при recovery_rate = 1
    pub base_recovery: f32,
}

impl Default for RecoilConfig {
    fn default() -> Self {
        Self { base_recovery: 30.0 }
    }
}

impl CombatConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CombatConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Зажимает невалидные значения вместо ошибки
    pub fn sanitized(mut self) -> Self {
        let a = &mut self.arbitration;
        a.move_threshold = a.move_threshold.clamp(0.0, 1.0);
        a.run_magnitude = a.run_magnitude.clamp(a.move_threshold, 1.0);
        a.vault_max_height = a.vault_max_height.max(0.0);
        a.max_airborne_secs = a.max_airborne_secs.max(0.1);

        self.oracle.max_wait_secs = self.oracle.max_wait_secs.max(0.05);

        let c = &mut self.cover;
        c.side_offset = c.side_offset.max(0.0);
        c.back_offset = c.back_offset.max(0.0);
        c.complete_threshold = c.complete_threshold.clamp(0.05, 1.0);
        c.aim_threshold = c.aim_threshold.clamp(0.0, c.complete_threshold);

        self.aim.zoom_error_multiplier = self.aim.zoom_error_multiplier.max(0.0);
        self.aim.movement_error = self.aim.movement_error.max(0.0);
        self.recoil.base_recovery = self.recoil.base_recovery.max(0.0);
        self
    }
}
