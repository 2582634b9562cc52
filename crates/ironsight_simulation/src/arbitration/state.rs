//! Canonical agent state (persistent между tick'ами)

use bevy::prelude::*;

use super::action::CurrentAction;
use super::intents::MovementIntent;
use crate::config::ArbitrationConfig;
use crate::cover::ActiveCover;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementMode {
    #[default]
    Still,
    Walk,
    Run,
    Sprint,
}

/// Что агент сейчас делает
///
/// `action` взаимоисключающий, остальное: ортогональные модификаторы.
/// Equip и reload state живут в `WeaponHolder` / `ReloadCycle`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct AgentState {
    pub alive: bool,
    pub action: CurrentAction,
    pub movement: MovementMode,
    /// Нормализованное направление (ZERO если стоим)
    pub move_direction: Vec3,
    pub move_magnitude: f32,
    pub aiming: bool,
    pub zoomed: bool,
    pub crouching: bool,
    pub grounded: bool,
    pub weapon_blocked: bool,
    pub cover: Option<ActiveCover>,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            alive: true,
            action: CurrentAction::Idle,
            movement: MovementMode::Still,
            move_direction: Vec3::ZERO,
            move_magnitude: 0.0,
            aiming: false,
            zoomed: false,
            crouching: false,
            grounded: true,
            weapon_blocked: false,
            cover: None,
        }
    }
}

impl AgentState {
    pub fn is_moving(&self) -> bool {
        self.movement != MovementMode::Still
    }

    pub fn in_cover(&self) -> bool {
        self.cover.is_some()
    }

    /// Смерть: все pending transitions бросаются
    pub fn die(&mut self) {
        let grounded = self.grounded;
        *self = Self {
            alive: false,
            grounded,
            ..Self::default()
        };
    }

    /// Воскрешение: чистый idle
    pub fn resurrect(&mut self) {
        let grounded = self.grounded;
        *self = Self {
            grounded,
            ..Self::default()
        };
    }

    /// Movement intent → mode/direction
    ///
    /// Sprint невозможен при aim / crouch / в укрытии (деградирует в Run).
    pub fn apply_movement(&mut self, intent: Option<MovementIntent>, crouch: bool, config: &ArbitrationConfig) {
        self.crouching = crouch;

        let Some(intent) = intent else {
            self.stop();
            return;
        };

        let direction = Vec3::new(intent.direction.x, 0.0, intent.direction.z).normalize_or_zero();
        if intent.magnitude < config.move_threshold || direction == Vec3::ZERO {
            self.stop();
            return;
        }

        self.move_direction = direction;
        self.move_magnitude = intent.magnitude;

        let can_sprint = !self.aiming && !self.crouching && self.cover.is_none();
        self.movement = if intent.sprint && can_sprint {
            MovementMode::Sprint
        } else if intent.magnitude >= config.run_magnitude && !self.crouching {
            MovementMode::Run
        } else {
            MovementMode::Walk
        };
    }

    fn stop(&mut self) {
        self.movement = MovementMode::Still;
        self.move_direction = Vec3::ZERO;
        self.move_magnitude = 0.0;
    }
}
