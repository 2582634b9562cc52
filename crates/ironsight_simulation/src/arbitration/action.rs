//! Exclusive actions: jump / roll / throw / climb / custom
//!
//! Одновременно активно не больше одного. Новый запрос стартует если агент
//! idle, либо вытесняет текущий action при строго большем приоритете.
//! Throw высоко только пока уже идёт: новый throw ниже roll и jump.

use bevy::prelude::*;

use super::intents::{ClimbTarget, IntentSet, JumpIntent};
use crate::animation::{AnimationOracle, Motion, OracleWait, WaitStatus};

/// Вид action, порядок = приоритет активного action (Custom выше всех)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionKind {
    Jump,
    Roll,
    Throw,
    Climb,
    Custom,
}

impl ActionKind {
    /// Приоритет нового запроса (ещё не начатый throw: самый низкий)
    pub fn request_rank(self) -> u8 {
        match self {
            ActionKind::Throw => 0,
            other => other.active_rank(),
        }
    }

    pub fn active_rank(self) -> u8 {
        self as u8 + 1
    }
}

/// Текущий action агента (tagged variant вместо набора флагов)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CurrentAction {
    #[default]
    Idle,
    Jump {
        intent: JumpIntent,
        /// Host уже сообщил что оторвались от земли
        airborne: bool,
        elapsed: f32,
    },
    Roll {
        angle: f32,
        wait: OracleWait,
    },
    Throw {
        target: Vec3,
        wait: OracleWait,
    },
    Climb {
        target: ClimbTarget,
        wait: OracleWait,
    },
    Custom {
        id: u32,
        wait: OracleWait,
    },
}

impl CurrentAction {
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            CurrentAction::Idle => None,
            CurrentAction::Jump { .. } => Some(ActionKind::Jump),
            CurrentAction::Roll { .. } => Some(ActionKind::Roll),
            CurrentAction::Throw { .. } => Some(ActionKind::Throw),
            CurrentAction::Climb { .. } => Some(ActionKind::Climb),
            CurrentAction::Custom { .. } => Some(ActionKind::Custom),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CurrentAction::Idle)
    }

    /// Vault или climb (для climb action)
    pub fn is_vault(&self) -> bool {
        matches!(self, CurrentAction::Climb { wait, .. } if wait.motion == Motion::Vault)
    }
}

/// Один запрос на action (выбранный из IntentSet)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionRequest {
    Jump(JumpIntent),
    Roll(f32),
    Throw(Vec3),
    Climb(ClimbTarget),
    Custom(u32),
}

impl ActionRequest {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRequest::Jump(_) => ActionKind::Jump,
            ActionRequest::Roll(_) => ActionKind::Roll,
            ActionRequest::Throw(_) => ActionKind::Throw,
            ActionRequest::Climb(_) => ActionKind::Climb,
            ActionRequest::Custom(_) => ActionKind::Custom,
        }
    }

    /// Которые требуют земли под ногами и выбивают из укрытия
    pub fn needs_ground(&self) -> bool {
        matches!(
            self,
            ActionRequest::Jump(_) | ActionRequest::Roll(_) | ActionRequest::Climb(_)
        )
    }

    /// Motion для trigger'а (vault при низком препятствии)
    pub fn motion(&self, vault_max_height: f32) -> Motion {
        match self {
            ActionRequest::Jump(_) => Motion::Jump,
            ActionRequest::Roll(_) => Motion::Roll,
            ActionRequest::Throw(_) => Motion::Throw,
            ActionRequest::Climb(target) if target.height <= vault_max_height => Motion::Vault,
            ActionRequest::Climb(_) => Motion::Climb,
            ActionRequest::Custom(id) => Motion::Custom(*id),
        }
    }

    /// Стартовое состояние action
    pub fn into_action(self, vault_max_height: f32) -> CurrentAction {
        let wait = OracleWait::new(self.motion(vault_max_height));
        match self {
            ActionRequest::Jump(intent) => CurrentAction::Jump {
                intent,
                airborne: false,
                elapsed: 0.0,
            },
            ActionRequest::Roll(angle) => CurrentAction::Roll { angle, wait },
            ActionRequest::Throw(target) => CurrentAction::Throw { target, wait },
            ActionRequest::Climb(target) => CurrentAction::Climb { target, wait },
            ActionRequest::Custom(id) => CurrentAction::Custom { id, wait },
        }
    }
}

/// Условия, в которых принимается решение
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbitrationContext {
    pub grounded: bool,
    /// Тяжёлое оружие в руках: roll/jump запрещены
    pub heavy_weapon: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Активный action с приоритетом ≥ запрошенного
    Outranked(ActionKind),
    HeavyWeapon,
    Airborne,
}

/// Итог арбитража одного запроса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arbitration {
    Start,
    /// Текущий action бросается, стартует новый
    Supersede(ActionKind),
    Drop(DropReason),
}

impl ArbitrationContext {
    pub fn veto(&self, request: &ActionRequest) -> Option<DropReason> {
        if self.heavy_weapon && matches!(request, ActionRequest::Jump(_) | ActionRequest::Roll(_)) {
            return Some(DropReason::HeavyWeapon);
        }
        if !self.grounded && request.needs_ground() {
            return Some(DropReason::Airborne);
        }
        None
    }
}

/// Все запросы tick'а (vetoed отфильтрованы), отсортированные от высшего приоритета
pub fn collect_requests(intents: &IntentSet) -> Vec<ActionRequest> {
    let mut requests: Vec<ActionRequest> = [
        intents.custom_action.map(ActionRequest::Custom),
        intents.climb.map(ActionRequest::Climb),
        intents.throw.map(ActionRequest::Throw),
        intents.roll.map(ActionRequest::Roll),
        intents.jump.map(ActionRequest::Jump),
    ]
    .into_iter()
    .flatten()
    .collect();

    requests.sort_by_key(|request| std::cmp::Reverse(request.kind().request_rank()));
    requests
}

/// Взаимоисключение: один победитель среди запросов tick'а
pub fn pick_request(intents: &IntentSet, context: &ArbitrationContext) -> Option<ActionRequest> {
    collect_requests(intents)
        .into_iter()
        .find(|request| context.veto(request).is_none())
}

/// Решение для одного запроса против текущего action
pub fn arbitrate(
    current: &CurrentAction,
    request: &ActionRequest,
    context: &ArbitrationContext,
) -> Arbitration {
    if let Some(reason) = context.veto(request) {
        return Arbitration::Drop(reason);
    }

    match current.kind() {
        None => Arbitration::Start,
        Some(active) if request.kind().request_rank() > active.active_rank() => {
            Arbitration::Supersede(active)
        }
        Some(active) => Arbitration::Drop(DropReason::Outranked(active)),
    }
}

/// Результат продвижения action на один tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionProgress {
    Running,
    Finished(ActionKind),
    /// Oracle не ответил: force-complete
    ForcedFinish(ActionKind),
    /// Jump: приземлились
    Landed,
}

/// Продвигает action: jump по ground sensor, остальные по oracle
pub fn advance_action(
    action: &mut CurrentAction,
    dt: f32,
    grounded: bool,
    oracle: &dyn AnimationOracle,
    max_wait: f32,
    max_airborne: f32,
) -> ActionProgress {
    let progress = match action {
        CurrentAction::Idle => return ActionProgress::Running,
        CurrentAction::Jump {
            airborne, elapsed, ..
        } => {
            *elapsed += dt;
            if !grounded {
                *airborne = true;
            }

            if *airborne && grounded {
                ActionProgress::Landed
            } else if !*airborne && *elapsed >= max_wait {
                // Так и не оторвались от земли
                ActionProgress::ForcedFinish(ActionKind::Jump)
            } else if *elapsed >= max_airborne {
                ActionProgress::Landed
            } else {
                ActionProgress::Running
            }
        }
        CurrentAction::Roll { wait, .. }
        | CurrentAction::Throw { wait, .. }
        | CurrentAction::Climb { wait, .. }
        | CurrentAction::Custom { wait, .. } => {
            let kind = action_kind_of_wait(wait.motion);
            match wait.poll(dt, oracle, max_wait) {
                WaitStatus::Pending => ActionProgress::Running,
                WaitStatus::Completed => ActionProgress::Finished(kind),
                WaitStatus::TimedOut => ActionProgress::ForcedFinish(kind),
            }
        }
    };

    if progress != ActionProgress::Running {
        *action = CurrentAction::Idle;
    }
    progress
}

fn action_kind_of_wait(motion: Motion) -> ActionKind {
    match motion {
        Motion::Roll => ActionKind::Roll,
        Motion::Throw => ActionKind::Throw,
        Motion::Climb | Motion::Vault => ActionKind::Climb,
        Motion::Jump => ActionKind::Jump,
        _ => ActionKind::Custom,
    }
}
