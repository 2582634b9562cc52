//! Cover events

use bevy::prelude::*;

/// Event: агент занял укрытие
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnteredCover {
    pub agent: Entity,
    pub cover_id: u64,
}

/// Почему агент покинул укрытие
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverExitReason {
    /// Leave intent
    Requested,
    /// Host сообщил что укрытие больше не валидно
    Invalidated,
    /// Jump / roll / climb
    ActionStarted,
    Died,
}

/// Event: агент покинул укрытие
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitedCover {
    pub agent: Entity,
    pub cover_id: u64,
    pub reason: CoverExitReason,
}
