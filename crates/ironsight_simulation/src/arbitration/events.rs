//! Arbitration events (fire-and-forget, не больше одного на агента за tick)

use bevy::prelude::*;

/// Event: прыжок начат
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jumped {
    pub agent: Entity,
}

/// Event: приземлились после прыжка
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landed {
    pub agent: Entity,
}
