//! Shooting events (outbound, не больше одного каждого вида на агента за tick,
//! кроме `SuccessfulHit`: по одному на hit record)

use bevy::prelude::*;

use super::resolve::HitRecord;

/// Event: выстрел состоялся (хотя бы одна не-friend группа за tick)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub agent: Entity,
    pub weapon: Entity,
    /// Сколько групп за tick (catch-up)
    pub groups: u32,
}

/// Event: щелчок пустого магазина
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyFire {
    pub agent: Entity,
    pub weapon: Entity,
}

/// Event: trigger зажат и gate открылся
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireStarted {
    pub agent: Entity,
    pub weapon: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireStopped {
    pub agent: Entity,
    pub weapon: Entity,
}

/// Event: засчитанное попадание (raycast или melee sweep)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SuccessfulHit(pub HitRecord);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoomed {
    pub agent: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unzoomed {
    pub agent: Entity,
}
