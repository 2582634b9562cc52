//! Equipment / reload events (outbound)

use bevy::prelude::*;

/// Event: в руке агента другое оружие (None = руки пусты)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponChanged {
    pub agent: Entity,
    pub weapon: Option<Entity>,
}

/// Event: патрон вставлен
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulletLoaded {
    pub agent: Entity,
    pub weapon: Entity,
    /// Патронов в магазине после загрузки
    pub loaded: u32,
}

/// Event: магазин полон
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullyLoaded {
    pub agent: Entity,
    pub weapon: Entity,
}

/// Event: pump завершён
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pumped {
    pub agent: Entity,
    pub weapon: Entity,
}
