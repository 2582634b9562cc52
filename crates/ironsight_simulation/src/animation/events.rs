//! Completion callbacks (Animation Oracle → ECS)

use bevy::prelude::*;

/// Какой animation event сработал mid-clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// Рука дошла до оружия (weapon attach point)
    GrabWeapon,
    /// Equip clip закончился
    Equip,
    /// Unequip clip закончился (оружие убрано)
    Unequip,
    /// Один патрон вставлен
    BulletLoad,
    /// Магазин вставлен
    MagazineLoad,
    /// Pump закончен
    Pump,
}

/// Event: animation callback от host'а
///
/// Приходит асинхронно (обрабатывается на следующем tick).
/// Callback без подходящего state (stale) игнорируется.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationCallback {
    pub agent: Entity,
    pub kind: CallbackKind,
}
