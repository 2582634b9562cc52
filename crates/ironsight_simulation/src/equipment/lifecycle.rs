//! Equip lifecycle: Unequipped → Equipping → Equipped → Unequipping → Unequipped
//!
//! Core только запрашивает transitions; фактическое продвижение: по
//! animation callbacks (`GrabWeapon`, `Equip`, `Unequip`) либо по таймауту.

use bevy::prelude::*;

use crate::animation::{AnimationOracle, Motion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EquipState {
    #[default]
    Unequipped,
    Equipping,
    Equipped,
    Unequipping,
}

/// Что изменилось в руках (для ownership и WeaponChanged)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipChange {
    /// Оружие в руке
    Grabbed(Entity),
    /// Equip clip закончен, оружие готово
    Equipped(Entity),
    /// Оружие убрано: release ownership
    Unequipped(Entity),
}

/// Компонент: weapon slot агента
///
/// `target` назначается снаружи (AI / input через `select`), lifecycle
/// догоняет его, когда preconditions позволяют.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct WeaponHolder {
    pub target: Option<Entity>,
    equipped: Option<Entity>,
    state: EquipState,
    /// Claimed, но ещё не в руке
    incoming: Option<Entity>,
    elapsed: f32,
    /// Последний отказ в claim (чтобы не спамить warning)
    rejected: Option<Entity>,
}

impl WeaponHolder {
    pub fn with_target(weapon: Entity) -> Self {
        Self {
            target: Some(weapon),
            ..Self::default()
        }
    }

    /// Внешний выбор оружия (None = убрать)
    pub fn select(&mut self, weapon: Option<Entity>) {
        self.target = weapon;
    }

    pub fn state(&self) -> EquipState {
        self.state
    }

    /// Оружие в руке (после GrabWeapon)
    pub fn in_hand(&self) -> Option<Entity> {
        self.equipped
    }

    pub fn incoming(&self) -> Option<Entity> {
        self.incoming
    }

    /// Equipped и держим оружие
    pub fn is_ready(&self) -> bool {
        self.state == EquipState::Equipped && self.equipped.is_some()
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, EquipState::Equipping | EquipState::Unequipping)
    }

    /// Target отличается от того, что в руке, и нет transition в процессе
    pub fn wants_change(&self) -> bool {
        !self.is_transitioning() && self.target != self.equipped
    }

    /// true если это новый отказ (стоит залогировать)
    pub fn note_rejected(&mut self, weapon: Entity) -> bool {
        self.rejected.replace(weapon) != Some(weapon)
    }

    /// `weapon` уже claimed вызывающим
    pub fn begin_equip(&mut self, weapon: Entity, oracle: &mut dyn AnimationOracle) -> Vec<EquipChange> {
        if self.state != EquipState::Unequipped {
            return Vec::new();
        }
        self.state = EquipState::Equipping;
        self.incoming = Some(weapon);
        self.elapsed = 0.0;
        self.rejected = None;

        if !oracle.supports(Motion::Equip) {
            return self.on_equip_finished();
        }
        oracle.request_trigger(Motion::Equip);
        Vec::new()
    }

    pub fn begin_unequip(&mut self, oracle: &mut dyn AnimationOracle) -> Vec<EquipChange> {
        if self.state != EquipState::Equipped {
            return Vec::new();
        }
        self.state = EquipState::Unequipping;
        self.elapsed = 0.0;

        if !oracle.supports(Motion::Unequip) {
            return self.on_unequip_finished();
        }
        oracle.request_trigger(Motion::Unequip);
        Vec::new()
    }

    /// Callback: рука взяла оружие
    pub fn on_grab(&mut self) -> Vec<EquipChange> {
        if self.state != EquipState::Equipping || self.equipped.is_some() {
            return Vec::new();
        }
        self.equipped = self.incoming;
        self.equipped.map(EquipChange::Grabbed).into_iter().collect()
    }

    /// Callback: equip clip закончен (grab без callback'а: неявно)
    pub fn on_equip_finished(&mut self) -> Vec<EquipChange> {
        if self.state != EquipState::Equipping {
            return Vec::new();
        }
        let mut changes = self.on_grab();
        self.state = EquipState::Equipped;
        self.incoming = None;
        self.elapsed = 0.0;
        changes.extend(self.equipped.map(EquipChange::Equipped));
        changes
    }

    /// Callback: оружие убрано
    pub fn on_unequip_finished(&mut self) -> Vec<EquipChange> {
        if self.state != EquipState::Unequipping {
            return Vec::new();
        }
        self.state = EquipState::Unequipped;
        self.elapsed = 0.0;
        self.equipped.take().map(EquipChange::Unequipped).into_iter().collect()
    }

    /// Cap ожидания callback'ов → force-complete
    pub fn tick_wait(&mut self, dt: f32, max_wait: f32) -> Vec<EquipChange> {
        if !self.is_transitioning() {
            return Vec::new();
        }
        self.elapsed += dt;
        if self.elapsed < max_wait {
            return Vec::new();
        }

        match self.state {
            EquipState::Equipping => self.on_equip_finished(),
            EquipState::Unequipping => self.on_unequip_finished(),
            _ => Vec::new(),
        }
    }

    /// Смерть: незавершённый transition откатывается в безопасное состояние
    ///
    /// Возвращает claimed, но так и не взятое оружие (его надо release).
    pub fn abandon(&mut self) -> Option<Entity> {
        self.elapsed = 0.0;
        match self.state {
            EquipState::Equipping => {
                let incoming = self.incoming.take();
                if self.equipped.is_some() {
                    self.state = EquipState::Equipped;
                    None
                } else {
                    self.state = EquipState::Unequipped;
                    incoming
                }
            }
            EquipState::Unequipping => {
                self.state = EquipState::Equipped;
                None
            }
            _ => None,
        }
    }
}
