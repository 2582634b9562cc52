//! Combat system module (damage application)
//!
//! ECS ответственность:
//! - Game state: Health, Dead marker
//! - Combat rules: SuccessfulHit → health root → damage
//! - Events: DamageDealt, EntityDied
//!
//! Host ответственность:
//! - Hit эффекты, звуки, death animation

use bevy::prelude::*;

pub mod damage;

// Re-export основных типов
pub use damage::{apply_hit_damage, damage_target, DamageDealt, Dead, EntityDied};

/// Combat Plugin
///
/// Регистрирует damage систему в FixedUpdate (`TickSet::Damage`),
/// после weapon resolution текущего tick'а.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageDealt>().add_event::<EntityDied>();

        app.add_systems(FixedUpdate, apply_hit_damage.in_set(crate::TickSet::Damage));
    }
}
