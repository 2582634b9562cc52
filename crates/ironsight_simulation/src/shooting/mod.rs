//! Shooting domain: fire resolution engine
//!
//! Содержит:
//! - WeaponConfig / Ammo (static data + счётчики)
//! - Gun (rate limiter, catch-up loop, ownership)
//! - spread / recoil (aim error)
//! - resolve / melee (hit filters, friend detection, hit records)
//! - systems (aim gate, fire resolution, recoil decay)

use bevy::prelude::*;

pub mod events;
pub mod gun;
pub mod melee;
pub mod recoil;
pub mod resolve;
pub mod spread;
pub mod systems;
pub mod weapon;

#[cfg(test)]
mod gun_tests;

// Re-export all components and functions
pub use events::*;
pub use gun::*;
pub use melee::*;
pub use recoil::*;
pub use resolve::*;
pub use systems::*;
pub use weapon::*;

/// Shooting plugin
pub struct ShootingPlugin;

impl Plugin for ShootingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Fired>()
            .add_event::<EmptyFire>()
            .add_event::<FireStarted>()
            .add_event::<FireStopped>()
            .add_event::<SuccessfulHit>()
            .add_event::<Zoomed>()
            .add_event::<Unzoomed>();

        app.add_systems(
            FixedUpdate,
            (
                gate_aim_and_fire.in_set(crate::TickSet::Gate),
                (resolve_weapon_fire, decay_recoil)
                    .chain()
                    .in_set(crate::TickSet::Weapons),
            ),
        );
    }
}
