//! Equipment module: equip/unequip lifecycle + reload cycle
//!
//! # Architecture
//!
//! **Callbacks → Systems flow:**
//! - `WeaponHolder::select` задаёт target (AI / input)
//! - Systems запрашивают motions у Animator
//! - AnimationCallback (GrabWeapon/Equip/Unequip, BulletLoad/MagazineLoad/Pump)
//!   продвигает state на следующем tick
//! - Oracle молчит дольше `max_wait_secs` → force-complete
//!
//! **Weapon lifecycle:**
//! - Unequipped → Equipping (claim ownership) → Equipped
//! - Equipped → Unequipping → Unequipped (release ownership) → equip target
//!
//! **Reload:**
//! - Magazine: весь магазин за callback
//! - Bullet / BulletThenPump: по патрону, pump в конце

use bevy::prelude::*;

pub mod events;
pub mod lifecycle;
pub mod reload;
pub mod systems;

#[cfg(test)]
mod reload_tests;

// Re-exports
pub use events::*;
pub use lifecycle::*;
pub use reload::*;
pub use systems::*;

/// Equipment plugin (lifecycle + reload)
pub struct EquipmentPlugin;

impl Plugin for EquipmentPlugin {
    fn build(&self, app: &mut App) {
        app
            // Events
            .add_event::<WeaponChanged>()
            .add_event::<BulletLoaded>()
            .add_event::<FullyLoaded>()
            .add_event::<Pumped>()
            // Systems (FixedUpdate, после arbitration)
            .add_systems(
                FixedUpdate,
                (drive_equip_transitions, drive_reload_cycles)
                    .chain()
                    .in_set(crate::TickSet::Equip),
            );
    }
}
