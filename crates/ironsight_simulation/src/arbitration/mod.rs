//! Action arbitration: intents → canonical agent state
//!
//! # Architecture
//!
//! - `intents`: per-tick `input_*` requests (player input / AI)
//! - `action`: взаимоисключающие actions, приоритеты, supersede
//! - `state`: `AgentState` (action + ортогональные модификаторы)
//! - `systems`: sensors, life state, resolve, очистка intents

use bevy::prelude::*;

pub mod action;
pub mod events;
pub mod intents;
pub mod state;
pub mod systems;


pub use action::*;
pub use events::*;
pub use intents::*;
pub use state::*;
pub use systems::*;

/// Arbitration plugin
pub struct ArbitrationPlugin;

impl Plugin for ArbitrationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Jumped>().add_event::<Landed>();

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: host sensors + alive/dead
                (read_sensors, track_life_state)
                    .chain()
                    .in_set(crate::TickSet::Sense),
                // Фаза 2: mutual exclusion
                resolve_actions.in_set(crate::TickSet::Arbitrate),
                // Фаза последняя: one-shot intents
                clear_intents.in_set(crate::TickSet::Cleanup),
            ),
        );
    }
}
