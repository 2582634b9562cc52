//! Cover module: укрытия и offset sub-FSM
//!
//! Геометрия укрытий: зона host'а (SensorReadings::cover_candidate);
//! core решает когда входить/выходить и куда смещать агента.

use bevy::prelude::*;

pub mod events;
pub mod offset;
pub mod spot;
pub mod systems;

pub use events::*;
pub use offset::*;
pub use spot::*;
pub use systems::*;

/// Cover plugin
pub struct CoverPlugin;

impl Plugin for CoverPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnteredCover>()
            .add_event::<ExitedCover>()
            .add_systems(
                FixedUpdate,
                (
                    resolve_cover.in_set(crate::TickSet::Cover),
                    tick_cover_offsets.in_set(crate::TickSet::CoverOffset),
                ),
            );
    }
}
