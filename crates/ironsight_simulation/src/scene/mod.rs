//! Scene boundary: query service + target registry
//!
//! - query: raycast / sphere sweep (host-side, trait + reference scenes)
//! - registry: кто body / body part / shield, health roots, ownership

use bevy::prelude::*;

pub mod query;
pub mod registry;

pub use query::*;
pub use registry::*;

/// Scene plugin: registry resource + sync system
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TargetRegistry>();

        // SceneQueries host может вставить до plugin'а: не перетираем
        if !app.world().contains_resource::<SceneQueries>() {
            app.init_resource::<SceneQueries>();
        }

        app.add_systems(
            FixedUpdate,
            sync_target_registry.in_set(crate::TickSet::Sense),
        );
    }
}
