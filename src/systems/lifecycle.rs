//! End-of-frame entity cleanup.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::dead::Dead;

/// Despawn every entity marked [`Dead`].
pub fn remove_dead(query: Query<Entity, With<Dead>>, mut commands: Commands) {
    for entity in query.iter() {
        debug!("Removing dead entity {:?}", entity);
        commands.entity(entity).despawn();
    }
}
