use bevy_ecs::prelude::Component;

/// Entities marked dead are despawned by
/// [`remove_dead`](crate::systems::lifecycle::remove_dead) at the end of the
/// frame.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Dead;
