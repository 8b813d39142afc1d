use bevy_ecs::prelude::Component;

/// The camera centres on the first entity carrying this marker.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct CameraTarget;
