//! Simple pursuit AI.

use bevy_ecs::prelude::{Component, Entity};

/// Walks toward `target` while it is within `sight_range` pixels and nothing
/// solid blocks the line between them. See
/// [`chase`](crate::topdown::chase::chase).
#[derive(Component, Clone, Copy, Debug)]
pub struct Chaser {
    pub target: Entity,
    pub sight_range: f32,
}

impl Chaser {
    pub fn new(target: Entity, sight_range: f32) -> Self {
        Self {
            target,
            sight_range,
        }
    }
}
