//! Grid-free directional movement intent.
//!
//! Input or AI code writes [`Movement::desired_dir`]; the
//! [`movement`](crate::systems::movement::movement) system turns it into a
//! position change and keeps `facing_dir`/`is_moving` up to date.

use bevy_ecs::prelude::Component;

use crate::geom::Vec2I;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Movement {
    /// Pixels per second.
    pub speed: f32,
    /// Requested direction this frame, each axis in -1..=1.
    pub desired_dir: Vec2I,
    /// Last non-zero direction. Starts facing down.
    pub facing_dir: Vec2I,
    pub is_moving: bool,
}

impl Movement {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            desired_dir: Vec2I::ZERO,
            facing_dir: Vec2I::DOWN,
            is_moving: false,
        }
    }

    pub fn with_facing(mut self, facing: Vec2I) -> Self {
        self.facing_dir = facing;
        self
    }
}
