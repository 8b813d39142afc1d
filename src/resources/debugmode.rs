//! Debug toggle resource.
//!
//! When present, the renderer draws collider boxes, the tile grid of the
//! collision layer and chaser sight lines.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DebugMode;
