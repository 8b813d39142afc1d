//! Screen size resource.
//!
//! Window dimensions in pixels, as seen by the scene that owns the world.

use bevy_ecs::prelude::Resource;

use crate::geom::Size;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ScreenSize {
    pub w: i32,
    pub h: i32,
}

impl From<Size> for ScreenSize {
    fn from(size: Size) -> Self {
        Self {
            w: size.w as i32,
            h: size.h as i32,
        }
    }
}
