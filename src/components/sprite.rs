use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Vector2};

use crate::resources::assets::SpriteFrame;

/// How an entity is drawn when its animation has nothing to show.
///
/// `size` is the drawn size in world units and `offset` moves the drawing
/// relative to the entity position, so a 48x48 frame can be centred over a
/// 16x16 collider. Without a `fallback` frame, a solid `color` rectangle of
/// `size` is drawn instead.
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub fallback: Option<SpriteFrame>,
    pub size: Vector2,
    pub offset: Vector2,
    pub color: Color,
    pub flip_h: bool,
}

impl Sprite {
    pub fn solid(width: f32, height: f32, color: Color) -> Self {
        Self {
            fallback: None,
            size: Vector2::new(width, height),
            offset: Vector2::zero(),
            color,
            flip_h: false,
        }
    }

    pub fn with_frame(mut self, frame: SpriteFrame) -> Self {
        self.fallback = Some(frame);
        self
    }

    pub fn with_offset(mut self, offset: Vector2) -> Self {
        self.offset = offset;
        self
    }
}
