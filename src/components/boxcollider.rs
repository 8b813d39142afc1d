use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

use crate::geom::Rect;

/// Axis-aligned collision box, placed at `position + offset`.
///
/// Sprites are often drawn on a larger canvas than the body that should hit
/// walls; the offset lets the box sit inside the drawn frame.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vector2,
    pub offset: Vector2,
}

impl BoxCollider {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vector2::new(width, height),
            offset: Vector2::zero(),
        }
    }

    pub fn with_offset(mut self, offset: Vector2) -> Self {
        self.offset = offset;
        self
    }

    /// The collider rectangle in world space for an entity at `position`.
    pub fn rect(&self, position: Vector2) -> Rect {
        Rect::new(
            position.x + self.offset.x,
            position.y + self.offset.y,
            self.size.x,
            self.size.y,
        )
    }

    pub fn center(&self, position: Vector2) -> Vector2 {
        self.rect(position).center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_applies_offset() {
        let c = BoxCollider::new(16.0, 16.0).with_offset(Vector2::new(16.0, 20.0));
        let r = c.rect(Vector2::new(100.0, 200.0));
        assert_eq!(r, Rect::new(116.0, 220.0, 16.0, 16.0));
        let centre = c.center(Vector2::new(100.0, 200.0));
        assert_eq!((centre.x, centre.y), (124.0, 228.0));
    }
}
