//! Small geometry helpers shared by the tile map, movement and camera code.
//!
//! Float vectors are raylib's [`Vector2`]. This module only adds the integer
//! and rectangle types raylib does not model the way the engine needs them.

use raylib::prelude::{Rectangle, Vector2};

/// Integer 2D vector. Used for tile coordinates and for 8-way directions
/// where each axis is -1, 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vec2I {
    pub x: i32,
    pub y: i32,
}

impl Vec2I {
    pub const ZERO: Vec2I = Vec2I { x: 0, y: 0 };
    pub const DOWN: Vec2I = Vec2I { x: 0, y: 1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    pub fn as_vector2(&self) -> Vector2 {
        Vector2::new(self.x as f32, self.y as f32)
    }
}

/// Width and height, in pixels or tiles depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// Axis-aligned rectangle in world units. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap test; rectangles sharing only an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }
}

impl From<Rect> for Rectangle {
    fn from(r: Rect) -> Self {
        Rectangle {
            x: r.x,
            y: r.y,
            width: r.w,
            height: r.h,
        }
    }
}

/// Unit-length vector pointing the same way as `v`. A zero vector is
/// returned unchanged.
pub fn normalize(v: Vector2) -> Vector2 {
    v.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_stays_zero() {
        let v = normalize(Vector2::new(0.0, 0.0));
        assert_eq!(v.x, 0.0);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn test_normalize_diagonal_has_unit_length() {
        let v = normalize(Vector2::new(1.0, 1.0));
        let len = (v.x * v.x + v.y * v.y).sqrt();
        assert!((len - 1.0).abs() < 1e-6);
        assert!((v.x - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_rect_edges_touching_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 16.0, 16.0);
        let b = Rect::new(16.0, 0.0, 16.0, 16.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(15.5, 4.0, 4.0, 4.0)));
    }

    #[test]
    fn test_vec2i_zero() {
        assert!(Vec2I::ZERO.is_zero());
        assert!(!Vec2I::DOWN.is_zero());
    }
}
