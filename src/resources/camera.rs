//! World camera resource.
//!
//! The camera's `pos` is the world coordinate shown at the top-left of the
//! screen. `zoom` scales world units to pixels, so the visible world area is
//! `viewport / zoom`. The view is kept inside `bounds`, normally the map
//! rectangle; on an axis where the world is smaller than the view, the world
//! is centred instead.

use bevy_ecs::prelude::Resource;
use raylib::prelude::{Camera2D, Vector2};

use crate::geom::{Rect, Size, Vec2I};
use crate::resources::tilemap::TileRange;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pos: Vector2,
    viewport: Size,
    bounds: Rect,
    zoom: f32,
}

impl Camera {
    pub fn new(viewport: Size, bounds: Rect) -> Self {
        Self {
            pos: Vector2::zero(),
            viewport,
            bounds,
            zoom: 1.0,
        }
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.set_zoom(zoom);
        self
    }

    /// Non-positive zoom values are ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom > 0.0 {
            self.zoom = zoom;
            self.clamp();
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.clamp();
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.clamp();
    }

    /// Size of the visible world area in world units.
    pub fn view_size(&self) -> Vector2 {
        Vector2::new(
            self.viewport.w as f32 / self.zoom,
            self.viewport.h as f32 / self.zoom,
        )
    }

    pub fn view_rect(&self) -> Rect {
        let view = self.view_size();
        Rect::new(self.pos.x, self.pos.y, view.x, view.y)
    }

    pub fn centre_on(&mut self, target: Vector2) {
        let view = self.view_size();
        self.pos = Vector2::new(target.x - view.x / 2.0, target.y - view.y / 2.0);
        self.clamp();
    }

    /// World position to screen position.
    pub fn apply(&self, world: Vector2) -> Vector2 {
        Vector2::new(
            (world.x - self.pos.x) * self.zoom,
            (world.y - self.pos.y) * self.zoom,
        )
    }

    pub fn screen_to_world(&self, screen: Vector2) -> Vector2 {
        Vector2::new(
            screen.x / self.zoom + self.pos.x,
            screen.y / self.zoom + self.pos.y,
        )
    }

    pub fn clamp(&mut self) {
        let view = self.view_size();
        self.pos.x = clamp_axis(self.pos.x, view.x, self.bounds.x, self.bounds.w);
        self.pos.y = clamp_axis(self.pos.y, view.y, self.bounds.y, self.bounds.h);
    }

    /// Tiles covering the view plus a one tile border, for culling.
    pub fn visible_tiles(&self, tile_w: u32, tile_h: u32) -> TileRange {
        let view = self.view_rect();
        let tw = tile_w.max(1) as f32;
        let th = tile_h.max(1) as f32;
        TileRange {
            min: Vec2I::new(
                (view.x / tw).floor() as i32 - 1,
                (view.y / th).floor() as i32 - 1,
            ),
            max: Vec2I::new(
                (view.right() / tw).ceil() as i32 + 1,
                (view.bottom() / th).ceil() as i32 + 1,
            ),
        }
    }

    pub fn to_raylib(&self) -> Camera2D {
        Camera2D {
            offset: Vector2::zero(),
            target: self.pos,
            rotation: 0.0,
            zoom: self.zoom,
        }
    }
}

fn clamp_axis(pos: f32, view: f32, min: f32, len: f32) -> f32 {
    if view >= len {
        return min - (view - len) / 2.0;
    }
    pos.clamp(min, min + len - view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cam() -> Camera {
        // 320x240 screen over a 640x480 world
        Camera::new(Size::new(320, 240), Rect::new(0.0, 0.0, 640.0, 480.0))
    }

    #[test]
    fn test_centre_on_middle() {
        let mut c = cam();
        c.centre_on(Vector2::new(320.0, 240.0));
        assert_eq!((c.pos.x, c.pos.y), (160.0, 120.0));
    }

    #[test]
    fn test_centre_on_clamps_to_bounds() {
        let mut c = cam();
        c.centre_on(Vector2::new(10.0, 10.0));
        assert_eq!((c.pos.x, c.pos.y), (0.0, 0.0));
        c.centre_on(Vector2::new(1000.0, 1000.0));
        assert_eq!((c.pos.x, c.pos.y), (320.0, 240.0));
    }

    #[test]
    fn test_zoom_shrinks_view() {
        let mut c = cam().with_zoom(2.0);
        assert_eq!(c.view_size(), Vector2::new(160.0, 120.0));
        c.centre_on(Vector2::new(320.0, 240.0));
        assert_eq!((c.pos.x, c.pos.y), (240.0, 180.0));
        let s = c.apply(Vector2::new(250.0, 190.0));
        assert_eq!((s.x, s.y), (20.0, 20.0));
        let w = c.screen_to_world(s);
        assert_eq!((w.x, w.y), (250.0, 190.0));
    }

    #[test]
    fn test_small_world_is_centred() {
        let mut c = Camera::new(Size::new(320, 240), Rect::new(0.0, 0.0, 160.0, 480.0));
        c.centre_on(Vector2::new(0.0, 0.0));
        assert_eq!(c.pos.x, -80.0);
        assert_eq!(c.pos.y, 0.0);
    }

    #[test]
    fn test_ignores_bad_zoom() {
        let mut c = cam();
        c.set_zoom(0.0);
        assert_eq!(c.zoom(), 1.0);
    }

    #[test]
    fn test_visible_tiles_has_border() {
        let mut c = cam();
        c.centre_on(Vector2::new(320.0, 240.0));
        let r = c.visible_tiles(16, 16);
        assert_eq!(r.min, Vec2I::new(9, 6));
        assert_eq!(r.max, Vec2I::new(31, 24));
    }

    #[test]
    fn test_to_raylib_matches_apply() {
        let mut c = cam().with_zoom(2.0);
        c.centre_on(Vector2::new(300.0, 200.0));
        let rc = c.to_raylib();
        assert_eq!(rc.target, c.pos);
        assert_eq!(rc.zoom, 2.0);
    }
}
