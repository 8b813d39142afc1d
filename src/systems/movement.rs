//! Movement with tile collision.
//!
//! Each frame the [`movement`] system turns [`Movement::desired_dir`] into a
//! displacement and moves the entity. Entities with a [`BoxCollider`] are
//! checked against the [`CollisionLayer`] of the [`TileMap`] one axis at a
//! time: X first at the old Y, then Y at the already-resolved X. Blocking
//! one axis therefore still lets the other slide along the wall.

use bevy_ecs::prelude::*;
use log::warn;
use raylib::prelude::Vector2;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::movement::Movement;
use crate::components::signals::Signals;
use crate::geom::Rect;
use crate::resources::tilemap::{CollisionLayer, TileMap, TileMapError};
use crate::resources::worldtime::WorldTime;

/// Gap left between a collider and the wall it was pushed against.
pub const COLLISION_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn start(self, r: &Rect) -> f32 {
        match self {
            Axis::X => r.x,
            Axis::Y => r.y,
        }
    }

    fn len(self, r: &Rect) -> f32 {
        match self {
            Axis::X => r.w,
            Axis::Y => r.h,
        }
    }

    fn place(self, r: Rect, v: f32) -> Rect {
        match self {
            Axis::X => r.with_x(v),
            Axis::Y => r.with_y(v),
        }
    }

    fn tile(self, map: &TileMap) -> f32 {
        match self {
            Axis::X => map.tile_w() as f32,
            Axis::Y => map.tile_h() as f32,
        }
    }

    fn extent(self, map: &TileMap) -> f32 {
        let world = map.world_rect();
        match self {
            Axis::X => world.right(),
            Axis::Y => world.bottom(),
        }
    }
}

/// Move `rect` by `delta` along `axis`, stopping at solid tiles of `layer`.
///
/// Returns the new coordinate of the rectangle's leading-axis origin. Long
/// moves are split into steps of at most one tile. On a hit the rectangle is
/// pushed flush against the tile edge minus [`COLLISION_EPSILON`]; if that
/// spot is still blocked the rectangle stays where the step started. The map
/// edges stop the rectangle the same way, with or without border tiles.
pub fn resolve_axis_movement(
    map: &TileMap,
    layer: usize,
    rect: Rect,
    axis: Axis,
    delta: f32,
) -> Result<f32, TileMapError> {
    let mut pos = axis.start(&rect);
    if delta == 0.0 {
        return Ok(pos);
    }
    let tile = axis.tile(map);
    let size = axis.len(&rect);
    let extent = axis.extent(map);
    let steps = (delta.abs() / tile).ceil().max(1.0) as usize;
    let step = delta / steps as f32;

    for _ in 0..steps {
        let wanted = pos + step;
        // never further out than the map edge, never backwards
        let target = if step > 0.0 {
            wanted.min((extent - size - COLLISION_EPSILON).max(pos))
        } else {
            wanted.max(COLLISION_EPSILON.min(pos))
        };
        let at_edge = target != wanted;
        if !map.overlaps_tiles(axis.place(rect, target), layer)? {
            pos = target;
            if at_edge {
                break;
            }
            continue;
        }

        let clamped = if step > 0.0 {
            // last tile touched by the leading (right/bottom) edge
            let edge = (((target + size) / tile).ceil() - 1.0) * tile;
            (edge - size - COLLISION_EPSILON).clamp(pos, target)
        } else {
            let edge = ((target / tile).floor() + 1.0) * tile;
            (edge + COLLISION_EPSILON).clamp(target, pos)
        };
        if !map.overlaps_tiles(axis.place(rect, clamped), layer)? {
            pos = clamped;
        }
        break;
    }
    Ok(pos)
}

/// Apply `delta` to an entity at `pos` whose collider must stay clear of
/// `layer`. X is resolved before Y.
pub fn move_with_collision(
    map: &TileMap,
    layer: usize,
    collider: &BoxCollider,
    pos: Vector2,
    delta: Vector2,
) -> Result<Vector2, TileMapError> {
    let start = collider.rect(pos);
    let x = resolve_axis_movement(map, layer, start, Axis::X, delta.x)?;
    let after_x = start.with_x(x);
    let y = resolve_axis_movement(map, layer, after_x, Axis::Y, delta.y)?;
    Ok(Vector2::new(pos.x + (x - start.x), pos.y + (y - start.y)))
}

/// Move every entity with a [`Movement`] component.
///
/// Updates `is_moving` and `facing_dir`, and when the entity has
/// [`Signals`], publishes flag `moving`, integers `facing_x`/`facing_y` and
/// scalar `speed` for the animation state machine.
pub fn movement(
    mut query: Query<(
        &mut MapPosition,
        &mut Movement,
        Option<&BoxCollider>,
        Option<&mut Signals>,
    )>,
    time: Res<WorldTime>,
    map: Option<Res<TileMap>>,
    collision_layer: Option<Res<CollisionLayer>>,
) {
    let dt = time.delta;
    for (mut position, mut movement, collider, signals) in query.iter_mut() {
        movement.is_moving = !movement.desired_dir.is_zero();
        if movement.is_moving {
            movement.facing_dir = movement.desired_dir;
        }

        if let Some(mut signals) = signals {
            signals.put_flag("moving", movement.is_moving);
            signals.set_integer("facing_x", movement.facing_dir.x);
            signals.set_integer("facing_y", movement.facing_dir.y);
            let speed = if movement.is_moving { movement.speed } else { 0.0 };
            signals.set_scalar("speed", speed);
        }

        if !movement.is_moving {
            continue;
        }
        let delta = movement.desired_dir.as_vector2().normalized() * (movement.speed * dt);

        match (map.as_deref(), collision_layer.as_deref(), collider) {
            (Some(map), Some(layer), Some(collider)) => {
                match move_with_collision(map, layer.0, collider, position.pos, delta) {
                    Ok(pos) => position.pos = pos,
                    Err(e) => warn!("Skipping collision move: {}", e),
                }
            }
            _ => position.pos += delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Size;
    use crate::resources::tilemap::TileLayer;

    /// 4x4 map of 16px tiles with a solid column at x = 2 (pixels 32..48)
    /// in rows 0..3.
    fn walled_map() -> TileMap {
        #[rustfmt::skip]
        let walls = vec![
            0, 0, 1, 0,
            0, 0, 1, 0,
            0, 0, 1, 0,
            0, 0, 0, 0,
        ];
        TileMap::new(
            16,
            16,
            Size::new(4, 4),
            vec![TileLayer {
                name: "walls".into(),
                data: walls,
            }],
            vec![],
        )
        .unwrap()
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_free_move() {
        let map = walled_map();
        let x = resolve_axis_movement(&map, 0, Rect::new(2.0, 2.0, 8.0, 8.0), Axis::X, 5.0)
            .unwrap();
        assert!(close(x, 7.0));
    }

    #[test]
    fn test_stops_against_wall_moving_right() {
        let map = walled_map();
        let x = resolve_axis_movement(&map, 0, Rect::new(10.0, 2.0, 8.0, 8.0), Axis::X, 20.0)
            .unwrap();
        assert!(close(x, 32.0 - 8.0 - COLLISION_EPSILON), "x = {x}");
    }

    #[test]
    fn test_stops_against_wall_moving_left() {
        let map = walled_map();
        let x = resolve_axis_movement(&map, 0, Rect::new(50.0, 2.0, 8.0, 8.0), Axis::X, -20.0)
            .unwrap();
        assert!(close(x, 48.0 + COLLISION_EPSILON), "x = {x}");
    }

    #[test]
    fn test_flush_against_wall_does_not_move() {
        let map = walled_map();
        let x = resolve_axis_movement(&map, 0, Rect::new(24.0, 2.0, 8.0, 8.0), Axis::X, 16.0)
            .unwrap();
        assert!(close(x, 24.0));
    }

    #[test]
    fn test_no_tunnelling_on_large_step() {
        let map = walled_map();
        let x = resolve_axis_movement(&map, 0, Rect::new(10.0, 2.0, 8.0, 8.0), Axis::X, 500.0)
            .unwrap();
        assert!(x < 32.0 - 8.0, "x = {x}");
    }

    #[test]
    fn test_slides_along_wall() {
        let map = walled_map();
        let collider = BoxCollider::new(8.0, 8.0);
        // pushing into the wall diagonally: X blocks, Y still moves
        let pos = move_with_collision(
            &map,
            0,
            &collider,
            Vector2::new(23.0, 10.0),
            Vector2::new(4.0, 4.0),
        )
        .unwrap();
        assert!(close(pos.x, 24.0 - COLLISION_EPSILON));
        assert!(close(pos.y, 14.0));
    }

    #[test]
    fn test_offset_collider_keeps_entity_offset() {
        let map = walled_map();
        let collider = BoxCollider::new(8.0, 8.0).with_offset(Vector2::new(4.0, 4.0));
        let pos = move_with_collision(
            &map,
            0,
            &collider,
            Vector2::new(6.0, 0.0),
            Vector2::new(30.0, 0.0),
        )
        .unwrap();
        // collider right edge stops at 32, entity is 4px left of the collider
        assert!(close(pos.x + 4.0 + 8.0, 32.0 - COLLISION_EPSILON), "x = {}", pos.x);
    }

    /// 4x4 map of 16px tiles with a solid row at y = 2 (pixels 32..48)
    /// in columns 0..3.
    fn floor_map() -> TileMap {
        #[rustfmt::skip]
        let walls = vec![
            0, 0, 0, 0,
            0, 0, 0, 0,
            1, 1, 1, 0,
            0, 0, 0, 0,
        ];
        TileMap::new(
            16,
            16,
            Size::new(4, 4),
            vec![TileLayer {
                name: "walls".into(),
                data: walls,
            }],
            vec![],
        )
        .unwrap()
    }

    /// 4x4 map of 16px tiles with no solid tiles at all.
    fn open_map() -> TileMap {
        TileMap::new(
            16,
            16,
            Size::new(4, 4),
            vec![TileLayer {
                name: "walls".into(),
                data: vec![0; 16],
            }],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_stops_against_wall_moving_down() {
        let map = floor_map();
        let y = resolve_axis_movement(&map, 0, Rect::new(2.0, 10.0, 8.0, 8.0), Axis::Y, 20.0)
            .unwrap();
        assert!(close(y, 32.0 - 8.0 - COLLISION_EPSILON), "y = {y}");
    }

    #[test]
    fn test_stops_against_wall_moving_up() {
        let map = floor_map();
        let y = resolve_axis_movement(&map, 0, Rect::new(2.0, 50.0, 8.0, 8.0), Axis::Y, -20.0)
            .unwrap();
        assert!(close(y, 48.0 + COLLISION_EPSILON), "y = {y}");
    }

    #[test]
    fn test_slides_along_floor() {
        let map = floor_map();
        let collider = BoxCollider::new(8.0, 8.0);
        // pushing into the row diagonally: Y blocks, X still moves
        let pos = move_with_collision(
            &map,
            0,
            &collider,
            Vector2::new(4.0, 20.0),
            Vector2::new(6.0, 6.0),
        )
        .unwrap();
        assert!(close(pos.x, 10.0), "x = {}", pos.x);
        assert!(close(pos.y, 32.0 - 8.0 - COLLISION_EPSILON), "y = {}", pos.y);
    }

    #[test]
    fn test_gap_in_row_lets_y_through() {
        let map = floor_map();
        let y = resolve_axis_movement(&map, 0, Rect::new(52.0, 10.0, 8.0, 8.0), Axis::Y, 20.0)
            .unwrap();
        assert!(close(y, 30.0), "y = {y}");
    }

    #[test]
    fn test_map_edge_stops_without_border_tiles() {
        let map = open_map();
        let right = resolve_axis_movement(&map, 0, Rect::new(50.0, 2.0, 8.0, 8.0), Axis::X, 20.0)
            .unwrap();
        assert!(close(right, 64.0 - 8.0 - COLLISION_EPSILON), "x = {right}");
        let left = resolve_axis_movement(&map, 0, Rect::new(5.0, 2.0, 8.0, 8.0), Axis::X, -20.0)
            .unwrap();
        assert!(close(left, COLLISION_EPSILON), "x = {left}");
        let down = resolve_axis_movement(&map, 0, Rect::new(2.0, 50.0, 8.0, 8.0), Axis::Y, 10.0)
            .unwrap();
        assert!(close(down, 64.0 - 8.0 - COLLISION_EPSILON), "y = {down}");
    }

    #[test]
    fn test_box_hanging_over_edge_does_not_go_further() {
        let map = open_map();
        let x = resolve_axis_movement(&map, 0, Rect::new(60.0, 2.0, 8.0, 8.0), Axis::X, 5.0)
            .unwrap();
        assert!(close(x, 60.0), "x = {x}");
        // but it can walk back inside
        let x = resolve_axis_movement(&map, 0, Rect::new(60.0, 2.0, 8.0, 8.0), Axis::X, -5.0)
            .unwrap();
        assert!(close(x, 55.0), "x = {x}");
    }

    #[test]
    fn test_invalid_layer_is_error() {
        let map = walled_map();
        assert!(
            resolve_axis_movement(&map, 3, Rect::new(0.0, 0.0, 1.0, 1.0), Axis::Y, 1.0).is_err()
        );
    }
}
