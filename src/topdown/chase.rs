//! Line of sight and pursuit.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use crate::components::boxcollider::BoxCollider;
use crate::components::chaser::Chaser;
use crate::components::mapposition::MapPosition;
use crate::components::movement::Movement;
use crate::geom::{Rect, Vec2I};
use crate::resources::tilemap::{CollisionLayer, TileMap};

/// Half the side of the square probe tested along a sight ray.
const PROBE_HALF: f32 = 1.0;

/// Closer than this on an axis and the chaser stops steering on it.
const AXIS_DEADZONE: f32 = 1.0;

/// True when `to` is within `range` of `from` and no solid tile of `layer`
/// lies between them.
///
/// The segment is sampled every half tile (endpoints included) with a 2x2
/// probe. Probes leaving the map count as blocked, as does an invalid layer.
pub fn has_line_of_sight(
    map: &TileMap,
    layer: usize,
    from: Vector2,
    to: Vector2,
    range: f32,
) -> bool {
    let delta = to - from;
    let distance = delta.length();
    if distance > range {
        return false;
    }
    let step = (map.tile_w().min(map.tile_h()) as f32 / 2.0).max(1.0);
    let samples = (distance / step).ceil() as usize;
    for i in 0..=samples {
        let t = if samples == 0 {
            0.0
        } else {
            i as f32 / samples as f32
        };
        let p = from + delta * t;
        let probe = Rect::new(
            p.x - PROBE_HALF,
            p.y - PROBE_HALF,
            PROBE_HALF * 2.0,
            PROBE_HALF * 2.0,
        );
        match map.overlaps_tiles(probe, layer) {
            Ok(false) => {}
            _ => return false,
        }
    }
    true
}

fn focus(position: &MapPosition, collider: Option<&BoxCollider>) -> Vector2 {
    match collider {
        Some(c) => c.center(position.pos),
        None => position.pos,
    }
}

fn axis_dir(d: f32) -> i32 {
    if d > AXIS_DEADZONE {
        1
    } else if d < -AXIS_DEADZONE {
        -1
    } else {
        0
    }
}

/// Steer every [`Chaser`] toward its target's collider centre while the
/// target is visible; otherwise stand still.
///
/// Without a tile map only the sight range is checked. A despawned target
/// stops the chaser.
pub fn chase(
    mut chasers: Query<(&Chaser, &MapPosition, Option<&BoxCollider>, &mut Movement)>,
    targets: Query<(&MapPosition, Option<&BoxCollider>)>,
    map: Option<Res<TileMap>>,
    collision_layer: Option<Res<CollisionLayer>>,
) {
    for (chaser, position, collider, mut movement) in chasers.iter_mut() {
        let Ok((target_pos, target_collider)) = targets.get(chaser.target) else {
            movement.desired_dir = Vec2I::ZERO;
            continue;
        };
        let from = focus(position, collider);
        let to = focus(target_pos, target_collider);

        let visible = match (map.as_deref(), collision_layer.as_deref()) {
            (Some(map), Some(layer)) => {
                has_line_of_sight(map, layer.0, from, to, chaser.sight_range)
            }
            _ => (to - from).length() <= chaser.sight_range,
        };

        movement.desired_dir = if visible {
            Vec2I::new(axis_dir(to.x - from.x), axis_dir(to.y - from.y))
        } else {
            Vec2I::ZERO
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Size;
    use crate::resources::tilemap::TileLayer;

    /// 8x4 map of 16px tiles, a wall at column 4 on rows 0..2.
    fn map() -> TileMap {
        let mut data = vec![0; 32];
        data[4] = 1;
        data[8 + 4] = 1;
        TileMap::new(
            16,
            16,
            Size::new(8, 4),
            vec![TileLayer {
                name: "walls".into(),
                data,
            }],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_clear_line() {
        let m = map();
        assert!(has_line_of_sight(
            &m,
            0,
            Vector2::new(8.0, 56.0),
            Vector2::new(120.0, 56.0),
            200.0
        ));
    }

    #[test]
    fn test_wall_blocks() {
        let m = map();
        assert!(!has_line_of_sight(
            &m,
            0,
            Vector2::new(8.0, 8.0),
            Vector2::new(120.0, 8.0),
            200.0
        ));
    }

    #[test]
    fn test_out_of_range() {
        let m = map();
        assert!(!has_line_of_sight(
            &m,
            0,
            Vector2::new(8.0, 56.0),
            Vector2::new(120.0, 56.0),
            50.0
        ));
    }

    #[test]
    fn test_same_point_is_visible() {
        let m = map();
        let p = Vector2::new(24.0, 40.0);
        assert!(has_line_of_sight(&m, 0, p, p, 0.0));
    }

    #[test]
    fn test_invalid_layer_blocks() {
        let m = map();
        let p = Vector2::new(24.0, 40.0);
        assert!(!has_line_of_sight(&m, 5, p, p, 10.0));
    }
}
