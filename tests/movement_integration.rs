//! Movement ticks through a schedule: walls, sliding, diagonal speed and the
//! signals published for animation.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use rayx::components::boxcollider::BoxCollider;
use rayx::components::inputcontrolled::InputControlled;
use rayx::components::mapposition::MapPosition;
use rayx::components::movement::Movement;
use rayx::components::signals::Signals;
use rayx::geom::{Size, Vec2I};
use rayx::resources::input::InputState;
use rayx::resources::tilemap::{CollisionLayer, TileLayer, TileMap};
use rayx::resources::worldtime::WorldTime;
use rayx::systems::inputdirection::input_direction;
use rayx::systems::movement::{COLLISION_EPSILON, movement};
use rayx::systems::time::update_world_time;

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// 10x10 map of 16px tiles. Layer 1 has a solid column at x = 5
/// (pixels 80..96) over the whole height.
fn column_map() -> TileMap {
    let mut walls = vec![0; 100];
    for y in 0..10 {
        walls[y * 10 + 5] = 1;
    }
    TileMap::new(
        16,
        16,
        Size::new(10, 10),
        vec![
            TileLayer {
                name: "floor".into(),
                data: vec![1; 100],
            },
            TileLayer {
                name: "walls".into(),
                data: walls,
            },
        ],
        vec![],
    )
    .unwrap()
}

/// 10x10 map of 16px tiles. Layer 1 has a solid row at y = 5
/// (pixels 80..96) over the whole width.
fn row_map() -> TileMap {
    let mut walls = vec![0; 100];
    for x in 0..10 {
        walls[5 * 10 + x] = 1;
    }
    TileMap::new(
        16,
        16,
        Size::new(10, 10),
        vec![
            TileLayer {
                name: "floor".into(),
                data: vec![1; 100],
            },
            TileLayer {
                name: "walls".into(),
                data: walls,
            },
        ],
        vec![],
    )
    .unwrap()
}

fn make_world() -> World {
    make_world_with(column_map())
}

fn make_world_with(map: TileMap) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(CollisionLayer::checked(&map, 1).unwrap());
    world.insert_resource(map);
    world
}

fn tick(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
}

fn movement_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((input_direction, movement).chain());
    schedule
}

#[test]
fn walker_stops_at_wall() {
    let mut world = make_world();
    let mut schedule = movement_schedule();
    let mut mv = Movement::new(100.0);
    mv.desired_dir = Vec2I::new(1, 0);
    let e = world
        .spawn((MapPosition::new(20.0, 20.0), BoxCollider::new(16.0, 16.0), mv))
        .id();

    for _ in 0..10 {
        tick(&mut world, &mut schedule, 0.1);
    }

    let pos = world.get::<MapPosition>(e).unwrap().pos;
    assert!(approx_eq(pos.x, 80.0 - 16.0 - COLLISION_EPSILON), "x = {}", pos.x);
    assert!(approx_eq(pos.y, 20.0));
}

#[test]
fn walker_slides_along_wall() {
    let mut world = make_world();
    let mut schedule = movement_schedule();
    let mut mv = Movement::new(100.0);
    mv.desired_dir = Vec2I::new(1, 1);
    let start = Vector2::new(80.0 - 16.0 - COLLISION_EPSILON, 20.0);
    let e = world
        .spawn((MapPosition::from_vec(start), BoxCollider::new(16.0, 16.0), mv))
        .id();

    tick(&mut world, &mut schedule, 0.1);

    let pos = world.get::<MapPosition>(e).unwrap().pos;
    let step = 100.0 * 0.1 * std::f32::consts::FRAC_1_SQRT_2;
    assert!(approx_eq(pos.x, start.x), "x = {}", pos.x);
    assert!(approx_eq(pos.y, 20.0 + step), "y = {}", pos.y);
}

#[test]
fn walker_stops_on_row_below_and_above() {
    let mut world = make_world_with(row_map());
    let mut schedule = movement_schedule();

    let mut down = Movement::new(100.0);
    down.desired_dir = Vec2I::new(0, 1);
    let falling = world
        .spawn((MapPosition::new(20.0, 20.0), BoxCollider::new(16.0, 16.0), down))
        .id();
    let mut up = Movement::new(100.0);
    up.desired_dir = Vec2I::new(0, -1);
    let rising = world
        .spawn((MapPosition::new(20.0, 130.0), BoxCollider::new(16.0, 16.0), up))
        .id();

    for _ in 0..10 {
        tick(&mut world, &mut schedule, 0.1);
    }

    let pos = world.get::<MapPosition>(falling).unwrap().pos;
    assert!(approx_eq(pos.y, 80.0 - 16.0 - COLLISION_EPSILON), "y = {}", pos.y);
    assert!(approx_eq(pos.x, 20.0));
    let pos = world.get::<MapPosition>(rising).unwrap().pos;
    assert!(approx_eq(pos.y, 96.0 + COLLISION_EPSILON), "y = {}", pos.y);
}

#[test]
fn walker_slides_along_row() {
    let mut world = make_world_with(row_map());
    let mut schedule = movement_schedule();
    let mut mv = Movement::new(100.0);
    mv.desired_dir = Vec2I::new(1, 1);
    let start = Vector2::new(20.0, 80.0 - 16.0 - COLLISION_EPSILON);
    let e = world
        .spawn((MapPosition::from_vec(start), BoxCollider::new(16.0, 16.0), mv))
        .id();

    tick(&mut world, &mut schedule, 0.1);

    let pos = world.get::<MapPosition>(e).unwrap().pos;
    let step = 100.0 * 0.1 * std::f32::consts::FRAC_1_SQRT_2;
    assert!(approx_eq(pos.x, 20.0 + step), "x = {}", pos.x);
    assert!(approx_eq(pos.y, start.y), "y = {}", pos.y);
}

#[test]
fn walker_stops_at_map_edge() {
    let mut world = make_world_with(row_map());
    let mut schedule = movement_schedule();
    let mut mv = Movement::new(100.0);
    mv.desired_dir = Vec2I::new(-1, 0);
    let e = world
        .spawn((MapPosition::new(20.0, 20.0), BoxCollider::new(16.0, 16.0), mv))
        .id();

    for _ in 0..5 {
        tick(&mut world, &mut schedule, 0.1);
    }

    let pos = world.get::<MapPosition>(e).unwrap().pos;
    assert!(approx_eq(pos.x, COLLISION_EPSILON), "x = {}", pos.x);
}

#[test]
fn diagonal_speed_is_normalised_without_map() {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    let mut schedule = Schedule::default();
    schedule.add_systems(movement);

    let mut mv = Movement::new(100.0);
    mv.desired_dir = Vec2I::new(-1, 1);
    let e = world.spawn((MapPosition::new(500.0, 500.0), mv)).id();

    tick(&mut world, &mut schedule, 0.1);

    let pos = world.get::<MapPosition>(e).unwrap().pos;
    let step = 10.0 * std::f32::consts::FRAC_1_SQRT_2;
    assert!(approx_eq(pos.x, 500.0 - step));
    assert!(approx_eq(pos.y, 500.0 + step));
}

#[test]
fn movement_publishes_signals() {
    let mut world = make_world();
    let mut schedule = movement_schedule();
    let e = world
        .spawn((
            MapPosition::new(20.0, 20.0),
            BoxCollider::new(16.0, 16.0),
            Movement::new(100.0),
            Signals::default(),
            InputControlled,
        ))
        .id();

    world
        .resource_mut::<InputState>()
        .maindirection_left
        .update(true);
    tick(&mut world, &mut schedule, 0.05);
    {
        let signals = world.get::<Signals>(e).unwrap();
        assert!(signals.has_flag("moving"));
        assert_eq!(signals.integer("facing_x"), Some(-1));
        assert_eq!(signals.integer("facing_y"), Some(0));
        assert_eq!(signals.scalar("speed"), Some(100.0));
    }
    assert!(approx_eq(world.get::<MapPosition>(e).unwrap().pos.x, 15.0));

    world
        .resource_mut::<InputState>()
        .maindirection_left
        .update(false);
    tick(&mut world, &mut schedule, 0.05);
    let signals = world.get::<Signals>(e).unwrap();
    assert!(!signals.has_flag("moving"));
    // facing survives the stop
    assert_eq!(signals.integer("facing_x"), Some(-1));
    assert_eq!(signals.scalar("speed"), Some(0.0));
    let mv = world.get::<Movement>(e).unwrap();
    assert!(!mv.is_moving);
    assert_eq!(mv.facing_dir, Vec2I::new(-1, 0));
}
