//! A ready-made ECS world for top-down levels.
//!
//! [`TopdownWorld`] bundles a `bevy_ecs` [`World`] holding the standard
//! resources with the [`Schedule`] that moves, animates and films its
//! entities. Games add their own systems through
//! [`TopdownWorld::schedule_mut`], ordering them against the exported
//! system functions (for example `.before(movement)`).

use bevy_ecs::prelude::*;

use crate::geom::Size;
use crate::resources::animationlibrary::AnimationLibrary;
use crate::resources::assets::Assets;
use crate::resources::camera::Camera;
use crate::resources::debugmode::DebugMode;
use crate::resources::input::InputState;
use crate::resources::screensize::ScreenSize;
use crate::resources::tilemap::{CollisionLayer, TileMap, TileMapError};
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::{animation, animation_controller};
use crate::systems::camera::camera_follow;
use crate::systems::inputdirection::input_direction;
use crate::systems::lifecycle::remove_dead;
use crate::systems::movement::movement;
use crate::systems::time::update_world_time;
use crate::topdown::chase::chase;

pub struct TopdownWorld {
    world: World,
    schedule: Schedule,
}

impl TopdownWorld {
    /// Build a world around `map`, colliding against `collision_layer`.
    ///
    /// The camera covers `viewport` pixels at `zoom` and is bounded by the
    /// map.
    pub fn new(
        map: TileMap,
        collision_layer: usize,
        viewport: Size,
        zoom: f32,
    ) -> Result<Self, TileMapError> {
        let layer = CollisionLayer::checked(&map, collision_layer)?;
        let mut camera = Camera::new(viewport, map.world_rect()).with_zoom(zoom);
        camera.clamp();

        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(InputState::default());
        world.insert_resource(ScreenSize::from(viewport));
        world.insert_resource(camera);
        world.insert_resource(map);
        world.insert_resource(layer);
        world.insert_resource(AnimationLibrary::new());
        world.insert_resource(Assets::new());

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                input_direction,
                chase,
                movement,
                animation_controller,
                animation,
                camera_follow,
                remove_dead,
            )
                .chain(),
        );

        Ok(Self { world, schedule })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    pub fn is_debug(&self) -> bool {
        self.world.contains_resource::<DebugMode>()
    }

    pub fn set_debug(&mut self, on: bool) {
        if on {
            self.world.insert_resource(DebugMode);
        } else {
            self.world.remove_resource::<DebugMode>();
        }
    }

    /// Run one frame: publish `input`, advance time by `dt` seconds and run
    /// the schedule. The debug key toggles [`DebugMode`].
    pub fn update(&mut self, input: &InputState, dt: f32) {
        if input.mode_debug.just_pressed {
            let on = !self.is_debug();
            self.set_debug(on);
        }
        *self.world.resource_mut::<InputState>() = input.clone();
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }
}
