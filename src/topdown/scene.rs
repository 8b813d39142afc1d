//! A [`Scene`] that plays a Tiled map with a [`TopdownWorld`].

use std::path::PathBuf;

use bevy_ecs::prelude::Mut;
use log::info;
use raylib::prelude::RaylibDrawHandle;

use crate::resources::assets::Assets;
use crate::resources::input::InputState;
use crate::resources::tiled::load_map;
use crate::resources::tilemap::TileMap;
use crate::scene::{Scene, SceneContext, SceneError, SceneTransition};
use crate::systems::render::{render_debug_ui, render_world};
use crate::topdown::world::TopdownWorld;

type SetupFn = Box<dyn FnMut(&mut TopdownWorld, &mut SceneContext) -> Result<(), SceneError>>;
type TransitionFn = Box<dyn FnMut(&mut TopdownWorld, &InputState) -> SceneTransition>;

enum MapSource {
    File(PathBuf),
    Loaded(TileMap),
}

/// Loads its map when entered and drops its world when exited, so the same
/// scene value can be entered again.
pub struct TopdownScene {
    name: String,
    source: MapSource,
    collision_layer: usize,
    zoom: f32,
    debug: bool,
    setup: Option<SetupFn>,
    transition: Option<TransitionFn>,
    world: Option<TopdownWorld>,
}

impl TopdownScene {
    /// A scene reading its map from a `.tmx`, `.tmj` or `.json` file.
    pub fn new(map_path: impl Into<PathBuf>) -> Self {
        Self::with_source(MapSource::File(map_path.into()))
    }

    /// A scene around a map that is already in memory.
    pub fn from_map(map: TileMap) -> Self {
        Self::with_source(MapSource::Loaded(map))
    }

    fn with_source(source: MapSource) -> Self {
        Self {
            name: "topdown".into(),
            source,
            collision_layer: 1,
            zoom: 1.0,
            debug: false,
            setup: None,
            transition: None,
            world: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_collision_layer(mut self, layer: usize) -> Self {
        self.collision_layer = layer;
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Start with debug drawing on.
    pub fn with_debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }

    /// Run `setup` after the world is built, every time the scene is
    /// entered. This is where entities, clips and game systems go.
    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: FnMut(&mut TopdownWorld, &mut SceneContext) -> Result<(), SceneError> + 'static,
    {
        self.setup = Some(Box::new(setup));
        self
    }

    /// Decide after each frame whether to stay, switch or quit.
    pub fn with_transition<F>(mut self, transition: F) -> Self
    where
        F: FnMut(&mut TopdownWorld, &InputState) -> SceneTransition + 'static,
    {
        self.transition = Some(Box::new(transition));
        self
    }

    pub fn world(&self) -> Option<&TopdownWorld> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut TopdownWorld> {
        self.world.as_mut()
    }

    fn load(&self) -> Result<TileMap, SceneError> {
        match &self.source {
            MapSource::File(path) => Ok(load_map(path)?),
            MapSource::Loaded(map) => Ok(map.clone()),
        }
    }
}

impl Scene for TopdownScene {
    fn on_enter(&mut self, ctx: &mut SceneContext) -> Result<(), SceneError> {
        let map = self.load()?;
        let mut world = TopdownWorld::new(map, self.collision_layer, ctx.viewport(), self.zoom)?;
        world.set_debug(self.debug);

        if let Some((rl, thread)) = ctx.raylib() {
            let w = world.world_mut();
            let loaded = w.resource_scope(|w, mut assets: Mut<Assets>| {
                assets.load_tilemap_textures(rl, thread, w.resource::<TileMap>())
            });
            info!("Scene '{}': {} tileset texture(s) loaded", self.name, loaded);
        }

        if let Some(setup) = self.setup.as_mut() {
            setup(&mut world, ctx)?;
        }
        self.world = Some(world);
        Ok(())
    }

    fn on_exit(&mut self) {
        if let Some(world) = self.world.take() {
            self.debug = world.is_debug();
        }
    }

    fn update(&mut self, input: &InputState, dt: f32) -> SceneTransition {
        let Some(world) = self.world.as_mut() else {
            return SceneTransition::Stay;
        };
        world.update(input, dt);
        match self.transition.as_mut() {
            Some(transition) => transition(world, input),
            None => SceneTransition::Stay,
        }
    }

    fn draw(&mut self, d: &mut RaylibDrawHandle) {
        if let Some(world) = self.world.as_mut() {
            render_world(world.world_mut(), d);
            render_debug_ui(world.world(), d);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
