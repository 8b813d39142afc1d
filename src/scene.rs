//! Scenes and scene switching.
//!
//! A [`Scene`] is a level or a screen (title, menu, game over) with its own
//! state. The [`SceneManager`] owns the active scene, runs it every frame
//! and applies the [`SceneTransition`] it returns: the old scene is exited
//! before the new one is entered, and only a successfully entered scene
//! becomes current.

use log::info;
use raylib::prelude::{RaylibDrawHandle, RaylibHandle, RaylibThread};
use thiserror::Error;

use crate::geom::Size;
use crate::resources::assets::AssetError;
use crate::resources::input::InputState;
use crate::resources::tiled::TiledError;
use crate::resources::tilemap::TileMapError;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Tiled(#[from] TiledError),
    #[error(transparent)]
    TileMap(#[from] TileMapError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("scene setup failed: {0}")]
    Setup(String),
}

/// What the manager should do after a scene's update.
pub enum SceneTransition {
    Stay,
    Switch(Box<dyn Scene>),
    Quit,
}

impl std::fmt::Debug for SceneTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneTransition::Stay => write!(f, "Stay"),
            SceneTransition::Switch(next) => write!(f, "Switch({})", next.name()),
            SceneTransition::Quit => write!(f, "Quit"),
        }
    }
}

/// What a scene can use while it is being entered.
///
/// Holds the viewport size and, when a window exists, the raylib handle and
/// thread needed to load textures. [`SceneContext::headless`] builds one
/// without a window for tests and tools.
pub struct SceneContext<'a> {
    viewport: Size,
    raylib: Option<(&'a mut RaylibHandle, &'a RaylibThread)>,
}

impl<'a> SceneContext<'a> {
    pub fn new(rl: &'a mut RaylibHandle, thread: &'a RaylibThread, viewport: Size) -> Self {
        Self {
            viewport,
            raylib: Some((rl, thread)),
        }
    }

    pub fn headless(viewport: Size) -> Self {
        Self {
            viewport,
            raylib: None,
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn is_headless(&self) -> bool {
        self.raylib.is_none()
    }

    /// The raylib handle and thread, `None` when headless.
    pub fn raylib(&mut self) -> Option<(&mut RaylibHandle, &RaylibThread)> {
        self.raylib.as_mut().map(|(rl, thread)| (&mut **rl, *thread))
    }
}

pub trait Scene {
    /// Called once before the scene's first update. An error aborts the
    /// switch to this scene.
    fn on_enter(&mut self, ctx: &mut SceneContext) -> Result<(), SceneError>;

    /// Called once when the scene is replaced or the game quits.
    fn on_exit(&mut self) {}

    fn update(&mut self, input: &InputState, dt: f32) -> SceneTransition;

    fn draw(&mut self, d: &mut RaylibDrawHandle);

    /// Name used in logs.
    fn name(&self) -> &str {
        "scene"
    }
}

pub struct SceneManager {
    current: Option<Box<dyn Scene>>,
}

impl SceneManager {
    /// Enter `first` and make it current.
    pub fn new(mut first: Box<dyn Scene>, ctx: &mut SceneContext) -> Result<Self, SceneError> {
        first.on_enter(ctx)?;
        info!("Entered scene '{}'", first.name());
        Ok(Self {
            current: Some(first),
        })
    }

    /// Run the current scene for one frame and apply its transition.
    ///
    /// If the next scene fails to enter, the manager is left without a scene
    /// and the error is returned.
    pub fn update(
        &mut self,
        input: &InputState,
        dt: f32,
        ctx: &mut SceneContext,
    ) -> Result<(), SceneError> {
        let Some(scene) = self.current.as_mut() else {
            return Ok(());
        };
        match scene.update(input, dt) {
            SceneTransition::Stay => {}
            SceneTransition::Switch(mut next) => {
                info!("Switching scene '{}' -> '{}'", scene.name(), next.name());
                scene.on_exit();
                self.current = None;
                next.on_enter(ctx)?;
                self.current = Some(next);
            }
            SceneTransition::Quit => {
                info!("Scene '{}' requested quit", scene.name());
                scene.on_exit();
                self.current = None;
            }
        }
        Ok(())
    }

    pub fn draw(&mut self, d: &mut RaylibDrawHandle) {
        if let Some(scene) = self.current.as_mut() {
            scene.draw(d);
        }
    }

    /// True once the game quit or a scene failed to enter.
    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref().map(|s| s.name())
    }
}
