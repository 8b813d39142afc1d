//! Window and main loop.
//!
//! [`Game`] opens the raylib window described by a [`GameConfig`], then each
//! frame polls the keyboard, feeds the frame time and input to the
//! [`SceneManager`] and draws the current scene. The loop ends when the
//! window is closed or the scene manager has no scene left.

use log::info;
use raylib::prelude::*;
use thiserror::Error;

use crate::geom::Size;
use crate::resources::gameconfig::{ConfigError, GameConfig};
use crate::resources::input::InputState;
use crate::scene::{Scene, SceneContext, SceneError, SceneManager};
use crate::systems::input::poll_keyboard;

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub struct Game {
    config: GameConfig,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Open the window and run `first_scene` until the game ends.
    pub fn run(self, first_scene: Box<dyn Scene>) -> Result<(), GameError> {
        let config = self.config;
        let mut builder = raylib::init();
        builder
            .size(config.window_width as i32, config.window_height as i32)
            .title(&config.title);
        if config.vsync {
            builder.vsync();
        }
        let (mut rl, thread) = builder.build();
        rl.set_target_fps(config.target_fps);
        // Escape belongs to the scenes
        rl.set_exit_key(None);
        info!(
            "Window {}x{} '{}' at {} fps",
            config.window_width, config.window_height, config.title, config.target_fps
        );

        let mut input = InputState::default();
        let mut manager = {
            let viewport = viewport_of(&rl);
            let mut ctx = SceneContext::new(&mut rl, &thread, viewport);
            SceneManager::new(first_scene, &mut ctx)?
        };

        while !rl.window_should_close() && !manager.is_finished() {
            poll_keyboard(&rl, &mut input);
            let dt = rl.get_frame_time();
            {
                let viewport = viewport_of(&rl);
                let mut ctx = SceneContext::new(&mut rl, &thread, viewport);
                manager.update(&input, dt, &mut ctx)?;
            }

            let mut d = rl.begin_drawing(&thread);
            d.clear_background(Color::BLACK);
            manager.draw(&mut d);
        }
        info!("Game loop finished");
        Ok(())
    }
}

fn viewport_of(rl: &RaylibHandle) -> Size {
    Size::new(
        rl.get_screen_width().max(0) as u32,
        rl.get_screen_height().max(0) as u32,
    )
}
