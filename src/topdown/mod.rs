//! Top-down game building blocks.
//!
//! [`TopdownWorld`] is a world with the standard resources and schedule,
//! [`TopdownScene`] runs one from a Tiled map, and the helpers set up the
//! usual walking characters and pursuing enemies.

pub mod chase;
pub mod helpers;
pub mod scene;
pub mod world;

pub use chase::{chase, has_line_of_sight};
pub use helpers::{
    character_state_machine, default_character_machine, setup_animations,
    spawn_moving_character,
};
pub use scene::TopdownScene;
pub use world::TopdownWorld;
