//! Engine systems.
//!
//! Submodules overview
//! - [`animation`] – pick clips through the state machine and advance frames
//! - [`camera`] – keep the camera centred on its target
//! - [`input`] – read raylib keyboard state into [`crate::resources::input::InputState`]
//! - [`inputdirection`] – steer keyboard-controlled entities
//! - [`lifecycle`] – despawn entities marked dead
//! - [`movement`] – move entities with axis-separated tile collision
//! - [`render`] – draw tiles, sprites and debug overlays using raylib
//! - [`time`] – advance the world clock

pub mod animation;
pub mod camera;
pub mod input;
pub mod inputdirection;
pub mod lifecycle;
pub mod movement;
pub mod render;
pub mod time;
