//! rayx library.
//!
//! A small top-down 2D layer over raylib and `bevy_ecs`: Tiled maps with a
//! collision layer, axis-separated movement, signal-driven animation state
//! machines, a following camera and a scene manager. Components, resources
//! and systems are public so games and integration tests can build their own
//! schedules.

pub mod components;
pub mod game;
pub mod geom;
pub mod resources;
pub mod scene;
pub mod systems;
pub mod topdown;
