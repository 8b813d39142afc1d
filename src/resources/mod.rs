//! ECS resources made available to systems.
//!
//! Long-lived data inserted into a scene's world: the level, the camera,
//! timing, input and the asset stores.
//!
//! Overview
//! - `animationlibrary` – animation clips shared by all entities
//! - `assets` – textures, sprite sheets and tile sets keyed by name
//! - `camera` – world camera with zoom and bounds clamping
//! - `debugmode` – presence toggles debug overlays
//! - `gameconfig` – window, camera and map settings from `config.ini`
//! - `input` – per-frame keyboard state of keys relevant to the game
//! - `screensize` – window dimensions in pixels
//! - `tiled` – Tiled `.tmx`/`.tmj` map loaders
//! - `tilemap` – tile layers and tile-grid collision queries
//! - `worldtime` – simulation time and delta
pub mod animationlibrary;
pub mod assets;
pub mod camera;
pub mod debugmode;
pub mod gameconfig;
pub mod input;
pub mod screensize;
pub mod tiled;
pub mod tilemap;
pub mod worldtime;
