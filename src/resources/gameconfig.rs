//! Game configuration.
//!
//! Settings come from an INI file; anything missing keeps its default.
//!
//! ```ini
//! [window]
//! width = 960
//! height = 640
//! title = rayx
//! target_fps = 60
//! vsync = true
//!
//! [camera]
//! zoom = 2.0
//!
//! [map]
//! path = assets/level.tmx
//! collision_layer = 1
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use thiserror::Error;

const DEFAULT_WINDOW_WIDTH: u32 = 960;
const DEFAULT_WINDOW_HEIGHT: u32 = 640;
const DEFAULT_TITLE: &str = "rayx";
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_ZOOM: f32 = 2.0;
const DEFAULT_COLLISION_LAYER: usize = 1;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config {path}: {message}")]
    Load { path: PathBuf, message: String },
    #[error("failed to save config {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub title: String,
    pub target_fps: u32,
    pub vsync: bool,
    pub camera_zoom: f32,
    /// Tiled map opened by the demo scene.
    pub map_path: Option<PathBuf>,
    pub collision_layer: usize,
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            camera_zoom: DEFAULT_ZOOM,
            map_path: None,
            collision_layer: DEFAULT_COLLISION_LAYER,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load values from `config_path`.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|message| ConfigError::Load {
                path: self.config_path.clone(),
                message,
            })?;
        self.apply(&ini);
        info!(
            "Loaded config {}: {}x{} '{}', fps={}, vsync={}, zoom={}",
            self.config_path.display(),
            self.window_width,
            self.window_height,
            self.title,
            self.target_fps,
            self.vsync,
            self.camera_zoom
        );
        Ok(())
    }

    /// Load values from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|message| ConfigError::Load {
                path: self.config_path.clone(),
                message,
            })?;
        self.apply(&ini);
        Ok(())
    }

    fn apply(&mut self, ini: &Ini) {
        // [window]
        if let Some(width) = ini.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = ini.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(title) = ini.get("window", "title") {
            self.title = title;
        }
        if let Some(fps) = ini.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = ini.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }

        // [camera]
        if let Some(zoom) = ini.getfloat("camera", "zoom").ok().flatten() {
            if zoom > 0.0 {
                self.camera_zoom = zoom as f32;
            }
        }

        // [map]
        if let Some(path) = ini.get("map", "path") {
            self.map_path = Some(PathBuf::from(path));
        }
        if let Some(layer) = ini.getuint("map", "collision_layer").ok().flatten() {
            self.collision_layer = layer as usize;
        }
    }

    /// Write the current values to `config_path`.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();

        ini.set("window", "width", Some(self.window_width.to_string()));
        ini.set("window", "height", Some(self.window_height.to_string()));
        ini.set("window", "title", Some(self.title.clone()));
        ini.set("window", "target_fps", Some(self.target_fps.to_string()));
        ini.set("window", "vsync", Some(self.vsync.to_string()));
        ini.set("camera", "zoom", Some(self.camera_zoom.to_string()));
        if let Some(path) = &self.map_path {
            ini.set("map", "path", Some(path.to_string_lossy().into_owned()));
        }
        ini.set(
            "map",
            "collision_layer",
            Some(self.collision_layer.to_string()),
        );

        ini.write(&self.config_path)
            .map_err(|source| ConfigError::Save {
                path: self.config_path.clone(),
                source,
            })?;
        info!("Saved config to {}", self.config_path.display());
        Ok(())
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = GameConfig::new();
        assert_eq!(c.window_size(), (960, 640));
        assert_eq!(c.collision_layer, 1);
        assert!(c.map_path.is_none());
    }

    #[test]
    fn test_partial_ini_keeps_defaults() {
        let mut c = GameConfig::new();
        c.load_from_str(
            "[window]\nwidth = 800\ntitle = Dungeon\n\n[camera]\nzoom = 3\n\n[map]\npath = levels/a.tmx\n",
        )
        .unwrap();
        assert_eq!(c.window_width, 800);
        assert_eq!(c.window_height, 640);
        assert_eq!(c.title, "Dungeon");
        assert_eq!(c.camera_zoom, 3.0);
        assert_eq!(c.map_path, Some(PathBuf::from("levels/a.tmx")));
        assert!(c.vsync);
    }

    #[test]
    fn test_bad_zoom_ignored() {
        let mut c = GameConfig::new();
        c.load_from_str("[camera]\nzoom = -1\n").unwrap();
        assert_eq!(c.camera_zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn test_missing_file_is_error() {
        let mut c = GameConfig::with_path("does/not/exist.ini");
        assert!(matches!(c.load_from_file(), Err(ConfigError::Load { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("rayx_config_{}.ini", std::process::id()));
        let mut c = GameConfig::with_path(&path);
        c.window_width = 1024;
        c.map_path = Some(PathBuf::from("maps/x.tmj"));
        c.collision_layer = 2;
        c.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.window_width, 1024);
        assert_eq!(loaded.map_path, Some(PathBuf::from("maps/x.tmj")));
        assert_eq!(loaded.collision_layer, 2);
    }
}
