//! Texture, sprite sheet and tile set storage.
//!
//! Textures are owned by the [`Assets`] resource and referenced everywhere
//! else by string key. A [`SpriteSheet`] is a texture cut into equally sized
//! frames; a [`SpriteFrame`] is one drawable cell of it.
//!
//! Loading needs a raylib handle and thread. Everything else here is plain
//! data and works without a window.

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::Resource;
use log::{info, warn};
use raylib::prelude::{RaylibHandle, RaylibThread, Texture2D};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::geom::Rect;
use crate::resources::tilemap::TileMap;

#[derive(Debug, Error, PartialEq)]
pub enum AssetError {
    #[error("failed to load texture {path}: {message}")]
    Texture { path: PathBuf, message: String },
    #[error("frame size must be non-zero (got {frame_w}x{frame_h})")]
    ZeroFrame { frame_w: u32, frame_h: u32 },
    #[error(
        "sprite sheet '{name}' is {tex_w}x{tex_h}, not a multiple of the {frame_w}x{frame_h} frame size"
    )]
    FrameSize {
        name: String,
        tex_w: u32,
        tex_h: u32,
        frame_w: u32,
        frame_h: u32,
    },
    #[error("unknown texture '{0}'")]
    UnknownTexture(String),
    #[error("unknown sprite sheet '{0}'")]
    UnknownSheet(String),
    #[error("frames {start}..{end} out of range for sprite sheet '{name}' ({len} frames)")]
    FrameRange {
        name: String,
        start: usize,
        end: usize,
        len: usize,
    },
}

/// One drawable cell: a texture key and the source rectangle inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrame {
    pub tex_key: String,
    pub src: Rect,
}

/// A texture split into equal frames, numbered row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub name: String,
    pub tex_key: String,
    pub frame_w: u32,
    pub frame_h: u32,
    pub columns: u32,
    pub frames: Vec<Rect>,
}

impl SpriteSheet {
    pub fn split(
        name: impl Into<String>,
        tex_key: impl Into<String>,
        tex_w: u32,
        tex_h: u32,
        frame_w: u32,
        frame_h: u32,
    ) -> Result<Self, AssetError> {
        let name = name.into();
        if frame_w == 0 || frame_h == 0 {
            return Err(AssetError::ZeroFrame { frame_w, frame_h });
        }
        if tex_w % frame_w != 0 || tex_h % frame_h != 0 {
            return Err(AssetError::FrameSize {
                name,
                tex_w,
                tex_h,
                frame_w,
                frame_h,
            });
        }
        let columns = tex_w / frame_w;
        let rows = tex_h / frame_h;
        let mut frames = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for col in 0..columns {
                frames.push(Rect::new(
                    (col * frame_w) as f32,
                    (row * frame_h) as f32,
                    frame_w as f32,
                    frame_h as f32,
                ));
            }
        }
        Ok(Self {
            name,
            tex_key: tex_key.into(),
            frame_w,
            frame_h,
            columns,
            frames,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<SpriteFrame> {
        self.frames.get(index).map(|src| SpriteFrame {
            tex_key: self.tex_key.clone(),
            src: *src,
        })
    }

    /// Frames `start..end` as drawable frames, e.g. one row of a
    /// direction-per-row sheet.
    pub fn frames(&self, start: usize, end: usize) -> Result<Vec<SpriteFrame>, AssetError> {
        if start > end || end > self.frames.len() {
            return Err(AssetError::FrameRange {
                name: self.name.clone(),
                start,
                end,
                len: self.frames.len(),
            });
        }
        Ok(self.frames[start..end]
            .iter()
            .map(|src| SpriteFrame {
                tex_key: self.tex_key.clone(),
                src: *src,
            })
            .collect())
    }

    /// The frames of row `row`.
    pub fn row(&self, row: usize) -> Result<Vec<SpriteFrame>, AssetError> {
        let cols = self.columns as usize;
        self.frames(row * cols, (row + 1) * cols)
    }
}

/// Central store for textures, sprite sheets and tile sets.
#[derive(Resource, Default)]
pub struct Assets {
    textures: FxHashMap<String, Texture2D>,
    sheets: FxHashMap<String, SpriteSheet>,
    tile_sets: FxHashMap<String, SpriteSheet>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an image file as texture `key`. Loading the same key twice keeps
    /// the first texture.
    pub fn load_texture(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        key: &str,
        path: &Path,
    ) -> Result<&Texture2D, AssetError> {
        if !self.textures.contains_key(key) {
            let texture = rl
                .load_texture(thread, &path.to_string_lossy())
                .map_err(|e| AssetError::Texture {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
            info!(
                "Loaded texture '{}' from {} ({}x{})",
                key,
                path.display(),
                texture.width,
                texture.height
            );
            self.textures.insert(key.to_owned(), texture);
        }
        self.texture(key)
    }

    pub fn insert_texture(&mut self, key: impl Into<String>, texture: Texture2D) {
        self.textures.insert(key.into(), texture);
    }

    pub fn texture(&self, key: &str) -> Result<&Texture2D, AssetError> {
        self.textures
            .get(key)
            .ok_or_else(|| AssetError::UnknownTexture(key.to_owned()))
    }

    pub fn has_texture(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    /// Load `path` and split it into `frame_w` x `frame_h` frames stored as
    /// sheet `name`. The texture is stored under the same key.
    pub fn load_sprite_sheet(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        name: &str,
        path: &Path,
        frame_w: u32,
        frame_h: u32,
    ) -> Result<&SpriteSheet, AssetError> {
        let sheet = self.split_loaded(rl, thread, name, path, frame_w, frame_h)?;
        self.insert_sheet(sheet);
        self.sprite_sheet(name)
    }

    /// Like [`Assets::load_sprite_sheet`] but stored as a tile set.
    pub fn load_tile_set(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        name: &str,
        path: &Path,
        tile_w: u32,
        tile_h: u32,
    ) -> Result<&SpriteSheet, AssetError> {
        let sheet = self.split_loaded(rl, thread, name, path, tile_w, tile_h)?;
        self.tile_sets.insert(name.to_owned(), sheet);
        self.tile_set(name)
    }

    fn split_loaded(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        name: &str,
        path: &Path,
        frame_w: u32,
        frame_h: u32,
    ) -> Result<SpriteSheet, AssetError> {
        let texture = self.load_texture(rl, thread, name, path)?;
        let (w, h) = (texture.width.max(0) as u32, texture.height.max(0) as u32);
        SpriteSheet::split(name, name, w, h, frame_w, frame_h)
    }

    pub fn insert_sheet(&mut self, sheet: SpriteSheet) {
        self.sheets.insert(sheet.name.clone(), sheet);
    }

    pub fn sprite_sheet(&self, name: &str) -> Result<&SpriteSheet, AssetError> {
        self.sheets
            .get(name)
            .ok_or_else(|| AssetError::UnknownSheet(name.to_owned()))
    }

    pub fn tile_set(&self, name: &str) -> Option<&SpriteSheet> {
        self.tile_sets.get(name)
    }

    /// Load the image of every tileset used by `map`.
    ///
    /// A tileset whose image cannot be loaded is skipped with a warning; the
    /// renderer draws its tiles as solid rectangles. Returns how many
    /// textures are available afterwards.
    pub fn load_tilemap_textures(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        map: &TileMap,
    ) -> usize {
        let mut loaded = 0;
        for ts in map.tilesets() {
            match self.load_texture(rl, thread, &ts.image_key, &ts.image_path) {
                Ok(_) => loaded += 1,
                Err(e) => warn!("Tileset '{}' will be drawn as debug tiles: {}", ts.name, e),
            }
        }
        loaded
    }
}
