//! Tile map resource and tile-grid collision queries.
//!
//! A [`TileMap`] stores each layer as a flat, row-major array of global tile
//! ids (Tiled "gids"), with `0` meaning "no tile". Any non-zero cell in the
//! collision layer is solid. Maps are usually built by the loaders in
//! [`crate::resources::tiled`].

use std::path::PathBuf;

use bevy_ecs::prelude::Resource;
use raylib::prelude::Vector2;
use thiserror::Error;

use crate::geom::{Rect, Size, Vec2I};

/// Tiled stores flip/rotation flags in the top four bits of a gid.
pub const GID_MASK: u32 = 0x0FFF_FFFF;

#[derive(Debug, Error, PartialEq)]
pub enum TileMapError {
    #[error("invalid layer index {index} (map has {count} layers)")]
    InvalidLayer { index: usize, count: usize },
    #[error("layer '{name}' has {actual} cells, expected {expected}")]
    LayerSize {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("tile size must be non-zero (got {w}x{h})")]
    ZeroTileSize { w: u32, h: u32 },
}

/// Metadata for one tileset referenced by the map.
#[derive(Debug, Clone, PartialEq)]
pub struct TilesetInfo {
    /// First global id covered by this tileset.
    pub first_gid: u32,
    pub name: String,
    /// Key of the tileset texture in [`crate::resources::assets::Assets`].
    pub image_key: String,
    /// Image path resolved relative to the map file.
    pub image_path: PathBuf,
    pub tile_w: u32,
    pub tile_h: u32,
    pub columns: u32,
    pub tile_count: u32,
    pub margin: u32,
    pub spacing: u32,
}

impl TilesetInfo {
    /// Source rectangle of a tileset-local tile id inside the tileset image.
    pub fn source_rect(&self, local_id: u32) -> Rect {
        let columns = self.columns.max(1);
        let col = local_id % columns;
        let row = local_id / columns;
        Rect::new(
            (self.margin + col * (self.tile_w + self.spacing)) as f32,
            (self.margin + row * (self.tile_h + self.spacing)) as f32,
            self.tile_w as f32,
            self.tile_h as f32,
        )
    }
}

/// A named layer of gids, `map_width * map_height` long.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub name: String,
    pub data: Vec<u32>,
}

/// Inclusive-min, exclusive-max range of tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub min: Vec2I,
    pub max: Vec2I,
}

/// A whole level: tile grid, layers and tileset metadata.
#[derive(Resource, Debug, Clone)]
pub struct TileMap {
    tile_w: u32,
    tile_h: u32,
    map_size: Size,
    layers: Vec<TileLayer>,
    tilesets: Vec<TilesetInfo>,
}

impl TileMap {
    /// Build a map, checking that every layer covers the whole grid.
    pub fn new(
        tile_w: u32,
        tile_h: u32,
        map_size: Size,
        layers: Vec<TileLayer>,
        mut tilesets: Vec<TilesetInfo>,
    ) -> Result<Self, TileMapError> {
        if tile_w == 0 || tile_h == 0 {
            return Err(TileMapError::ZeroTileSize {
                w: tile_w,
                h: tile_h,
            });
        }
        let expected = map_size.w as usize * map_size.h as usize;
        for layer in &layers {
            if layer.data.len() != expected {
                return Err(TileMapError::LayerSize {
                    name: layer.name.clone(),
                    expected,
                    actual: layer.data.len(),
                });
            }
        }
        tilesets.sort_by_key(|ts| ts.first_gid);
        Ok(Self {
            tile_w,
            tile_h,
            map_size,
            layers,
            tilesets,
        })
    }

    pub fn tile_w(&self) -> u32 {
        self.tile_w
    }
    pub fn tile_h(&self) -> u32 {
        self.tile_h
    }
    /// Map size in tiles.
    pub fn map_size(&self) -> Size {
        self.map_size
    }
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }
    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }
    pub fn tilesets(&self) -> &[TilesetInfo] {
        &self.tilesets
    }

    /// Map size in pixels.
    pub fn world_size(&self) -> Size {
        Size::new(
            self.map_size.w * self.tile_w,
            self.map_size.h * self.tile_h,
        )
    }

    /// World bounds as a rectangle anchored at the origin.
    pub fn world_rect(&self) -> Rect {
        let size = self.world_size();
        Rect::new(0.0, 0.0, size.w as f32, size.h as f32)
    }

    pub fn layer(&self, index: usize) -> Result<&TileLayer, TileMapError> {
        self.layers.get(index).ok_or(TileMapError::InvalidLayer {
            index,
            count: self.layers.len(),
        })
    }

    /// Index of the first layer with the given name.
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    /// Gid at a tile coordinate, `None` outside the map.
    pub fn tile_at(&self, layer: usize, tx: i32, ty: i32) -> Result<Option<u32>, TileMapError> {
        let data = &self.layer(layer)?.data;
        if tx < 0 || ty < 0 || tx >= self.map_size.w as i32 || ty >= self.map_size.h as i32 {
            return Ok(None);
        }
        Ok(Some(data[ty as usize * self.map_size.w as usize + tx as usize]))
    }

    /// True if `rect` overlaps any non-zero tile of `layer`.
    ///
    /// A rectangle entirely outside the map collides with the world bounds.
    /// Edges that only touch a tile do not count as overlapping.
    pub fn overlaps_tiles(&self, rect: Rect, layer: usize) -> Result<bool, TileMapError> {
        let data = &self.layer(layer)?.data;

        let (tx0, tx1) = tile_span(rect.x, rect.w, self.tile_w as f32);
        let (ty0, ty1) = tile_span(rect.y, rect.h, self.tile_h as f32);

        let map_w = self.map_size.w as i64;
        let map_h = self.map_size.h as i64;

        // outside = collide with world bounds
        if tx1 <= 0 || ty1 <= 0 || tx0 >= map_w || ty0 >= map_h {
            return Ok(true);
        }

        let tx0 = tx0.max(0) as usize;
        let ty0 = ty0.max(0) as usize;
        let tx1 = tx1.min(map_w) as usize;
        let ty1 = ty1.min(map_h) as usize;

        let row_w = self.map_size.w as usize;
        for ty in ty0..ty1 {
            let base = ty * row_w;
            if data[base + tx0..base + tx1].iter().any(|&gid| gid != 0) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Tile coordinate containing a world position.
    pub fn world_to_tile(&self, pos: Vector2) -> Vec2I {
        Vec2I::new(
            (pos.x / self.tile_w as f32).floor() as i32,
            (pos.y / self.tile_h as f32).floor() as i32,
        )
    }

    /// Call `f(tx, ty, gid)` for every non-empty tile of `layer` inside
    /// `area`, clamped to the map.
    pub fn for_each_in<F>(&self, area: TileRange, layer: usize, mut f: F) -> Result<(), TileMapError>
    where
        F: FnMut(i32, i32, u32),
    {
        let data = &self.layer(layer)?.data;
        let min_x = area.min.x.max(0);
        let min_y = area.min.y.max(0);
        let max_x = area.max.x.min(self.map_size.w as i32);
        let max_y = area.max.y.min(self.map_size.h as i32);

        let w = self.map_size.w as usize;
        for ty in min_y..max_y {
            let row = ty as usize * w;
            for tx in min_x..max_x {
                let gid = data[row + tx as usize];
                if gid == 0 {
                    continue;
                }
                f(tx, ty, gid);
            }
        }
        Ok(())
    }

    /// Find the tileset owning `gid` and the tileset-local id.
    ///
    /// Flip flags are ignored. Returns `None` for empty cells, gids below
    /// every tileset or past the end of the owning tileset.
    pub fn resolve_gid(&self, gid: u32) -> Option<(&TilesetInfo, u32)> {
        let gid = gid & GID_MASK;
        if gid == 0 {
            return None;
        }
        let tileset = self.tilesets.iter().rev().find(|ts| gid >= ts.first_gid)?;
        let local = gid - tileset.first_gid;
        if tileset.tile_count > 0 && local >= tileset.tile_count {
            return None;
        }
        Some((tileset, local))
    }
}

/// Half-open range of tile indices covered by `[start, start + len)`.
/// Zero-length spans still cover the tile under `start`.
fn tile_span(start: f32, len: f32, tile: f32) -> (i64, i64) {
    let t0 = (start / tile).floor() as i64;
    let t1 = ((start + len) / tile).ceil() as i64;
    (t0, t1.max(t0 + 1))
}

/// Which tile layer the movement system collides against.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionLayer(pub usize);

impl CollisionLayer {
    /// Validate `index` against `map` before it is used every frame.
    pub fn checked(map: &TileMap, index: usize) -> Result<Self, TileMapError> {
        map.layer(index)?;
        Ok(Self(index))
    }
}
