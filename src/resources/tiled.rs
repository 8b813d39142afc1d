//! Loaders for maps made in the Tiled editor.
//!
//! Supports the XML (`.tmx` / `.tsx`) and JSON (`.tmj` / `.tsj`) flavours of
//! orthogonal, finite maps with CSV or plain-array layer data. Tilesets may be
//! embedded in the map or referenced as external files; every path is
//! resolved relative to the file that references it.
//!
//! The `parse_*` functions take the document text plus a `read` callback used
//! to fetch external tilesets, so they can run without touching the disk.
//! [`load_map`] wires them to the filesystem.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::geom::Size;
use crate::resources::tilemap::{TileLayer, TileMap, TileMapError, TilesetInfo};

#[derive(Debug, Error)]
pub enum TiledError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::de::DeError),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported map format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("unsupported layer encoding '{0}' (save the map with CSV layer format)")]
    UnsupportedEncoding(String),
    #[error("unsupported orientation '{0}' (only orthogonal maps are supported)")]
    UnsupportedOrientation(String),
    #[error("infinite maps are not supported")]
    InfiniteMap,
    #[error("layer '{layer}' contains an invalid tile id '{token}'")]
    BadTileId { layer: String, token: String },
    #[error("tileset '{0}' has no image")]
    TilesetMissingImage(String),
    #[error("tileset '{0}' is missing its tile size")]
    TilesetIncomplete(String),
    #[error(transparent)]
    Map(#[from] TileMapError),
}

/// Load a Tiled map from disk, choosing the parser by file extension.
pub fn load_map(path: impl AsRef<Path>) -> Result<TileMap, TiledError> {
    let path = path.as_ref();
    let text = read_file(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let map = match ext.as_deref() {
        Some("tmx") => parse_tmx(&text, base_dir, read_file)?,
        Some("tmj") | Some("json") => parse_tmj(&text, base_dir, read_file)?,
        _ => return Err(TiledError::UnsupportedFormat(path.to_path_buf())),
    };
    info!(
        "Loaded map {} ({}x{} tiles, {} layers, {} tilesets)",
        path.display(),
        map.map_size().w,
        map.map_size().h,
        map.num_layers(),
        map.tilesets().len()
    );
    Ok(map)
}

fn read_file(path: &Path) -> Result<String, TiledError> {
    std::fs::read_to_string(path).map_err(|source| TiledError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Tileset fields shared by every format, before path resolution.
#[derive(Debug, Default)]
struct RawTileset {
    name: String,
    tile_w: Option<u32>,
    tile_h: Option<u32>,
    tile_count: u32,
    columns: u32,
    margin: u32,
    spacing: u32,
    image: Option<String>,
    image_w: u32,
}

impl RawTileset {
    fn into_info(self, first_gid: u32, base_dir: &Path) -> Result<TilesetInfo, TiledError> {
        let (Some(tile_w), Some(tile_h)) = (self.tile_w, self.tile_h) else {
            return Err(TiledError::TilesetIncomplete(self.name));
        };
        let Some(image) = self.image else {
            return Err(TiledError::TilesetMissingImage(self.name));
        };
        let image_path = base_dir.join(&image);
        let image_key = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(image);
        let columns = if self.columns > 0 {
            self.columns
        } else {
            let usable = self.image_w.saturating_sub(2 * self.margin) + self.spacing;
            (usable / (tile_w + self.spacing)).max(1)
        };
        debug!(
            "Tileset '{}' firstgid={} image={} {}x{} cols={}",
            self.name,
            first_gid,
            image_path.display(),
            tile_w,
            tile_h,
            columns
        );
        Ok(TilesetInfo {
            first_gid,
            name: self.name,
            image_key,
            image_path,
            tile_w,
            tile_h,
            columns,
            tile_count: self.tile_count,
            margin: self.margin,
            spacing: self.spacing,
        })
    }
}

fn check_orientation(orientation: Option<&str>) -> Result<(), TiledError> {
    match orientation {
        None | Some("orthogonal") => Ok(()),
        Some(other) => Err(TiledError::UnsupportedOrientation(other.to_string())),
    }
}

fn dir_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// TMX / TSX
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmxMap {
    #[serde(rename = "@orientation", default)]
    orientation: Option<String>,
    #[serde(rename = "@width")]
    width: u32,
    #[serde(rename = "@height")]
    height: u32,
    #[serde(rename = "@tilewidth")]
    tile_width: u32,
    #[serde(rename = "@tileheight")]
    tile_height: u32,
    #[serde(rename = "@infinite", default)]
    infinite: Option<u8>,
    #[serde(rename = "tileset", default)]
    tilesets: Vec<TmxTileset>,
    #[serde(rename = "layer", default)]
    layers: Vec<TmxLayer>,
}

/// Either a `<tileset firstgid source>` reference, an embedded tileset or the
/// root of a `.tsx` file.
#[derive(Debug, Deserialize)]
struct TmxTileset {
    #[serde(rename = "@firstgid", default)]
    first_gid: Option<u32>,
    #[serde(rename = "@source", default)]
    source: Option<String>,
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@tilewidth", default)]
    tile_width: Option<u32>,
    #[serde(rename = "@tileheight", default)]
    tile_height: Option<u32>,
    #[serde(rename = "@tilecount", default)]
    tile_count: u32,
    #[serde(rename = "@columns", default)]
    columns: u32,
    #[serde(rename = "@margin", default)]
    margin: u32,
    #[serde(rename = "@spacing", default)]
    spacing: u32,
    #[serde(default)]
    image: Option<TmxImage>,
}

#[derive(Debug, Deserialize)]
struct TmxImage {
    #[serde(rename = "@source")]
    source: String,
    #[serde(rename = "@width", default)]
    width: u32,
}

#[derive(Debug, Deserialize)]
struct TmxLayer {
    #[serde(rename = "@name", default)]
    name: String,
    data: TmxData,
}

#[derive(Debug, Deserialize)]
struct TmxData {
    #[serde(rename = "@encoding", default)]
    encoding: Option<String>,
    #[serde(rename = "@compression", default)]
    compression: Option<String>,
    #[serde(rename = "$text", default)]
    text: String,
}

impl From<TmxTileset> for RawTileset {
    fn from(ts: TmxTileset) -> Self {
        RawTileset {
            name: ts.name,
            tile_w: ts.tile_width,
            tile_h: ts.tile_height,
            tile_count: ts.tile_count,
            columns: ts.columns,
            margin: ts.margin,
            spacing: ts.spacing,
            image_w: ts.image.as_ref().map(|i| i.width).unwrap_or(0),
            image: ts.image.map(|i| i.source),
        }
    }
}

/// Parse a `.tmx` document. `read` fetches external `.tsx` files, with paths
/// already joined onto `base_dir`.
pub fn parse_tmx<R>(xml: &str, base_dir: &Path, mut read: R) -> Result<TileMap, TiledError>
where
    R: FnMut(&Path) -> Result<String, TiledError>,
{
    let map: TmxMap = quick_xml::de::from_str(xml)?;
    check_orientation(map.orientation.as_deref())?;
    if map.infinite.unwrap_or(0) != 0 {
        return Err(TiledError::InfiniteMap);
    }

    let mut tilesets = Vec::with_capacity(map.tilesets.len());
    for ts in map.tilesets {
        let first_gid = ts.first_gid.unwrap_or(1);
        let info = match ts.source.as_deref() {
            Some(source) => {
                let tsx_path = base_dir.join(source);
                let text = read(&tsx_path)?;
                let external: TmxTileset = quick_xml::de::from_str(&text)?;
                RawTileset::from(external).into_info(first_gid, &dir_of(&tsx_path))?
            }
            None => RawTileset::from(ts).into_info(first_gid, base_dir)?,
        };
        tilesets.push(info);
    }

    let mut layers = Vec::with_capacity(map.layers.len());
    for layer in map.layers {
        if let Some(compression) = layer.data.compression {
            return Err(TiledError::UnsupportedEncoding(compression));
        }
        match layer.data.encoding.as_deref() {
            Some("csv") => {}
            other => {
                return Err(TiledError::UnsupportedEncoding(
                    other.unwrap_or("xml").to_string(),
                ));
            }
        }
        let data = parse_csv(&layer.name, &layer.data.text)?;
        layers.push(TileLayer {
            name: layer.name,
            data,
        });
    }

    Ok(TileMap::new(
        map.tile_width,
        map.tile_height,
        Size::new(map.width, map.height),
        layers,
        tilesets,
    )?)
}

fn parse_csv(layer: &str, text: &str) -> Result<Vec<u32>, TiledError> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<u32>().map_err(|_| TiledError::BadTileId {
                layer: layer.to_string(),
                token: t.to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// TMJ / TSJ
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmjMap {
    #[serde(default)]
    orientation: Option<String>,
    width: u32,
    height: u32,
    #[serde(rename = "tilewidth")]
    tile_width: u32,
    #[serde(rename = "tileheight")]
    tile_height: u32,
    #[serde(default)]
    infinite: bool,
    #[serde(default)]
    layers: Vec<TmjLayer>,
    #[serde(default)]
    tilesets: Vec<TmjTileset>,
}

#[derive(Debug, Deserialize)]
struct TmjLayer {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    data: Option<TmjData>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TmjData {
    Array(Vec<u32>),
    Encoded(String),
}

#[derive(Debug, Deserialize)]
struct TmjTileset {
    #[serde(rename = "firstgid", default)]
    first_gid: Option<u32>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(rename = "tilewidth", default)]
    tile_width: Option<u32>,
    #[serde(rename = "tileheight", default)]
    tile_height: Option<u32>,
    #[serde(rename = "tilecount", default)]
    tile_count: u32,
    #[serde(default)]
    columns: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    image: Option<String>,
    #[serde(rename = "imagewidth", default)]
    image_width: u32,
}

impl From<TmjTileset> for RawTileset {
    fn from(ts: TmjTileset) -> Self {
        RawTileset {
            name: ts.name,
            tile_w: ts.tile_width,
            tile_h: ts.tile_height,
            tile_count: ts.tile_count,
            columns: ts.columns,
            margin: ts.margin,
            spacing: ts.spacing,
            image: ts.image,
            image_w: ts.image_width,
        }
    }
}

/// Parse a `.tmj` document. `read` fetches external `.tsj` files.
pub fn parse_tmj<R>(json: &str, base_dir: &Path, mut read: R) -> Result<TileMap, TiledError>
where
    R: FnMut(&Path) -> Result<String, TiledError>,
{
    let map: TmjMap = serde_json::from_str(json)?;
    check_orientation(map.orientation.as_deref())?;
    if map.infinite {
        return Err(TiledError::InfiniteMap);
    }

    let mut tilesets = Vec::with_capacity(map.tilesets.len());
    for ts in map.tilesets {
        let first_gid = ts.first_gid.unwrap_or(1);
        let info = match ts.source.as_deref() {
            Some(source) => {
                let tsj_path = base_dir.join(source);
                let text = read(&tsj_path)?;
                let external: TmjTileset = serde_json::from_str(&text)?;
                RawTileset::from(external).into_info(first_gid, &dir_of(&tsj_path))?
            }
            None => RawTileset::from(ts).into_info(first_gid, base_dir)?,
        };
        tilesets.push(info);
    }

    let mut layers = Vec::new();
    for layer in map.layers {
        if layer.kind != "tilelayer" {
            debug!("Skipping {} layer '{}'", layer.kind, layer.name);
            continue;
        }
        let data = match layer.data {
            Some(TmjData::Array(data)) => data,
            Some(TmjData::Encoded(_)) => {
                return Err(TiledError::UnsupportedEncoding(
                    layer.encoding.unwrap_or_else(|| "base64".to_string()),
                ));
            }
            None => Vec::new(),
        };
        layers.push(TileLayer {
            name: layer.name,
            data,
        });
    }

    Ok(TileMap::new(
        map.tile_width,
        map.tile_height,
        Size::new(map.width, map.height),
        layers,
        tilesets,
    )?)
}
