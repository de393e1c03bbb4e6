use serde::Deserialize;
use std::collections::BTreeMap;

use crate::codec::Codec;
use crate::error::ConfigError;
use crate::processor::layout::Layout;

// numeric constants shared by the allocator and the serializer
pub const DEFAULT_BASE_CELL: u32 = 8;

/// Byte written for cells without a tile.
pub const EMPTY_CODE: u8 = 0;

/// Largest layout any export handles, in cells.
pub const MAX_LAYOUT_CELLS: usize = 65536;

/// Entire project snapshot as it comes out of the JSON loader.
///
/// Only the parts the exporter needs are kept; pixel data, palettes and
/// the other editor state are dropped by the loader.
#[derive(Debug, Clone)]
pub struct Project {
    pub base_cell_size: u32,
    pub mode: Option<LayoutMode>,
    pub tiles: Vec<Tile>,
    pub tile_banks: Vec<TileBank>,
    pub screens: Vec<ScreenMap>,
}

impl Project {
    pub fn tile(&self, id: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    /// Finds a screen by name first, then by id.
    pub fn screen(&self, key: &str) -> Option<&ScreenMap> {
        self.screens
            .iter()
            .find(|s| s.name == key)
            .or_else(|| self.screens.iter().find(|s| s.id == key))
    }
}

/// How tile identifiers become byte codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Codes come from the tile banks (character-set screen modes).
    Banked,
    /// Codes are direct indices of the tile assets.
    Unbanked,
}

/// ─────────────────────────────────────────────────────
/// Tile catalog
/// ─────────────────────────────────────────────────────
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Tile {
    /// Footprint in base cells, rounded up.
    pub fn cells(&self, base: u32) -> (usize, usize) {
        (
            self.width.div_ceil(base) as usize,
            self.height.div_ceil(base) as usize,
        )
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { &self.id } else { &self.name }
    }
}

/// ─────────────────────────────────────────────────────
/// Tile banks
/// ─────────────────────────────────────────────────────
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileBank {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub charset_range_start: u8,
    pub charset_range_end: u8,
    #[serde(default)]
    pub screen_zone: Zone,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Tile id -> first code of the tile's block.
    #[serde(default)]
    pub assigned_tiles: BTreeMap<String, TileAssignment>,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileAssignment {
    pub char_code: u8,
}

/// Rectangle in grid cells, used both for bank zones and active areas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Zone {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Zone {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && y >= self.y && x - self.x < self.width && y - self.y < self.height
    }

    /// `width * height`, refused past `MAX_LAYOUT_CELLS` or when the far
    /// edge does not fit in `usize`.
    pub fn cell_count(&self) -> Result<usize, ConfigError> {
        let too_large = || ConfigError::AreaTooLarge {
            width: self.width,
            height: self.height,
        };
        if self.width > MAX_LAYOUT_CELLS || self.height > MAX_LAYOUT_CELLS {
            return Err(too_large());
        }
        self.x.checked_add(self.width).ok_or_else(too_large)?;
        self.y.checked_add(self.height).ok_or_else(too_large)?;
        self.width
            .checked_mul(self.height)
            .filter(|&n| n <= MAX_LAYOUT_CELLS)
            .ok_or_else(too_large)
    }
}

/// ─────────────────────────────────────────────────────
/// Screens
/// ─────────────────────────────────────────────────────
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenTile {
    #[serde(default)]
    pub tile_id: Option<String>,
    #[serde(default)]
    pub sub_tile_x: u8,
    #[serde(default)]
    pub sub_tile_y: u8,
}

impl ScreenTile {
    pub fn part(tile_id: &str, sub_tile_x: u8, sub_tile_y: u8) -> Self {
        Self {
            tile_id: Some(tile_id.to_string()),
            sub_tile_x,
            sub_tile_y,
        }
    }
}

/// Rows of cells; `grid[y][x]`.
pub type ScreenLayerData = Vec<Vec<ScreenTile>>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Layers {
    #[serde(default)]
    pub background: ScreenLayerData,
    #[serde(default)]
    pub collision: ScreenLayerData,
    #[serde(default)]
    pub effects: ScreenLayerData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LayerName {
    #[default]
    Background,
    Collision,
    Effects,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenMap {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub layers: Layers,
    pub active_area_x: Option<usize>,
    pub active_area_y: Option<usize>,
    pub active_area_width: Option<usize>,
    pub active_area_height: Option<usize>,
}

impl ScreenMap {
    pub fn layer(&self, name: LayerName) -> &ScreenLayerData {
        match name {
            LayerName::Background => &self.layers.background,
            LayerName::Collision => &self.layers.collision,
            LayerName::Effects => &self.layers.effects,
        }
    }

    /// The exported window; unset fields fall back to the whole screen.
    pub fn active_area(&self) -> Zone {
        Zone {
            x: self.active_area_x.unwrap_or(0),
            y: self.active_area_y.unwrap_or(0),
            width: self.active_area_width.unwrap_or(self.width),
            height: self.active_area_height.unwrap_or(self.height),
        }
    }
}

/// Fully processed screen handed to `writer`.
#[derive(Debug)]
pub struct ProcessedScreen {
    pub name: String,
    pub codec: Codec,
    pub layout: Layout,
    /// `[width, height]` for compressed exports, none for raw layouts.
    pub header: Option<[u8; 2]>,
    /// Codec output, without the size header.
    pub stream: Vec<u8>,
}

impl ProcessedScreen {
    /// Exact bytes of the exported file.
    pub fn file_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.stream.len() + 2);
        if let Some(header) = self.header {
            out.extend_from_slice(&header);
        }
        out.extend_from_slice(&self.stream);
        out
    }
}
