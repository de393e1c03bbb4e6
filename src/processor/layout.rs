//! Flattens the active area of a layer into one byte per cell.
//!
//! Cells are visited row by row, left to right. Every decompressor and
//! every exported asset depends on that order.

use std::collections::{BTreeMap, HashSet};

use super::banks::CodeTable;
use crate::error::ConfigError;
use crate::model::{EMPTY_CODE, ScreenLayerData, Tile, Zone};

/// What a byte value in the layout stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePartRef {
    pub code: u8,
    /// `None` for the empty cell.
    pub tile_id: Option<String>,
    pub name: String,
    pub sub_x: u8,
    pub sub_y: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Tile placed on screen but in no enabled bank; exported as empty.
    UnassignedTile { tile: String, x: usize, y: usize },
}

#[derive(Debug)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
    pub bytes: Vec<u8>,
    /// Sorted by code.
    pub references: Vec<TilePartRef>,
    pub warnings: Vec<Warning>,
}

/// Serializes `area` of `layer`. Cells of the area that lie outside the
/// grid count as empty.
pub fn serialize(
    layer: &ScreenLayerData,
    area: Zone,
    tiles: &[Tile],
    table: &CodeTable,
    base_cell: u32,
) -> Result<Layout, ConfigError> {
    let cells = area.cell_count()?;
    let mut bytes = Vec::with_capacity(cells);
    let mut references = BTreeMap::<u8, TilePartRef>::new();
    let mut warnings = Vec::new();
    let mut warned = HashSet::<&str>::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = layer.get(y).and_then(|row| row.get(x));
            let Some((tile_id, cell)) = cell.and_then(|c| c.tile_id.as_deref().map(|id| (id, c)))
            else {
                bytes.push(EMPTY_CODE);
                references.entry(EMPTY_CODE).or_insert_with(empty_ref);
                continue;
            };

            let tile = tiles
                .iter()
                .find(|t| t.id == tile_id)
                .ok_or_else(|| ConfigError::UnknownTile {
                    tile: tile_id.to_string(),
                    context: format!("cell ({x},{y})"),
                })?;

            let (width, height) = tile.cells(base_cell);
            let (sub_x, sub_y) = (cell.sub_tile_x, cell.sub_tile_y);
            if sub_x as usize >= width || sub_y as usize >= height {
                return Err(ConfigError::SubTileOutOfBounds {
                    tile: tile.id.clone(),
                    x,
                    y,
                    sub_x,
                    sub_y,
                    width,
                    height,
                });
            }

            match table.resolve(tile, sub_x, sub_y)? {
                Some(code) => {
                    bytes.push(code);
                    references.entry(code).or_insert_with(|| TilePartRef {
                        code,
                        tile_id: Some(tile.id.clone()),
                        name: tile.display_name().to_string(),
                        sub_x,
                        sub_y,
                    });
                }
                None => {
                    if warned.insert(tile_id) {
                        log::warn!("tile `{tile_id}` at ({x},{y}) is in no enabled bank, exported as empty");
                        warnings.push(Warning::UnassignedTile {
                            tile: tile_id.to_string(),
                            x,
                            y,
                        });
                    }
                    bytes.push(EMPTY_CODE);
                    references.entry(EMPTY_CODE).or_insert_with(empty_ref);
                }
            }
        }
    }

    debug_assert_eq!(bytes.len(), cells);
    Ok(Layout {
        width: area.width,
        height: area.height,
        bytes,
        references: references.into_values().collect(),
        warnings,
    })
}

fn empty_ref() -> TilePartRef {
    TilePartRef {
        code: EMPTY_CODE,
        tile_id: None,
        name: "Empty".to_string(),
        sub_x: 0,
        sub_y: 0,
    }
}
