//! Tile -> character code allocation.
//!
//! In banked mode a tile placed at base code `b` owns the block
//! `b .. b + w*h`, one code per base cell, row-major inside the tile. In
//! unbanked mode the whole catalog is laid out the same way, starting right
//! after the empty code.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::model::{EMPTY_CODE, ScreenLayerData, Tile, TileAssignment, TileBank, Zone};

#[derive(Debug, Clone, Copy)]
struct Slot {
    base: usize,
    width: usize,
}

/// Precomputed tile id -> code block lookup for one export.
#[derive(Debug)]
pub struct CodeTable {
    slots: HashMap<String, Slot>,
    banked: bool,
}

impl CodeTable {
    /// Validates every enabled bank and indexes its assignments. When a tile
    /// sits in several enabled banks the first one wins.
    pub fn banked(banks: &[TileBank], tiles: &[Tile], base_cell: u32) -> Result<Self, ConfigError> {
        let mut slots = HashMap::new();
        for bank in banks.iter().filter(|b| b.enabled) {
            validate_bank(bank, tiles, base_cell)?;
            for (tile_id, assignment) in &bank.assigned_tiles {
                // validate_bank has already checked the tile is in the catalog
                let Some(tile) = tiles.iter().find(|t| &t.id == tile_id) else {
                    continue;
                };
                slots.entry(tile_id.clone()).or_insert(Slot {
                    base: assignment.char_code as usize,
                    width: tile.cells(base_cell).0,
                });
            }
        }
        Ok(Self {
            slots,
            banked: true,
        })
    }

    /// Catalog order, first tile at code 1.
    pub fn unbanked(tiles: &[Tile], base_cell: u32) -> Self {
        let mut slots = HashMap::new();
        let mut next = EMPTY_CODE as usize + 1;
        for tile in tiles {
            let (w, h) = tile.cells(base_cell);
            slots.entry(tile.id.clone()).or_insert(Slot { base: next, width: w });
            next += w * h;
        }
        Self {
            slots,
            banked: false,
        }
    }

    /// Code of one part of `tile`, or `None` when no enabled bank holds it.
    pub fn resolve(&self, tile: &Tile, sub_x: u8, sub_y: u8) -> Result<Option<u8>, ConfigError> {
        let Some(slot) = self.slots.get(&tile.id) else {
            return Ok(None);
        };
        let index = slot.base + sub_y as usize * slot.width + sub_x as usize;
        match u8::try_from(index) {
            Ok(code) => Ok(Some(code)),
            // banked blocks are range-checked up front, only unbanked indices get here
            Err(_) => Err(ConfigError::IndexSpaceExhausted {
                tile: tile.id.clone(),
                sub_x,
                sub_y,
                index,
            }),
        }
    }

    pub fn is_banked(&self) -> bool {
        self.banked
    }
}

/// Codes `tile` occupies in a bank; a tile with no cells cannot be placed.
fn block_len(tile: &Tile, base_cell: u32) -> Result<usize, ConfigError> {
    let (w, h) = tile.cells(base_cell);
    match w * h {
        0 => Err(ConfigError::ZeroSizedTile {
            tile: tile.id.clone(),
        }),
        n => Ok(n),
    }
}

/// Which tile owns each of the 256 codes of `bank`.
fn occupancy<'a>(
    bank: &'a TileBank,
    tiles: &[Tile],
    base_cell: u32,
) -> Result<[Option<&'a str>; 256], ConfigError> {
    if bank.charset_range_start > bank.charset_range_end {
        return Err(ConfigError::InvalidCharsetRange {
            bank: bank.id.clone(),
            start: bank.charset_range_start,
            end: bank.charset_range_end,
        });
    }

    let mut owners: [Option<&str>; 256] = [None; 256];
    for (tile_id, assignment) in &bank.assigned_tiles {
        let tile = tiles
            .iter()
            .find(|t| &t.id == tile_id)
            .ok_or_else(|| ConfigError::UnknownTile {
                tile: tile_id.clone(),
                context: format!("bank `{}`", bank.id),
            })?;

        let first = assignment.char_code as usize;
        let last = first + block_len(tile, base_cell)? - 1;
        if first < bank.charset_range_start as usize || last > bank.charset_range_end as usize {
            return Err(ConfigError::CodeOutOfRange {
                bank: bank.id.clone(),
                tile: tile_id.clone(),
                first,
                last,
                start: bank.charset_range_start,
                end: bank.charset_range_end,
            });
        }

        for code in first..=last {
            if let Some(other) = owners[code] {
                return Err(ConfigError::DuplicateCode {
                    bank: bank.id.clone(),
                    code: code as u8,
                    first: other.to_string(),
                    second: tile_id.clone(),
                });
            }
            owners[code] = Some(tile_id.as_str());
        }
    }
    Ok(owners)
}

/// Checks that the bank range is sane and that every assigned block lies
/// inside it without overlapping another.
pub fn validate_bank(bank: &TileBank, tiles: &[Tile], base_cell: u32) -> Result<(), ConfigError> {
    occupancy(bank, tiles, base_cell).map(|_| ())
}

/// Places `tile` at the lowest free block of the bank and returns its base
/// code.
pub fn assign_tile(
    bank: &mut TileBank,
    tile: &Tile,
    tiles: &[Tile],
    base_cell: u32,
) -> Result<u8, ConfigError> {
    if bank.assigned_tiles.contains_key(&tile.id) {
        return Err(ConfigError::AlreadyAssigned {
            bank: bank.id.clone(),
            tile: tile.id.clone(),
        });
    }

    let needed = block_len(tile, base_cell)?;
    let found = {
        let owners = occupancy(bank, tiles, base_cell)?;
        let start = bank.charset_range_start as usize;
        let end = bank.charset_range_end as usize;
        (start..=end)
            .take_while(|&b| b + needed <= end + 1)
            .find(|&b| owners[b..b + needed].iter().all(Option::is_none))
    };

    let Some(base) = found else {
        return Err(ConfigError::CharsetRangeExhausted {
            bank: bank.id.clone(),
            tile: tile.id.clone(),
            needed,
        });
    };
    let char_code = base as u8;
    bank.assigned_tiles
        .insert(tile.id.clone(), TileAssignment { char_code });
    Ok(char_code)
}

/// Gives every tile of the active area that no enabled bank knows a block in
/// the first enabled bank whose screen zone covers the cell. Returns how many
/// tiles were placed.
pub fn auto_assign(
    banks: &mut [TileBank],
    tiles: &[Tile],
    layer: &ScreenLayerData,
    area: Zone,
    base_cell: u32,
) -> Result<usize, ConfigError> {
    area.cell_count()?;
    let mut placed = 0;
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let Some(tile_id) = layer.get(y).and_then(|row| row.get(x)).and_then(|c| c.tile_id.as_deref())
            else {
                continue;
            };
            if banks
                .iter()
                .any(|b| b.enabled && b.assigned_tiles.contains_key(tile_id))
            {
                continue;
            }
            let Some(bank) = banks
                .iter_mut()
                .find(|b| b.enabled && b.screen_zone.contains(x, y))
            else {
                continue;
            };
            let tile = tiles
                .iter()
                .find(|t| t.id == tile_id)
                .ok_or_else(|| ConfigError::UnknownTile {
                    tile: tile_id.to_string(),
                    context: format!("cell ({x},{y})"),
                })?;
            let code = assign_tile(bank, tile, tiles, base_cell)?;
            log::info!("assigned tile `{}` to bank `{}` at code {}", tile.id, bank.id, code);
            placed += 1;
        }
    }
    Ok(placed)
}
