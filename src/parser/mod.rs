use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::model::{Project, ScreenMap, Tile, TileBank};

/// Parse the whole project JSON string into a `Project`.
///
/// The file is expected to contain top-level arrays
///   • "tiles"      – the tile catalog (required)
///   • "screens"    – screen maps (required, may be empty)
///   • "tileBanks"  – bank configuration (optional)
///
/// Everything else the editor stores next to them is ignored.
pub fn load_from_json(json: &str) -> Result<Project> {
    log::debug!("project file size: {} bytes", json.len());

    // Grab the entire file as a dynamic value first.
    let root: Value = serde_json::from_str(json).context("Failed to parse JSON")?;

    let tiles = root
        .get("tiles")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("file has no `tiles` array"))?;
    let screens = root
        .get("screens")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("file has no `screens` array"))?;
    let banks: &[Value] = match root.get("tileBanks") {
        None | Some(Value::Null) => &[],
        Some(v) => v
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| anyhow!("`tileBanks` is not an array"))?,
    };

    log::info!(
        "found {} tiles, {} banks, {} screens",
        tiles.len(),
        banks.len(),
        screens.len()
    );

    let tiles = parse_each::<Tile>(tiles, "tile")?;
    let tile_banks = parse_each::<TileBank>(banks, "bank")?;
    let screens = parse_each::<ScreenMap>(screens, "screen")?;

    let base_cell_size = match root.get("baseCellSize") {
        None => crate::model::DEFAULT_BASE_CELL,
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n > 0)
            .ok_or_else(|| anyhow!("`baseCellSize` must be a positive integer"))?,
    };
    let mode = match root.get("mode") {
        None | Some(Value::Null) => None,
        Some(v) => Some(serde_json::from_value(v.clone()).context("Invalid `mode`")?),
    };

    Ok(Project {
        base_cell_size,
        mode,
        tiles,
        tile_banks,
        screens,
    })
}

// ─────────────────────────────────────────────────────
/// Helper: deserialize every element, naming the failing one.
fn parse_each<T: serde::de::DeserializeOwned>(items: &[Value], what: &str) -> Result<Vec<T>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let label = item
                .get("id")
                .or_else(|| item.get("name"))
                .and_then(|v| v.as_str())
                .unwrap_or("?");
            serde_json::from_value(item.clone())
                .with_context(|| format!("{what} {i} (`{label}`) is malformed"))
        })
        .collect()
}
