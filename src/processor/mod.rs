//! The functional core: project snapshot in, export bytes out.
pub mod banks;
pub mod layout;

use anyhow::{Context, Result, anyhow, bail};

use crate::codec::Codec;
use crate::error::ConfigError;
use crate::model::{LayerName, LayoutMode, ProcessedScreen, Project};
use banks::CodeTable;

/// Settings resolved from the command line.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Screen name or id; the first screen when unset.
    pub screen: Option<String>,
    pub layer: LayerName,
    pub codec: Codec,
    /// Overrides the project's mode.
    pub mode: Option<LayoutMode>,
    pub auto_assign: bool,
    pub verify: bool,
}

/// Banked when the project says so or, failing that, when it has banks.
pub fn resolve_mode(project: &Project, options: &ExportOptions) -> LayoutMode {
    options.mode.or(project.mode).unwrap_or(if project.tile_banks.is_empty() {
        LayoutMode::Unbanked
    } else {
        LayoutMode::Banked
    })
}

/// Runs every pass for one screen and returns a read-only structure for
/// the writers.
pub fn run(project: &Project, options: &ExportOptions) -> Result<ProcessedScreen> {
    let screen = match &options.screen {
        Some(key) => project
            .screen(key)
            .ok_or_else(|| anyhow!("no screen named `{key}`"))?,
        None => project
            .screens
            .first()
            .ok_or_else(|| anyhow!("project has no screens"))?,
    };
    let area = screen.active_area();
    let layer = screen.layer(options.layer);
    let base_cell = project.base_cell_size;
    let mode = resolve_mode(project, options);
    log::info!(
        "exporting `{}` {:?} layer, area {}x{} at ({},{}), {:?} mode",
        screen.name,
        options.layer,
        area.width,
        area.height,
        area.x,
        area.y,
        mode
    );

    // ── Size checks ───────────────────────────────────────────────
    // before any allocation sized by the area
    area.cell_count()?;
    let header = if options.codec.has_size_header() {
        match (u8::try_from(area.width), u8::try_from(area.height)) {
            (Ok(w), Ok(h)) => Some([w, h]),
            _ => {
                return Err(ConfigError::AreaTooLarge {
                    width: area.width,
                    height: area.height,
                }
                .into());
            }
        }
    } else {
        None
    };

    // ── Code table ────────────────────────────────────────────────
    let table = match mode {
        LayoutMode::Banked => {
            let mut tile_banks = project.tile_banks.clone();
            if options.auto_assign {
                let placed =
                    banks::auto_assign(&mut tile_banks, &project.tiles, layer, area, base_cell)
                        .context("Assigning tiles to banks")?;
                log::info!("auto-assigned {placed} tiles");
            }
            CodeTable::banked(&tile_banks, &project.tiles, base_cell)
                .context("Validating tile banks")?
        }
        LayoutMode::Unbanked => CodeTable::unbanked(&project.tiles, base_cell),
    };
    log::debug!("code table ready (banked: {})", table.is_banked());

    // ── Layout ────────────────────────────────────────────────────
    let layout = layout::serialize(layer, area, &project.tiles, &table, base_cell)
        .with_context(|| format!("Serializing screen `{}`", screen.name))?;
    if !layout.warnings.is_empty() {
        log::warn!(
            "{} tiles exported as empty, see warnings above",
            layout.warnings.len()
        );
    }

    // ── Compress ──────────────────────────────────────────────────
    let stream = options.codec.compress(&layout.bytes);
    log::info!(
        "{:?}: {} bytes -> {} bytes",
        options.codec,
        layout.bytes.len(),
        stream.len()
    );

    if options.verify {
        let replay = options
            .codec
            .decompress(&stream, layout.bytes.len())
            .with_context(|| format!("Replaying {:?} stream", options.codec))?;
        if replay != layout.bytes {
            bail!("{:?} stream does not reproduce the layout", options.codec);
        }
        log::info!("verified {:?} stream", options.codec);
    }

    Ok(ProcessedScreen {
        name: screen.name.clone(),
        codec: options.codec,
        layout,
        header,
        stream,
    })
}
