//! Dump the export bytes as-is.

use crate::model::ProcessedScreen;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub fn emit(screen: &ProcessedScreen, out_dir: &Path) -> io::Result<PathBuf> {
    let path = super::output_path(screen, out_dir, "bin");
    fs::write(&path, screen.file_bytes())?;
    log::info!("wrote {}", path.display());
    Ok(path)
}
