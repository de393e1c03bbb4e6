//! Component 4 – export files.
//!
//! Both writers emit exactly `ProcessedScreen::file_bytes`; only the
//! representation differs.
pub mod asm;
pub mod bin;

use std::path::{Path, PathBuf};

use crate::model::ProcessedScreen;

/// Screen name reduced to `[A-Za-z0-9_]`, usable in file names and labels.
pub fn safe_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// `<out_dir>/<safe_name>_<codec suffix>.<ext>`
pub fn output_path(screen: &ProcessedScreen, out_dir: &Path, ext: &str) -> PathBuf {
    out_dir.join(format!(
        "{}_{}.{ext}",
        safe_name(&screen.name),
        screen.codec.file_suffix()
    ))
}
