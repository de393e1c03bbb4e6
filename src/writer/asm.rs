//! Emit a Z80 assembler listing (`DB` lines) of the export bytes.

use crate::codec::{Codec, pletter};
use crate::model::ProcessedScreen;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const BYTES_PER_LINE: usize = 16;

/// How `DB` values are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DataFormat {
    /// `12,255`
    #[default]
    Dec,
    /// `#0C,#FF`
    Hex,
}

impl DataFormat {
    fn byte(self, b: u8) -> String {
        match self {
            DataFormat::Dec => b.to_string(),
            DataFormat::Hex => format!("#{b:02X}"),
        }
    }
}

pub fn emit(screen: &ProcessedScreen, out_dir: &Path, format: DataFormat) -> io::Result<PathBuf> {
    let path = super::output_path(screen, out_dir, "asm");
    let mut f = BufWriter::new(File::create(&path)?);
    write_listing(&mut f, screen, format)?;
    f.flush()?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

pub fn write_listing<W: Write>(w: &mut W, screen: &ProcessedScreen, format: DataFormat) -> io::Result<()> {
    let label = super::safe_name(&screen.name).to_uppercase();
    let layout = &screen.layout;
    let bytes = screen.file_bytes();

    // ---------------------------------------------------------------
    // 1. Header comments
    // ---------------------------------------------------------------
    writeln!(
        w,
        ";; MAP: {} ({}x{} tiles)",
        screen.name, layout.width, layout.height
    )?;
    writeln!(w, ";; COMPRESSION: {}", screen.codec.description())?;
    writeln!(w, ";; Original Size: {} bytes", layout.bytes.len())?;
    if screen.header.is_some() {
        writeln!(
            w,
            ";; Compressed Size: {} bytes (Width+Height+Packets)",
            bytes.len()
        )?;
    } else {
        writeln!(w, ";; Total Size: {} bytes", bytes.len())?;
    }
    if !layout.bytes.is_empty() {
        let ratio = (1.0 - bytes.len() as f64 / layout.bytes.len() as f64) * 100.0;
        writeln!(w, ";; Compression Ratio: {ratio:.1}%")?;
    }
    if screen.codec == Codec::Pletter {
        let m = pletter::MARKER;
        writeln!(w, ";; RLE Marker for Pletter is {m} (Dec: {m}, Hex: #{m:02X})")?;
    }
    writeln!(w)?;

    // ---------------------------------------------------------------
    // 2. What each layout byte means
    // ---------------------------------------------------------------
    if !layout.references.is_empty() {
        writeln!(w, ";; --- TILE PART BYTE REFERENCES for {label} ---")?;
        for r in &layout.references {
            match &r.tile_id {
                Some(id) => writeln!(
                    w,
                    ";; Byte {code} (Dec: {code}, Hex: #{code:02X}) = Tile '{}' (ID: {id}, Part: {},{})",
                    r.name,
                    r.sub_x,
                    r.sub_y,
                    code = r.code
                )?,
                None => writeln!(
                    w,
                    ";; Byte {code} (Dec: {code}, Hex: #{code:02X}) = {}",
                    r.name,
                    code = r.code
                )?,
            }
        }
        writeln!(w)?;
    }

    // ---------------------------------------------------------------
    // 3. Data
    // ---------------------------------------------------------------
    writeln!(w, "{label}_{}_DATA:", screen.codec.label_kind())?;
    for chunk in bytes.chunks(BYTES_PER_LINE) {
        let line: Vec<String> = chunk.iter().map(|&b| format.byte(b)).collect();
        writeln!(w, "    DB {}", line.join(","))?;
    }
    writeln!(w)?;
    writeln!(
        w,
        ";; End of {} Data for {}",
        screen.codec.display_name(),
        screen.name
    )?;
    Ok(())
}

/// Reads the bytes back out of a listing written by `write_listing`.
pub fn parse_db_bytes(listing: &str) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    for line in listing.lines() {
        let Some(values) = line.trim_start().strip_prefix("DB ") else {
            continue;
        };
        for v in values.split(',') {
            let b = match v.strip_prefix('#') {
                Some(hex) => u8::from_str_radix(hex, 16).ok()?,
                None => v.parse().ok()?,
            };
            out.push(b);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::layout::{Layout, TilePartRef};

    fn screen(codec: Codec, raw: Vec<u8>) -> ProcessedScreen {
        let stream = codec.compress(&raw);
        ProcessedScreen {
            name: "Level 1".into(),
            codec,
            header: codec.has_size_header().then_some([raw.len() as u8, 1]),
            layout: Layout {
                width: raw.len(),
                height: 1,
                bytes: raw,
                references: vec![TilePartRef {
                    code: 3,
                    tile_id: Some("wall".into()),
                    name: "Wall".into(),
                    sub_x: 0,
                    sub_y: 0,
                }],
                warnings: vec![],
            },
            stream,
        }
    }

    fn listing(screen: &ProcessedScreen, format: DataFormat) -> String {
        let mut out = Vec::new();
        write_listing(&mut out, screen, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_listing_layout() {
        let s = screen(Codec::OptimizedRle, vec![3; 8]);
        let text = listing(&s, DataFormat::Dec);
        assert!(text.starts_with(";; MAP: Level 1 (8x1 tiles)\n"));
        assert!(text.contains(";; Compressed Size: 4 bytes (Width+Height+Packets)\n"));
        assert!(text.contains(";; Compression Ratio: 50.0%\n"));
        assert!(text.contains(";; Byte 3 (Dec: 3, Hex: #03) = Tile 'Wall' (ID: wall, Part: 0,0)\n"));
        assert!(text.contains("LEVEL_1_RLE_DATA:\n    DB 8,1,136,3\n"));
        assert!(text.ends_with("\n;; End of Optimized RLE Data for Level 1\n"));
        assert!(!text.contains("RLE Marker"));
    }

    #[test]
    fn test_hex_and_line_wrapping() {
        let raw: Vec<u8> = (0..40).collect();
        let s = screen(Codec::Raw, raw.clone());
        let text = listing(&s, DataFormat::Hex);
        let db_lines: Vec<&str> = text.lines().filter(|l| l.starts_with("    DB ")).collect();
        assert_eq!(db_lines.len(), 3);
        assert!(db_lines[0].starts_with("    DB #00,#01,"));
        assert!(text.contains("LEVEL_1_LAYOUT_DATA:"));
        assert_eq!(parse_db_bytes(&text).unwrap(), raw);
    }

    #[test]
    fn test_pletter_listing_names_its_marker() {
        let s = screen(Codec::Pletter, vec![0xC9, 1, 2]);
        let text = listing(&s, DataFormat::Dec);
        assert!(text.contains(";; RLE Marker for Pletter is 201 (Dec: 201, Hex: #C9)\n\n"));
        assert!(text.ends_with(";; End of Pletter Data for Level 1\n"));
        assert_eq!(parse_db_bytes(&text).unwrap(), s.file_bytes());
    }

    #[test]
    fn test_listing_matches_binary() {
        let raw = vec![1, 2, 3, 1, 2, 3, 1, 2, 3, 0xC9];
        for codec in [Codec::OptimizedRle, Codec::SuperRle, Codec::Pletter] {
            let s = screen(codec, raw.clone());
            for format in [DataFormat::Dec, DataFormat::Hex] {
                assert_eq!(parse_db_bytes(&listing(&s, format)).unwrap(), s.file_bytes());
            }
        }
    }
}
