use clap::Parser;
use std::path::PathBuf;

use crate::codec::Codec;
use crate::model::{LayerName, LayoutMode};
use crate::processor::ExportOptions;
use crate::writer::asm::DataFormat;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Input .json project file
    pub input: PathBuf,
    /// Output directory
    pub output: PathBuf,
    /// Screen to export, by name or id (defaults to the first one)
    #[arg(short, long)]
    pub screen: Option<String>,
    /// Grid layer to serialize
    #[arg(short, long, value_enum, default_value_t = LayerName::Background)]
    pub layer: LayerName,
    /// Compression format
    #[arg(short, long, value_enum, default_value_t = Codec::SuperRle)]
    pub codec: Codec,
    /// Tile code mapping; overrides the project setting
    #[arg(short, long, value_enum)]
    pub mode: Option<LayoutMode>,
    /// Number format of the DB lines
    #[arg(short, long, value_enum, default_value_t = DataFormat::Dec)]
    pub format: DataFormat,
    /// Put tiles missing from every bank into the bank covering their cell
    #[arg(long)]
    pub auto_assign: bool,
    /// Decompress the result again and compare before writing
    #[arg(long)]
    pub verify: bool,
}

impl Cli {
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            screen: self.screen.clone(),
            layer: self.layer,
            codec: self.codec,
            mode: self.mode,
            auto_assign: self.auto_assign,
            verify: self.verify,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["screenpack", "project.json", "out"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("project.json"));
        assert_eq!(cli.output, PathBuf::from("out"));
        assert_eq!(cli.format, DataFormat::Dec);

        let options = cli.export_options();
        assert_eq!(options.screen, None);
        assert_eq!(options.layer, LayerName::Background);
        assert_eq!(options.codec, Codec::SuperRle);
        assert_eq!(options.mode, None);
        assert!(!options.auto_assign);
        assert!(!options.verify);
    }

    #[test]
    fn test_every_flag_reaches_export_options() {
        let cli = Cli::try_parse_from([
            "screenpack",
            "project.json",
            "out",
            "--screen",
            "Level 1",
            "--layer",
            "collision",
            "--codec",
            "optimized-rle",
            "--mode",
            "unbanked",
            "--format",
            "hex",
            "--auto-assign",
            "--verify",
        ])
        .unwrap();
        assert_eq!(cli.format, DataFormat::Hex);

        let options = cli.export_options();
        assert_eq!(options.screen.as_deref(), Some("Level 1"));
        assert_eq!(options.layer, LayerName::Collision);
        assert_eq!(options.codec, Codec::OptimizedRle);
        assert_eq!(options.mode, Some(LayoutMode::Unbanked));
        assert!(options.auto_assign);
        assert!(options.verify);
    }

    #[test]
    fn test_short_flags_and_bad_values() {
        let cli = Cli::try_parse_from([
            "screenpack", "p.json", "out", "-s", "screen_2", "-c", "pletter", "-m", "banked", "-l",
            "effects", "-f", "dec",
        ])
        .unwrap();
        let options = cli.export_options();
        assert_eq!(options.codec, Codec::Pletter);
        assert_eq!(options.mode, Some(LayoutMode::Banked));
        assert_eq!(options.layer, LayerName::Effects);

        assert!(Cli::try_parse_from(["screenpack", "p.json", "out", "--codec", "zx0"]).is_err());
        assert!(Cli::try_parse_from(["screenpack", "p.json"]).is_err());
    }
}
