//! Byte-stream compressors matching the fixed Z80 decompressors.
//!
//! Each submodule exposes `packets` (typed packet list), `encode` (wire
//! bytes) and `decode` (the reference routine replayed in Rust).
pub mod emitter;
pub mod optimized_rle;
pub mod pletter;
pub mod super_rle;

use crate::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Codec {
    /// Uncompressed layout bytes, no size header.
    Raw,
    OptimizedRle,
    #[default]
    SuperRle,
    Pletter,
}

impl Codec {
    pub fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Codec::Raw => data.to_vec(),
            Codec::OptimizedRle => optimized_rle::encode(data),
            Codec::SuperRle => super_rle::encode(data),
            Codec::Pletter => pletter::encode(data),
        }
    }

    /// Decompresses `stream` and checks it yields exactly `expected` bytes.
    pub fn decompress(self, stream: &[u8], expected: usize) -> Result<Vec<u8>, DecodeError> {
        let out = match self {
            Codec::Raw => stream.to_vec(),
            Codec::OptimizedRle => optimized_rle::decode(stream, expected)?,
            Codec::SuperRle => super_rle::decode(stream)?,
            Codec::Pletter => pletter::decode(stream, expected)?,
        };
        if out.len() != expected {
            return Err(DecodeError::LengthMismatch {
                expected,
                got: out.len(),
            });
        }
        Ok(out)
    }

    /// Whether the exported file starts with the `[width, height]` header.
    pub fn has_size_header(self) -> bool {
        self != Codec::Raw
    }

    pub fn file_suffix(self) -> &'static str {
        match self {
            Codec::Raw => "layout",
            Codec::OptimizedRle => "optimized_rle",
            Codec::SuperRle => "superRLE",
            Codec::Pletter => "pletter",
        }
    }

    /// Middle part of the assembler label, `<MAP>_<KIND>_DATA`.
    pub fn label_kind(self) -> &'static str {
        match self {
            Codec::Raw => "LAYOUT",
            Codec::OptimizedRle => "RLE",
            Codec::SuperRle => "SUPER_RLE",
            Codec::Pletter => "PLETTER",
        }
    }

    /// Name used in the listing's closing comment.
    pub fn display_name(self) -> &'static str {
        match self {
            Codec::Raw => "Layout",
            Codec::OptimizedRle => "Optimized RLE",
            Codec::SuperRle => "SuperRLE",
            Codec::Pletter => "Pletter",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Codec::Raw => "None (raw layout)",
            Codec::OptimizedRle => "Optimized RLE (Literal/Repeat Packets)",
            Codec::SuperRle => "SuperRLE (Literal + RLE + LZ Pattern Copy)",
            Codec::Pletter => "Pletter RLE (Marker 201 / #C9, Count, Value)",
        }
    }
}
