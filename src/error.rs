//! Structured failures of the export pipeline.

use thiserror::Error;

/// Problems with the project data that make an export impossible.
///
/// These abort the export before anything is written; the message always
/// names the tile and/or bank at fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("bank `{bank}` has an inverted charset range {start}..={end}")]
    InvalidCharsetRange { bank: String, start: u8, end: u8 },

    #[error("tile `{tile}` is not in the tile catalog (referenced by {context})")]
    UnknownTile { tile: String, context: String },

    #[error("tile `{tile}` in bank `{bank}` uses codes {first}..={last}, outside {start}..={end}")]
    CodeOutOfRange {
        bank: String,
        tile: String,
        first: usize,
        last: usize,
        start: u8,
        end: u8,
    },

    #[error("bank `{bank}` assigns code {code} to both `{first}` and `{second}`")]
    DuplicateCode {
        bank: String,
        code: u8,
        first: String,
        second: String,
    },

    #[error("bank `{bank}` has no {needed} contiguous free codes left for tile `{tile}`")]
    CharsetRangeExhausted {
        bank: String,
        tile: String,
        needed: usize,
    },

    #[error("tile `{tile}` is already assigned to bank `{bank}`")]
    AlreadyAssigned { bank: String, tile: String },

    #[error("tile `{tile}` part ({sub_x},{sub_y}) would need index {index}, past 255")]
    IndexSpaceExhausted {
        tile: String,
        sub_x: u8,
        sub_y: u8,
        index: usize,
    },

    #[error("cell ({x},{y}) points at part ({sub_x},{sub_y}) of `{tile}`, which is only {width}x{height} cells")]
    SubTileOutOfBounds {
        tile: String,
        x: usize,
        y: usize,
        sub_x: u8,
        sub_y: u8,
        width: usize,
        height: usize,
    },

    #[error("active area {width}x{height} is too large to export")]
    AreaTooLarge { width: usize, height: usize },

    #[error("tile `{tile}` has zero dimensions in characters and cannot be assigned")]
    ZeroSizedTile { tile: String },
}

/// A compressed stream the reference decompressor would choke on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("stream ends inside a packet at offset {0}")]
    Truncated(usize),

    #[error("zero-length packet header at offset {0}")]
    EmptyPacket(usize),

    #[error("back-reference at offset {at} reaches {offset} bytes behind {produced} produced bytes")]
    BadBackReference {
        at: usize,
        offset: usize,
        produced: usize,
    },

    #[error("decoded {got} bytes, expected {expected}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("{0} unread bytes after the end of the stream")]
    TrailingBytes(usize),
}
