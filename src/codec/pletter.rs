//! Pletter-style marker RLE.
//!
//! Bytes are copied verbatim except for runs, which are written as
//! `[0xC9, count, value]`. The marker can therefore never appear as a plain
//! literal: a lone `0xC9` in the data becomes `[0xC9, 1, 0xC9]`. There is no
//! terminator; the decompressor counts produced bytes.

use std::num::NonZeroU8;

use super::emitter::{self, Grammar, PacketEmitter};
use crate::error::DecodeError;

pub const MARKER: u8 = 0xC9;

pub const GRAMMAR: Grammar = Grammar {
    // literals carry no header, so their length is irrelevant on the wire
    max_literal: usize::MAX,
    max_run: 255,
    min_run: 3,
    back_reference: None,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Never contains `MARKER`.
    Literal(Vec<u8>),
    Run { count: NonZeroU8, value: u8 },
}

impl emitter::Packet for Packet {
    fn literal(bytes: Vec<u8>) -> Self {
        Packet::Literal(bytes)
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Packet::Literal(bytes) => {
                debug_assert!(!bytes.contains(&MARKER));
                out.extend_from_slice(bytes);
            }
            Packet::Run { count, value } => out.extend_from_slice(&[MARKER, count.get(), *value]),
        }
    }
}

pub fn packets(data: &[u8]) -> Vec<Packet> {
    let mut out = PacketEmitter::new(&GRAMMAR);
    let mut i = 0;
    while i < data.len() {
        let value = data[i];
        // run_length is at least 1 here and capped at 255
        let run = emitter::run_length(data, i, GRAMMAR.max_run);
        match NonZeroU8::new(run as u8) {
            Some(count) if run >= GRAMMAR.min_run || value == MARKER => {
                out.packet(Packet::Run { count, value });
            }
            _ => {
                for _ in 0..run {
                    out.literal_byte(value);
                }
            }
        }
        i += run;
    }
    out.finish()
}

pub fn encode(data: &[u8]) -> Vec<u8> {
    emitter::to_bytes(&packets(data))
}

/// Replays `stream` until `expected` bytes are produced.
pub fn decode(stream: &[u8], expected: usize) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(expected);
    let mut pos = 0;
    while out.len() < expected {
        let byte = *stream.get(pos).ok_or(DecodeError::Truncated(pos))?;
        if byte == MARKER {
            let args = stream
                .get(pos + 1..pos + 3)
                .ok_or(DecodeError::Truncated(pos))?;
            if args[0] == 0 {
                return Err(DecodeError::EmptyPacket(pos));
            }
            out.extend(std::iter::repeat_n(args[1], args[0] as usize));
            pos += 3;
        } else {
            out.push(byte);
            pos += 1;
        }
    }
    if out.len() != expected {
        return Err(DecodeError::LengthMismatch {
            expected,
            got: out.len(),
        });
    }
    if pos != stream.len() {
        return Err(DecodeError::TrailingBytes(stream.len() - pos));
    }
    Ok(out)
}
