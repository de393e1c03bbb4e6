//! Optimized RLE: literal and repeat packets, no terminator.
//!
//! ```text
//!   0nnn nnnn  b1 .. bn    literal, n = 1..=127
//!   1nnn nnnn  v           v repeated n times, n = 1..=127
//! ```
//!
//! The decompressor stops once it has produced `width * height` bytes; that
//! count travels in the file header, not in the stream.

use super::emitter::{self, Grammar, PacketEmitter};
use crate::error::DecodeError;

pub const GRAMMAR: Grammar = Grammar {
    max_literal: 127,
    max_run: 127,
    min_run: 2,
    back_reference: None,
};

const REPEAT_FLAG: u8 = 0x80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Literal(Vec<u8>),
    Repeat { count: u8, value: u8 },
}

impl emitter::Packet for Packet {
    fn literal(bytes: Vec<u8>) -> Self {
        Packet::Literal(bytes)
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Packet::Literal(bytes) => {
                debug_assert!((1..=GRAMMAR.max_literal).contains(&bytes.len()));
                out.push(bytes.len() as u8);
                out.extend_from_slice(bytes);
            }
            Packet::Repeat { count, value } => {
                debug_assert!((1..=GRAMMAR.max_run).contains(&(*count as usize)));
                out.push(REPEAT_FLAG | count);
                out.push(*value);
            }
        }
    }
}

/// Greedy packetisation: runs of two or more become repeats.
pub fn packets(data: &[u8]) -> Vec<Packet> {
    let mut out = PacketEmitter::new(&GRAMMAR);
    let mut i = 0;
    while i < data.len() {
        let run = emitter::run_length(data, i, GRAMMAR.max_run);
        if run >= GRAMMAR.min_run {
            out.packet(Packet::Repeat {
                count: run as u8,
                value: data[i],
            });
            i += run;
        } else {
            out.literal_byte(data[i]);
            i += 1;
        }
    }
    out.finish()
}

pub fn encode(data: &[u8]) -> Vec<u8> {
    emitter::to_bytes(&packets(data))
}

/// Replays `stream` the way the Z80 routine does, stopping after `expected`
/// bytes.
pub fn decode(stream: &[u8], expected: usize) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(expected);
    let mut pos = 0;
    while out.len() < expected {
        let header = *stream.get(pos).ok_or(DecodeError::Truncated(pos))?;
        let count = (header & !REPEAT_FLAG) as usize;
        if count == 0 {
            return Err(DecodeError::EmptyPacket(pos));
        }
        if header & REPEAT_FLAG != 0 {
            let value = *stream.get(pos + 1).ok_or(DecodeError::Truncated(pos))?;
            out.extend(std::iter::repeat_n(value, count));
            pos += 2;
        } else {
            let bytes = stream
                .get(pos + 1..pos + 1 + count)
                .ok_or(DecodeError::Truncated(pos))?;
            out.extend_from_slice(bytes);
            pos += 1 + count;
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
