//! SuperRLE: literals, runs and back-references, terminated in-stream.
//!
//! ```text
//!   0                      end of stream
//!   n = 1..=126  b1 .. bn  literal
//!   127  count  offset     copy `count` bytes starting `offset` bytes behind
//!                          the current output position (both 1..=255)
//!   n = 128..=255  v       v repeated 256 - n times (1..=128)
//! ```
//!
//! Back-references read the decompressor's own output one byte at a time,
//! so a copy may overlap the bytes it is producing.

use std::num::NonZeroU8;

use super::emitter::{self, BackReference, Grammar, PacketEmitter};
use crate::error::DecodeError;

const BACK_REFERENCE: BackReference = BackReference {
    max_offset: 255,
    max_count: 255,
    min_count: 3,
};

pub const GRAMMAR: Grammar = Grammar {
    max_literal: 126,
    max_run: 128,
    min_run: 3,
    back_reference: Some(BACK_REFERENCE),
};

const END: u8 = 0;
const PATTERN_COPY: u8 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Literal(Vec<u8>),
    Run { count: u8, value: u8 },
    PatternCopy { count: NonZeroU8, offset: NonZeroU8 },
    End,
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
            Packet::Run { count, value } => {
                debug_assert!((1..=GRAMMAR.max_run).contains(&(*count as usize)));
                out.push((256 - *count as u16) as u8);
                out.push(*value);
            }
            Packet::PatternCopy { count, offset } => {
                out.extend_from_slice(&[PATTERN_COPY, count.get(), offset.get()]);
            }
            Packet::End => out.push(END),
        }
    }
}

/// Longest earlier match for `data[at..]`, as `(count, offset)`.
///
/// The comparison runs against the source itself: every byte before `at` is
/// already in the decompressor's output, and an overlapping copy reproduces
/// `data[at + k - offset]` for each `k` it has matched so far.
fn longest_match(data: &[u8], at: usize, limits: &BackReference) -> Option<(usize, usize)> {
    let limit = limits.max_count.min(data.len() - at);
    let mut best = (0, 0);
    for offset in 1..=limits.max_offset.min(at) {
        let len = (0..limit)
            .take_while(|&k| data[at + k] == data[at + k - offset])
            .count();
        if len > best.0 {
            best = (len, offset);
            if len == limit {
                break;
            }
        }
    }
    (best.0 >= limits.min_count).then_some(best)
}

/// Picks, at every position, whichever of run / back-reference consumes more
/// input (runs win ties); bytes neither covers become literals.
pub fn packets(data: &[u8]) -> Vec<Packet> {
    let mut out = PacketEmitter::new(&GRAMMAR);
    let mut i = 0;
    while i < data.len() {
        let run = emitter::run_length(data, i, GRAMMAR.max_run);
        let run = (run >= GRAMMAR.min_run).then_some(run);
        let copy = longest_match(data, i, &BACK_REFERENCE);

        let consumed = match (run, copy) {
            (Some(run), Some((count, _))) if run >= count => emit_run(&mut out, run, data[i]),
            (_, Some((count, offset))) => emit_copy(&mut out, count, offset),
            (Some(run), None) => emit_run(&mut out, run, data[i]),
            (None, None) => {
                out.literal_byte(data[i]);
                1
            }
        };
        i += consumed;
    }
    out.packet(Packet::End);
    out.finish()
}

fn emit_run(out: &mut PacketEmitter<Packet>, count: usize, value: u8) -> usize {
    out.packet(Packet::Run {
        count: count as u8,
        value,
    });
    count
}

fn emit_copy(out: &mut PacketEmitter<Packet>, count: usize, offset: usize) -> usize {
    // longest_match only reports counts >= 3 and offsets >= 1, both <= 255
    match (NonZeroU8::new(count as u8), NonZeroU8::new(offset as u8)) {
        (Some(count), Some(offset)) => out.packet(Packet::PatternCopy { count, offset }),
        _ => unreachable!("back-reference {count}@{offset} outside 1..=255"),
    }
    count
}

pub fn encode(data: &[u8]) -> Vec<u8> {
    emitter::to_bytes(&packets(data))
}

/// Replays `stream` up to and including its end marker.
pub fn decode(stream: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    let mut pos = 0;
    loop {
        let header = *stream.get(pos).ok_or(DecodeError::Truncated(pos))?;
        match header {
            END => {
                pos += 1;
                break;
            }
            PATTERN_COPY => {
                let args = stream
                    .get(pos + 1..pos + 3)
                    .ok_or(DecodeError::Truncated(pos))?;
                let (count, offset) = (args[0] as usize, args[1] as usize);
                if count == 0 {
                    return Err(DecodeError::EmptyPacket(pos));
                }
                if offset == 0 || offset > out.len() {
                    return Err(DecodeError::BadBackReference {
                        at: pos,
                        offset,
                        produced: out.len(),
                    });
                }
                for _ in 0..count {
                    out.push(out[out.len() - offset]);
                }
                pos += 3;
            }
            n if n < PATTERN_COPY => {
                let len = n as usize;
                let bytes = stream
                    .get(pos + 1..pos + 1 + len)
                    .ok_or(DecodeError::Truncated(pos))?;
                out.extend_from_slice(bytes);
                pos += 1 + len;
            }
            n => {
                let value = *stream.get(pos + 1).ok_or(DecodeError::Truncated(pos))?;
                out.extend(std::iter::repeat_n(value, 256 - n as usize));
                pos += 2;
            }
        }
    }
    if pos != stream.len() {
        return Err(DecodeError::TrailingBytes(stream.len() - pos));
    }
    Ok(out)
}
