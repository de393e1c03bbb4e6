//! Packet building shared by the three codecs.
//!
//! Every format has the same shape: stretches of verbatim bytes interleaved
//! with "repeat this byte" packets, and for SuperRLE a back-reference on
//! top. The emitter owns the literal bookkeeping so each codec only decides
//! *which* packet starts at a given position.

/// Limits of one wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    /// Largest literal packet.
    pub max_literal: usize,
    /// Largest repeat count of a single run packet.
    pub max_run: usize,
    /// Shortest run worth a run packet.
    pub min_run: usize,
    pub back_reference: Option<BackReference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackReference {
    pub max_offset: usize,
    pub max_count: usize,
    pub min_count: usize,
}

/// One packet of a concrete format.
pub trait Packet {
    /// Wraps a stretch of verbatim bytes.
    fn literal(bytes: Vec<u8>) -> Self;

    /// Appends the on-wire form.
    fn write(&self, out: &mut Vec<u8>);
}

/// Collects packets, merging consecutive literal bytes into literal packets
/// no longer than `max_literal`.
#[derive(Debug)]
pub struct PacketEmitter<P> {
    max_literal: usize,
    pending: Vec<u8>,
    packets: Vec<P>,
}

impl<P: Packet> PacketEmitter<P> {
    pub fn new(grammar: &Grammar) -> Self {
        Self {
            max_literal: grammar.max_literal,
            pending: Vec::new(),
            packets: Vec::new(),
        }
    }

    pub fn literal_byte(&mut self, byte: u8) {
        self.pending.push(byte);
        if self.pending.len() == self.max_literal {
            self.flush();
        }
    }

    pub fn packet(&mut self, packet: P) {
        self.flush();
        self.packets.push(packet);
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let bytes = std::mem::take(&mut self.pending);
            self.packets.push(P::literal(bytes));
        }
    }

    pub fn finish(mut self) -> Vec<P> {
        self.flush();
        self.packets
    }
}

/// Concatenates the on-wire form of `packets`.
pub fn to_bytes<P: Packet>(packets: &[P]) -> Vec<u8> {
    let mut out = Vec::new();
    for p in packets {
        p.write(&mut out);
    }
    out
}

/// Length of the run of `data[at]` starting at `at`, capped at `max`.
pub fn run_length(data: &[u8], at: usize, max: usize) -> usize {
    let Some(&value) = data.get(at) else {
        return 0;
    };
    data[at..].iter().take(max).take_while(|&&b| b == value).count()
}
