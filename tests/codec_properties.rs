//! Randomised checks of the three codecs against their reference decoders.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use screenpack::codec::{Codec, optimized_rle, pletter, super_rle};

const CODECS: [Codec; 3] = [Codec::OptimizedRle, Codec::SuperRle, Codec::Pletter];

/// Screen-like data: runs, repeated motifs and noise over a small alphabet,
/// with the Pletter marker mixed in.
fn sample(rng: &mut StdRng, len: usize) -> Vec<u8> {
    let alphabet: Vec<u8> = (0..rng.random_range(1..=12))
        .map(|_| if rng.random_bool(0.1) { pletter::MARKER } else { rng.random() })
        .collect();
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        match rng.random_range(0..4) {
            0 => {
                let v = alphabet[rng.random_range(0..alphabet.len())];
                let n = rng.random_range(1..400);
                out.extend(std::iter::repeat_n(v, n));
            }
            1 if !out.is_empty() => {
                let offset = rng.random_range(1..=out.len().min(300));
                let n = rng.random_range(1..300);
                for _ in 0..n {
                    out.push(out[out.len() - offset]);
                }
            }
            2 => {
                for _ in 0..rng.random_range(1..50) {
                    out.push(alphabet[rng.random_range(0..alphabet.len())]);
                }
            }
            _ => {
                for _ in 0..rng.random_range(1..200) {
                    out.push(rng.random());
                }
            }
        }
    }
    out.truncate(len);
    out
}

fn corpus() -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(0x5C2E_E7);
    let mut inputs = vec![
        vec![],
        vec![0],
        vec![pletter::MARKER],
        vec![pletter::MARKER; 600],
        vec![42; 65536],
        (0..=255).cycle().take(65536).collect(),
    ];
    for len in [1, 2, 3, 4, 127, 128, 129, 255, 256, 257, 768] {
        inputs.push(sample(&mut rng, len));
    }
    for _ in 0..60 {
        let len = rng.random_range(0..2048);
        inputs.push(sample(&mut rng, len));
    }
    let mut noise = vec![0u8; 65536];
    rng.fill(&mut noise[..]);
    inputs.push(noise);
    inputs.push(sample(&mut rng, 65536));
    inputs
}

#[test]
fn every_codec_round_trips() {
    for data in corpus() {
        for codec in CODECS {
            let stream = codec.compress(&data);
            let back = codec
                .decompress(&stream, data.len())
                .unwrap_or_else(|e| panic!("{codec:?} on {} bytes: {e}", data.len()));
            assert!(back == data, "{codec:?} changed {} bytes of input", data.len());
        }
    }
}

#[test]
fn encoding_is_deterministic() {
    for data in corpus().iter().take(20) {
        for codec in CODECS {
            assert_eq!(codec.compress(data), codec.compress(data));
        }
    }
}

#[test]
fn optimized_rle_packets_stay_in_bounds() {
    for data in corpus() {
        for p in optimized_rle::packets(&data) {
            match p {
                optimized_rle::Packet::Literal(bytes) => assert!((1..=127).contains(&bytes.len())),
                optimized_rle::Packet::Repeat { count, .. } => assert!((1..=127).contains(&count)),
            }
        }
    }
}

#[test]
fn super_rle_packets_stay_in_bounds_and_look_back_safely() {
    for data in corpus() {
        let packets = super_rle::packets(&data);
        assert_eq!(packets.last(), Some(&super_rle::Packet::End));
        let mut produced = 0usize;
        for p in &packets {
            match p {
                super_rle::Packet::Literal(bytes) => {
                    assert!((1..=126).contains(&bytes.len()));
                    produced += bytes.len();
                }
                super_rle::Packet::Run { count, .. } => {
                    assert!((1..=128).contains(count));
                    produced += *count as usize;
                }
                super_rle::Packet::PatternCopy { count, offset } => {
                    let offset = offset.get() as usize;
                    assert!(offset <= produced, "offset {offset} with only {produced} bytes out");
                    assert!(offset <= 255);
                    produced += count.get() as usize;
                }
                super_rle::Packet::End => assert_eq!(produced, data.len()),
            }
        }
        // only the final packet may be the end marker
        let ends = packets
            .iter()
            .filter(|p| **p == super_rle::Packet::End)
            .count();
        assert_eq!(ends, 1);
    }
}

#[test]
fn pletter_never_leaks_a_bare_marker() {
    for data in corpus() {
        for p in pletter::packets(&data) {
            match p {
                pletter::Packet::Literal(bytes) => assert!(!bytes.contains(&pletter::MARKER)),
                pletter::Packet::Run { count, value } => {
                    assert!(count.get() >= 3 || value == pletter::MARKER);
                }
            }
        }
    }
}

#[test]
fn bordered_screen_shrinks() {
    // 32x24 room: wall border, floor inside, a pillar every fourth column
    let mut data = Vec::with_capacity(32 * 24);
    for y in 0..24 {
        for x in 0..32 {
            let wall = y == 0 || y == 23 || x == 0 || x == 31;
            let pillar = y % 6 == 3 && x % 4 == 2;
            data.push(if wall { 1 } else if pillar { 9 } else { 5 });
        }
    }
    for codec in CODECS {
        let stream = codec.compress(&data);
        assert!(stream.len() < data.len() / 2, "{codec:?}: {} bytes", stream.len());
    }
}
