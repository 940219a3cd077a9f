//! Embedding payload bits into mask-selected channel units.

use crate::container::WavFile;
use crate::error::Result;
use crate::mask::Mask;
use rand::RngCore;
use std::io::{Read, Write};
use tracing::{debug, info};

/// Units copied per batch when passing the carrier tail through.
const COPY_CHUNK_UNITS: u64 = 4096;

fn set_lsb(byte: u8, on: bool) -> u8 {
    if on {
        byte | 1
    } else {
        byte & !1
    }
}

/// Embed `payload` into `src`, writing the stego container to `dst`.
///
/// Bits are taken most-significant-first within each byte. One source unit
/// is consumed per mask step; only a mask-`1` unit receives the current bit
/// (forced into the LSB of its first byte). Skipped units pass through
/// unchanged, or with a randomized LSB when a `noise` generator is supplied.
/// After the last payload bit every remaining unit is copied through, so the
/// output container has the same unit count as the input.
///
/// The mask phase is read from the source's consumed-unit counter, never
/// from local state.
pub fn embed<R: Read, W: Write>(
    src: &mut WavFile<R>,
    dst: &mut WavFile<W>,
    payload: &[u8],
    mask: &Mask,
    mut noise: Option<&mut dyn RngCore>,
) -> Result<()> {
    info!(payload_len = payload.len(), mask = %mask, "embedding payload");

    for &byte in payload {
        for shift in (0..8).rev() {
            let bit = byte >> shift & 1 == 1;
            loop {
                let carries = mask.bit(src.units_read());
                let mut unit = src.read_channel_units(1)?;
                if carries {
                    unit[0] = set_lsb(unit[0], bit);
                    dst.write(&unit)?;
                    break;
                }
                if let Some(rng) = noise.as_deref_mut() {
                    unit[0] = set_lsb(unit[0], rng.next_u32() & 1 == 1);
                }
                dst.write(&unit)?;
            }
        }
    }

    let total = src.channel_units();
    debug!(
        consumed = src.units_read(),
        remaining = total - src.units_read(),
        "payload embedded, copying carrier tail"
    );
    while src.units_read() < total {
        let count = (total - src.units_read()).min(COPY_CHUNK_UNITS);
        let tail = src.read_channel_units(count)?;
        dst.write(&tail)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stego::extract;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn carrier(payload_len: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + payload_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&8_000u32.to_le_bytes());
        out.extend_from_slice(&8_000u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // 1-byte units
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&payload_len.to_le_bytes());
        out.extend((0..payload_len).map(|i| (i % 251) as u8));
        out
    }

    fn run_embed(
        carrier_bytes: &[u8],
        payload: &[u8],
        mask: &Mask,
        noise: Option<&mut dyn RngCore>,
    ) -> Vec<u8> {
        let mut src = WavFile::open(Cursor::new(carrier_bytes)).expect("Failed to open src");
        let mut dst = WavFile::create(Cursor::new(Vec::new()), src.params().clone())
            .expect("Failed to create dst");
        embed(&mut src, &mut dst, payload, mask, noise).expect("Failed to embed");
        dst.into_inner().into_inner()
    }

    #[test]
    fn test_set_lsb() {
        assert_eq!(set_lsb(0b1010_1010, true), 0b1010_1011);
        assert_eq!(set_lsb(0b1010_1011, false), 0b1010_1010);
        assert_eq!(set_lsb(0, false), 0);
        assert_eq!(set_lsb(0xff, true), 0xff);
    }

    #[test]
    fn test_output_length_matches_input() {
        let bytes = carrier(4096);
        for mask in ["1", "10", "1001"] {
            let mask: Mask = mask.parse().unwrap();
            let out = run_embed(&bytes, b"hidden", &mask, None);
            assert_eq!(out.len(), bytes.len());
        }
    }

    #[test]
    fn test_only_lsbs_change_without_noise() {
        let bytes = carrier(4096);
        let mask: Mask = "1001".parse().unwrap();
        let out = run_embed(&bytes, b"hidden", &mask, None);

        assert_eq!(out[..44], bytes[..44]);
        for (a, b) in out[44..].iter().zip(&bytes[44..]) {
            assert_eq!(a & !1, b & !1);
        }
    }

    #[test]
    fn test_skipped_units_untouched_without_noise() {
        let bytes = carrier(4096);
        let mask: Mask = "10".parse().unwrap();
        let out = run_embed(&bytes, b"x", &mask, None);

        // Odd phases are mask-0 slots; they must be byte-identical.
        for i in (1..4096).step_by(2) {
            assert_eq!(out[44 + i], bytes[44 + i]);
        }
    }

    #[test]
    fn test_seeded_noise_is_deterministic() {
        let bytes = carrier(4096);
        let mask: Mask = "10".parse().unwrap();

        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);
        let out1 = run_embed(&bytes, b"abc", &mask, Some(&mut rng1));
        let out2 = run_embed(&bytes, b"abc", &mask, Some(&mut rng2));
        assert_eq!(out1, out2);
    }

    #[test]
    fn test_noise_only_touches_lsbs_of_skipped_units() {
        let bytes = carrier(4096);
        let mask: Mask = "10".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let out = run_embed(&bytes, b"abc", &mask, Some(&mut rng));

        for (a, b) in out[44..].iter().zip(&bytes[44..]) {
            assert_eq!(a & !1, b & !1);
        }
    }

    #[test]
    fn test_round_trip_with_noise() {
        let bytes = carrier(8192);
        let mask: Mask = "1001".parse().unwrap();
        let payload = b"noise must not clobber payload bits";

        let mut rng = StdRng::seed_from_u64(3);
        let out = run_embed(&bytes, payload, &mask, Some(&mut rng));

        let mut stego = WavFile::open(Cursor::new(out)).expect("Failed to open stego");
        let back = extract(&mut stego, &mask, payload.len()).expect("Failed to extract");
        assert_eq!(back, payload);
    }

    #[test]
    fn test_empty_payload_copies_carrier() {
        let bytes = carrier(1024);
        let mask: Mask = "1".parse().unwrap();
        let out = run_embed(&bytes, b"", &mask, None);
        assert_eq!(out, bytes);
    }
}
