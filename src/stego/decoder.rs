//! Extracting payload bytes from mask-selected channel units.

use crate::container::WavFile;
use crate::error::Result;
use crate::mask::Mask;
use std::io::Read;
use tracing::info;

/// Upper bound on the bytes reserved up front for a single extraction.
const RESERVE_LIMIT: usize = 1 << 16;

/// Extract `count` payload bytes from `src`.
///
/// The mask phase aligns to the source's consumed-unit counter, so repeated
/// calls against the same open container compose: extracting `n` then `m`
/// bytes equals extracting `n + m` bytes from a fresh container. Mask-`1`
/// units contribute `unit[0] & 1`; mask-`0` units are consumed and
/// discarded. Bits accumulate most-significant-first.
pub fn extract<R: Read>(src: &mut WavFile<R>, mask: &Mask, count: usize) -> Result<Vec<u8>> {
    info!(count, mask = %mask, "extracting payload");

    let mut out = Vec::with_capacity(count.min(RESERVE_LIMIT));
    let mut acc = 0u8;
    let mut filled = 0u8;
    while out.len() < count {
        let carries = mask.bit(src.units_read());
        let unit = src.read_channel_units(1)?;
        if carries {
            acc = acc << 1 | unit[0] & 1;
            filled += 1;
            if filled == 8 {
                out.push(acc);
                acc = 0;
                filled = 0;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stego::embed;
    use std::io::Cursor;

    fn carrier(payload_len: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + payload_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8_000u32.to_le_bytes());
        out.extend_from_slice(&8_000u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&payload_len.to_le_bytes());
        out.extend((0..payload_len).map(|i| (i * 13 % 253) as u8));
        out
    }

    fn stego_bytes(payload: &[u8], mask: &Mask, carrier_len: u32) -> Vec<u8> {
        let mut src =
            WavFile::open(Cursor::new(carrier(carrier_len))).expect("Failed to open src");
        let mut dst = WavFile::create(Cursor::new(Vec::new()), src.params().clone())
            .expect("Failed to create dst");
        embed(&mut src, &mut dst, payload, mask, None).expect("Failed to embed");
        dst.into_inner().into_inner()
    }

    #[test]
    fn test_round_trip_example_mask() {
        // Mask 1001, no noise, 100 pseudo-random payload bytes.
        let payload: Vec<u8> = (0u32..100).map(|i| (i * 37 % 256) as u8).collect();
        let mask: Mask = "1001".parse().unwrap();
        let out = stego_bytes(&payload, &mask, 8192);

        let mut stego = WavFile::open(Cursor::new(out)).expect("Failed to open stego");
        let back = extract(&mut stego, &mask, payload.len()).expect("Failed to extract");
        assert_eq!(back, payload);
    }

    #[test]
    fn test_round_trip_dense_mask() {
        let payload = b"every unit carries one bit";
        let mask: Mask = "1".parse().unwrap();
        let out = stego_bytes(payload, &mask, 2048);

        let mut stego = WavFile::open(Cursor::new(out)).expect("Failed to open stego");
        let back = extract(&mut stego, &mask, payload.len()).expect("Failed to extract");
        assert_eq!(back, payload);
    }

    #[test]
    fn test_additivity_across_calls() {
        let payload = b"split extraction must align the mask phase";
        let mask: Mask = "110".parse().unwrap();
        let out = stego_bytes(payload, &mask, 4096);

        let mut whole = WavFile::open(Cursor::new(out.clone())).expect("Failed to open");
        let all = extract(&mut whole, &mask, payload.len()).expect("Failed to extract");

        let mut split = WavFile::open(Cursor::new(out)).expect("Failed to open");
        let first = extract(&mut split, &mask, 7).expect("Failed to extract");
        let rest =
            extract(&mut split, &mask, payload.len() - 7).expect("Failed to extract");

        let mut joined = first;
        joined.extend(rest);
        assert_eq!(joined, all);
        assert_eq!(joined, payload);
    }

    #[test]
    fn test_zero_count() {
        let mask: Mask = "1".parse().unwrap();
        let mut wav =
            WavFile::open(Cursor::new(carrier(64))).expect("Failed to open carrier");
        let out = extract(&mut wav, &mask, 0).expect("Failed to extract");
        assert!(out.is_empty());
        assert_eq!(wav.units_read(), 0);
    }

    #[test]
    fn test_exhausted_carrier_errors() {
        let mask: Mask = "1".parse().unwrap();
        let mut wav =
            WavFile::open(Cursor::new(carrier(64))).expect("Failed to open carrier");
        // 64 units hold 8 bytes; asking for more runs off the payload region.
        assert!(extract(&mut wav, &mask, 64).is_err());
    }
}
