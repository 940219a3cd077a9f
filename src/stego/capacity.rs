//! Payload capacity estimation.

use crate::container::WavParams;
use crate::mask::Mask;

/// Maximum payload bytes that fit into a container under a mask.
///
/// One channel unit carries at most one bit, and only mask-selected units
/// carry any, so the capacity is the total unit count divided by eight and
/// scaled by mask density. The header and ancillary region carry no payload
/// and do not enter the computation.
pub fn storage_size(params: &WavParams, mask: &Mask) -> u64 {
    let base = params.channel_units() / 8;
    base * mask.ones() as u64 / mask.len() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::WavParams;

    fn params(data_size: u32) -> WavParams {
        WavParams {
            chunk_size: 36 + data_size,
            num_channels: 2,
            sample_rate: 44_100,
            byte_rate: 176_400,
            block_align: 4,
            bits_per_sample: 16,
            ancillary: Vec::new(),
            data_size,
        }
    }

    #[test]
    fn test_full_density() {
        // 8000 payload bytes, 2-byte units -> 4000 units -> 500 bytes.
        let p = params(8000);
        let mask: Mask = "1".parse().unwrap();
        assert_eq!(storage_size(&p, &mask), 500);
    }

    #[test]
    fn test_density_scaling() {
        let p = params(8000);
        let half: Mask = "10".parse().unwrap();
        let quarter: Mask = "1000".parse().unwrap();
        assert_eq!(storage_size(&p, &half), 250);
        assert_eq!(storage_size(&p, &quarter), 125);
    }

    #[test]
    fn test_monotone_in_density() {
        let p = params(9004);
        let masks = ["0001", "0101", "0111", "1111"];
        let sizes: Vec<u64> = masks
            .iter()
            .map(|m| storage_size(&p, &m.parse().unwrap()))
            .collect();
        for pair in sizes.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_equal_density_different_length() {
        let p = params(8000);
        let a: Mask = "10".parse().unwrap();
        let b: Mask = "1100".parse().unwrap();
        assert_eq!(storage_size(&p, &a), storage_size(&p, &b));
    }
}
