//! Cyclic bit masks selecting which channel units carry payload bits.

use crate::config::MASK_DIGEST_BYTES;
use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// A non-empty cyclic `{0,1}` sequence.
///
/// Position `1` means "this channel unit carries a payload bit", `0` means
/// "skipped (optionally noised)". The mask itself is stateless; callers index
/// it with the count of channel units already consumed, which makes the
/// phase a pure function of stream position.
///
/// Construction guarantees at least one `1` position, so embedding and
/// extraction always make forward progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    bits: Vec<bool>,
}

impl Mask {
    /// Derive a mask from a password.
    ///
    /// The low [`MASK_DIGEST_BYTES`] bytes of the password's SHA-256 digest,
    /// rendered most-significant-bit-first, give a 64-position mask.
    pub fn from_password(password: &str) -> Result<Self> {
        let digest = Sha256::digest(password.as_bytes());
        let tail = &digest[digest.len() - MASK_DIGEST_BYTES..];
        let rendered: String = tail.iter().map(|b| format!("{:08b}", b)).collect();
        rendered.parse()
    }

    /// Number of positions in one cycle.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Never true; masks are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of `1` positions in one cycle.
    pub fn ones(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Fraction of positions equal to `1`.
    pub fn density(&self) -> f64 {
        self.ones() as f64 / self.len() as f64
    }

    /// The mask value at a cyclic phase.
    pub fn bit(&self, phase: u64) -> bool {
        self.bits[(phase % self.bits.len() as u64) as usize]
    }
}

impl FromStr for Mask {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidMask("mask is empty".to_string()));
        }
        let mut bits = Vec::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                other => {
                    return Err(Error::InvalidMask(format!(
                        "mask may contain only 0 and 1, found {other:?}"
                    )))
                }
            }
        }
        if !bits.iter().any(|b| *b) {
            return Err(Error::InvalidMask(
                "mask must contain at least one 1".to_string(),
            ));
        }
        Ok(Self { bits })
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.bits {
            f.write_str(if *b { "1" } else { "0" })?;
        }
        Ok(())
    }
}
