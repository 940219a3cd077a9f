//! Brute-force search for an unknown embedding mask.
//!
//! A pure consumer of the read/decode primitives: candidate masks are tried
//! in turn against fresh readers, and extracted buffers are scored with a
//! UTF-8-decodability heuristic. Decode failures advance the search instead
//! of aborting it.

use crate::container::WavFile;
use crate::error::{Error, Result};
use crate::mask::Mask;
use crate::stego::{extract, storage_size};
use std::io::Read;
use tracing::debug;

/// Largest mask length the exhaustive search will accept.
const MAX_SEARCH_LEN: usize = 24;

/// Buffers examined per candidate before declaring it plausible.
const PROBE_WINDOW: u64 = 32;

/// Candidate masks of a fixed length, densest first, all-zero excluded.
fn candidates(mask_len: usize) -> impl Iterator<Item = Mask> {
    (1..1u64 << mask_len).rev().filter_map(move |bits| {
        let rendered: String = (0..mask_len)
            .rev()
            .map(|i| if bits >> i & 1 == 1 { '1' } else { '0' })
            .collect();
        rendered.parse().ok()
    })
}

/// Score one candidate: extract buffers and count UTF-8 rejections.
fn probe<R: Read>(
    reader: R,
    mask: &Mask,
    max_rejects: usize,
    buffer_size: usize,
) -> Result<bool> {
    let mut wav = WavFile::open(reader)?;
    let capacity = storage_size(wav.params(), mask);
    let chunks = (capacity / buffer_size as u64).min(PROBE_WINDOW);
    if chunks == 0 {
        return Ok(false);
    }

    let mut rejects = 0usize;
    for _ in 0..chunks {
        let buf = extract(&mut wav, mask, buffer_size)?;
        if std::str::from_utf8(&buf).is_err() {
            rejects += 1;
            if rejects >= max_rejects {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Try every mask of exactly `mask_len` positions.
///
/// `open` must yield a fresh reader over the same carrier for each
/// candidate. Returns the first candidate whose probe window stays under
/// `max_rejects` non-UTF-8 buffers of `buffer_size` bytes.
pub fn brute_force_mask<F, R>(
    mut open: F,
    mask_len: usize,
    max_rejects: usize,
    buffer_size: usize,
) -> Result<Option<Mask>>
where
    F: FnMut() -> std::io::Result<R>,
    R: Read,
{
    if mask_len == 0 || mask_len > MAX_SEARCH_LEN {
        return Err(Error::InvalidMask(format!(
            "search length must be between 1 and {MAX_SEARCH_LEN}"
        )));
    }
    if buffer_size == 0 {
        return Err(Error::InvalidMask("probe buffer must be non-empty".to_string()));
    }

    for candidate in candidates(mask_len) {
        match probe(open()?, &candidate, max_rejects, buffer_size) {
            Ok(true) => {
                debug!(mask = %candidate, "plausible mask found");
                return Ok(Some(candidate));
            }
            Ok(false) => {}
            // A candidate that cannot even decode is just a miss.
            Err(Error::Decoding) | Err(Error::Io(_)) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

/// Search mask lengths `1..=max_len` in order.
pub fn search_mask<F, R>(
    mut open: F,
    max_len: usize,
    max_rejects: usize,
    buffer_size: usize,
) -> Result<Option<Mask>>
where
    F: FnMut() -> std::io::Result<R>,
    R: Read,
{
    for mask_len in 1..=max_len {
        if let Some(mask) = brute_force_mask(&mut open, mask_len, max_rejects, buffer_size)? {
            return Ok(Some(mask));
        }
    }
    Ok(None)
}
