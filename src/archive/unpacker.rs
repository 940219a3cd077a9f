//! Extracting archives back out of a carrier.

use crate::archive::manifest::Manifest;
use crate::config::COMPRESSED_LEN_BYTES;
use crate::container::WavFile;
use crate::error::{Error, Result};
use crate::mask::Mask;
use crate::stego::extract;
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::{debug, info};

/// One file recovered from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// Parse the compressed-frame length field.
///
/// Only the low eight of the [`COMPRESSED_LEN_BYTES`] bytes may be nonzero;
/// anything else means the bits under this mask are not an archive.
fn parse_compressed_len(field: &[u8]) -> Result<u64> {
    if field.len() != COMPRESSED_LEN_BYTES || field[8..].iter().any(|b| *b != 0) {
        return Err(Error::Decoding);
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&field[..8]);
    Ok(u64::from_le_bytes(low))
}

fn decompress(blob: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(blob);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(|_| Error::Decoding)?;
    Ok(out)
}

/// Split a decompressed archive body into its files.
fn split_archive(body: &[u8]) -> Result<Vec<ExtractedFile>> {
    let (manifest, mut offset) = Manifest::from_prefixed(body)?;
    let mut files = Vec::with_capacity(manifest.len());
    for entry in manifest.entries() {
        let end = offset
            .checked_add(entry.size as usize)
            .filter(|end| *end <= body.len())
            .ok_or(Error::Decoding)?;
        files.push(ExtractedFile {
            name: entry.name.clone(),
            data: body[offset..end].to_vec(),
        });
        offset = end;
    }
    Ok(files)
}

fn unpack_plain<R: Read>(wav: &mut WavFile<R>, mask: &Mask) -> Result<Vec<ExtractedFile>> {
    let manifest_len = extract(wav, mask, 1)?[0] as usize;
    let body = extract(wav, mask, manifest_len)?;
    let manifest = Manifest::from_body(&body)?;
    debug!(files = manifest.len(), "manifest extracted");

    let mut files = Vec::with_capacity(manifest.len());
    for entry in manifest.entries() {
        let data = extract(wav, mask, entry.size as usize)?;
        files.push(ExtractedFile {
            name: entry.name.clone(),
            data,
        });
    }
    Ok(files)
}

fn unpack_compressed<R: Read>(
    wav: &mut WavFile<R>,
    mask: &Mask,
) -> Result<Vec<ExtractedFile>> {
    let field = extract(wav, mask, COMPRESSED_LEN_BYTES)?;
    let blob_len = parse_compressed_len(&field)?;
    let blob = extract(wav, mask, blob_len as usize)?;
    let body = decompress(&blob)?;
    debug!(compressed = blob.len(), raw = body.len(), "archive inflated");
    split_archive(&body)
}

/// Recover all embedded files from the carrier read via `input`.
///
/// Files are returned in memory, in manifest order; nothing touches the
/// filesystem, so a decode failure leaves no partial artifacts. A wrong
/// mask or password surfaces as [`Error::Decoding`].
pub fn unpack<R: Read>(input: R, mask: &Mask, compress: bool) -> Result<Vec<ExtractedFile>> {
    let mut wav = WavFile::open(input)?;
    let files = if compress {
        unpack_compressed(&mut wav, mask)?
    } else {
        unpack_plain(&mut wav, mask)?
    };
    info!(files = files.len(), "files extracted");
    Ok(files)
}

/// Read just the manifest of an embedded archive.
pub fn list<R: Read>(input: R, mask: &Mask, compress: bool) -> Result<Manifest> {
    let mut wav = WavFile::open(input)?;
    if compress {
        let field = extract(&mut wav, mask, COMPRESSED_LEN_BYTES)?;
        let blob_len = parse_compressed_len(&field)?;
        let blob = extract(&mut wav, mask, blob_len as usize)?;
        let body = decompress(&blob)?;
        let (manifest, _) = Manifest::from_prefixed(&body)?;
        Ok(manifest)
    } else {
        let manifest_len = extract(&mut wav, mask, 1)?[0] as usize;
        let body = extract(&mut wav, mask, manifest_len)?;
        Manifest::from_body(&body)
    }
}
