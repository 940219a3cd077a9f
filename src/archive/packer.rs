//! Building archives and embedding them into a carrier.

use crate::archive::manifest::Manifest;
use crate::config::COMPRESSED_LEN_BYTES;
use crate::container::WavFile;
use crate::error::{Error, Result};
use crate::mask::Mask;
use crate::stego::{embed, storage_size};
use flate2::write::GzEncoder;
use flate2::Compression;
use rand::RngCore;
use std::io::{Read, Write};
use tracing::{info, warn};

/// A file to embed: its archive name and contents.
///
/// The library never opens paths itself; callers read the bytes and pick
/// the stored name.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Assemble the flat archive body: framed manifest plus file contents
/// concatenated in manifest order.
pub fn build_archive(files: &[SourceFile]) -> Result<Vec<u8>> {
    let mut manifest = Manifest::new();
    for file in files {
        manifest.push(file.name.clone(), file.data.len() as u64);
    }
    let mut archive = manifest.to_bytes()?;
    for file in files {
        archive.extend_from_slice(&file.data);
    }
    info!(files = files.len(), len = archive.len(), "archive assembled");
    Ok(archive)
}

/// Wrap an archive body in the compressed frame.
///
/// The gzip blob is prefixed with its length as [`COMPRESSED_LEN_BYTES`]
/// little-endian bytes; everything above the low eight is zero.
pub fn compress_archive(archive: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(archive)?;
    let blob = encoder.finish()?;

    let mut out = vec![0u8; COMPRESSED_LEN_BYTES];
    out[..8].copy_from_slice(&(blob.len() as u64).to_le_bytes());
    out.extend_from_slice(&blob);
    info!(
        raw = archive.len(),
        compressed = blob.len(),
        "archive compressed"
    );
    Ok(out)
}

/// Embed `files` from the carrier read via `input` into `output`.
///
/// The archive is checked against the carrier's capacity before a single
/// output byte is written; an oversized archive fails with
/// [`Error::TooLargeData`] and leaves the output untouched.
pub fn pack<R: Read, W: Write>(
    input: R,
    output: W,
    files: &[SourceFile],
    mask: &Mask,
    compress: bool,
    noise: Option<&mut dyn RngCore>,
) -> Result<()> {
    let mut archive = build_archive(files)?;
    if compress {
        archive = compress_archive(&archive)?;
    }

    let mut src = WavFile::open(input)?;
    let available = storage_size(src.params(), mask);
    if archive.len() as u64 > available {
        warn!(
            needed = archive.len(),
            available, "archive exceeds storage size"
        );
        return Err(Error::TooLargeData {
            needed: archive.len() as u64,
            available,
        });
    }

    let mut dst = WavFile::create(output, src.params().clone())?;
    embed(&mut src, &mut dst, &archive, mask, noise)?;
    info!(files = files.len(), "files embedded");
    Ok(())
}
