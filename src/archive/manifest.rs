//! The archive manifest: an ordered list of (name, size) pairs.

use crate::config::MAX_MANIFEST_LEN;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One embedded file's name and byte count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
}

/// Ordered manifest of an archive's contents.
///
/// Order is significant: payload bytes are concatenated and later split in
/// manifest order. The serialized form is a bincode entry list framed by a
/// single length byte, which caps it at [`MAX_MANIFEST_LEN`] bytes, an
/// inherited format limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<FileEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, preserving order.
    pub fn push(&mut self, name: impl Into<String>, size: u64) {
        self.entries.push(FileEntry {
            name: name.into(),
            size,
        });
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to the framed form: one length byte plus the entry list.
    ///
    /// Fails with [`Error::ManifestTooLarge`] when the entry list does not
    /// fit the one-byte prefix.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let body = bincode::serialize(&self.entries)?;
        if body.len() > MAX_MANIFEST_LEN {
            return Err(Error::ManifestTooLarge { len: body.len() });
        }
        let mut out = Vec::with_capacity(1 + body.len());
        out.push(body.len() as u8);
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Parse an unframed entry list, as extracted after the length byte.
    ///
    /// Any structural mismatch means the wrong mask was used; fails with
    /// [`Error::Decoding`].
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let entries: Vec<FileEntry> =
            bincode::deserialize(body).map_err(|_| Error::Decoding)?;
        Ok(Self { entries })
    }

    /// Parse a framed manifest sitting at the start of `data`.
    ///
    /// Returns the manifest and the offset of the first file byte.
    pub fn from_prefixed(data: &[u8]) -> Result<(Self, usize)> {
        let len = *data.first().ok_or(Error::Decoding)? as usize;
        let body = data.get(1..1 + len).ok_or(Error::Decoding)?;
        Ok((Self::from_body(body)?, 1 + len))
    }
}
