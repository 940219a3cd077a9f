//! Multi-file archive framing embedded as the logical payload.

mod manifest;
mod packer;
mod unpacker;

pub use manifest::{FileEntry, Manifest};
pub use packer::{build_archive, compress_archive, pack, SourceFile};
pub use unpacker::{list, unpack, ExtractedFile};
