//! Masked LSB steganography for PCM WAV containers.
//!
//! Embeds one or more files into the sample data of an uncompressed WAV
//! file by forcing payload bits into the least-significant bits of channel
//! units selected by a cyclic bit mask, optionally derived from a password.
//! Extraction reverses the process; an optional gzip layer compresses the
//! archive before embedding.
//!
//! # Architecture
//!
//! ```text
//! files -> archive (manifest + bytes) -> masked bit channel -> WAV payload
//! ```
//!
//! - [`container`]: byte-exact WAV parsing/serialization with a sequential
//!   channel-unit cursor, tolerant of vendor-specific ancillary chunks
//! - [`mask`]: cyclic `{0,1}` masks and password derivation
//! - [`stego`]: the embedding/extraction protocol and capacity estimation
//! - [`archive`]: multi-file manifest framing and the compression layer
//! - [`detect`]: brute-force mask search over the decode primitives
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use wavhide::archive::{pack, unpack, SourceFile};
//! use wavhide::container::{WavFile, WavParams};
//! use wavhide::mask::Mask;
//!
//! # fn main() -> wavhide::Result<()> {
//! // Build a small in-memory carrier: 16-bit mono PCM, 4096 samples.
//! let params = WavParams {
//!     chunk_size: 36 + 8192,
//!     num_channels: 1,
//!     sample_rate: 44_100,
//!     byte_rate: 88_200,
//!     block_align: 2,
//!     bits_per_sample: 16,
//!     ancillary: Vec::new(),
//!     data_size: 8192,
//! };
//! let mut carrier = WavFile::create(Cursor::new(Vec::new()), params)?;
//! carrier.write(&vec![0u8; 8192])?;
//! let carrier_bytes = carrier.into_inner().into_inner();
//!
//! // Embed a file under a sparse mask, then recover it.
//! let mask: Mask = "1001".parse()?;
//! let files = vec![SourceFile::new("hello.txt", b"hi there".to_vec())];
//! let mut packaged = Vec::new();
//! pack(Cursor::new(&carrier_bytes[..]), &mut packaged, &files, &mask, false, None)?;
//!
//! let extracted = unpack(Cursor::new(&packaged[..]), &mask, false)?;
//! assert_eq!(extracted[0].name, "hello.txt");
//! assert_eq!(extracted[0].data, b"hi there");
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod config;
pub mod container;
pub mod detect;
pub mod error;
pub mod mask;
pub mod stego;

pub use container::{WavFile, WavParams};
pub use error::{Error, Result};
pub use mask::Mask;
