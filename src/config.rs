//! Format constants for the WAV container and the archive framing.

/// RIFF chunk identifier at the start of every WAV file.
pub const CHUNK_ID: [u8; 4] = *b"RIFF";

/// Container format tag following the declared chunk size.
pub const FORMAT: [u8; 4] = *b"WAVE";

/// Format sub-block tag.
pub const SUBCHUNK1_ID: [u8; 4] = *b"fmt ";

/// Fixed size of the PCM format sub-block.
pub const SUBCHUNK1_SIZE: u32 = 16;

/// Audio format code for uncompressed PCM.
pub const AUDIO_FORMAT_PCM: u16 = 1;

/// Marker tag that opens the sample-data region.
pub const DATA_MARK: [u8; 4] = *b"data";

/// Width of the manifest length prefix in the archive layout.
///
/// A single byte, capping the serialized manifest at [`MAX_MANIFEST_LEN`]
/// bytes. Inherited format limit, kept for archive compatibility.
pub const MANIFEST_LEN_BYTES: usize = 1;

/// Largest serialized manifest the one-byte length prefix can describe.
pub const MAX_MANIFEST_LEN: usize = 255;

/// Width of the little-endian length prefix on a compressed archive.
///
/// Far wider than any realistic value requires; kept at the inherited width
/// for archive compatibility. Decoding requires every byte above the low
/// eight to be zero.
pub const COMPRESSED_LEN_BYTES: usize = 27;

/// Number of trailing digest bytes used when deriving a mask from a password.
pub const MASK_DIGEST_BYTES: usize = 8;

/// Mask used when the caller supplies neither a mask nor a password.
pub const DEFAULT_MASK: &str = "1";

/// Diagnostic log file appended to when logging is enabled.
pub const LOG_FILE: &str = "stegano_logs.log";
