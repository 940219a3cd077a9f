//! Error types for wavhide operations.

use thiserror::Error;

/// Result type alias for wavhide operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while embedding or extracting data.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error on the carrier or payload streams.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The carrier is not a PCM WAV container.
    #[error("unsupported file format: expected {expected}, found {found}")]
    Format {
        /// The marker or field that was expected.
        expected: &'static str,
        /// The offending bytes, printable or hex-encoded.
        found: String,
    },

    /// A read was attempted on a write-mode container or vice versa.
    #[error("unsupported operation: container is {0}")]
    UnsupportedOperation(&'static str),

    /// The archive does not fit into the carrier under the given mask.
    #[error("too large data: need {needed} bytes, storage holds {available} bytes")]
    TooLargeData { needed: u64, available: u64 },

    /// Extraction produced no valid archive (wrong mask/password or corrupt data).
    #[error("decoding failed: try another mask or password")]
    Decoding,

    /// The mask is unusable (empty, non-binary symbols, or no `1` positions).
    #[error("invalid mask: {0}")]
    InvalidMask(String),

    /// Lookup of a container parameter that does not exist.
    #[error("parameter \"{0}\" does not exist")]
    ParamNotFound(String),

    /// The serialized manifest exceeds the one-byte length prefix.
    #[error("manifest is {len} bytes, the length prefix caps it at 255")]
    ManifestTooLarge { len: usize },

    /// Manifest serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Render marker bytes for diagnostics: as-is when printable ASCII,
/// hex-encoded otherwise.
pub(crate) fn display_marker(bytes: &[u8]) -> String {
    if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        format!("0x{}", hex::encode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_marker_printable() {
        assert_eq!(display_marker(b"RIFF"), "RIFF");
        assert_eq!(display_marker(b"fmt "), "fmt ");
    }

    #[test]
    fn test_display_marker_binary() {
        assert_eq!(display_marker(&[0x00, 0xff]), "0x00ff");
    }
}
