//! Container parameters shared by the reader and writer sides.

use crate::error::{Error, Result};

/// Format parameters of a PCM WAV container.
///
/// Constructed by [`WavFile::open`](crate::container::WavFile::open) from an
/// input stream, or supplied by the caller when serializing a new container.
/// `ancillary` holds whatever bytes sat between the format sub-block and the
/// `data` marker, preserved verbatim for byte-exact round trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavParams {
    /// Declared RIFF chunk size. Stored, not validated against actual length.
    pub chunk_size: u32,
    /// Number of interleaved channels.
    pub num_channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Declared bytes per second. Not required to equal
    /// `block_align * sample_rate`.
    pub byte_rate: u32,
    /// Bytes per multi-channel sample frame.
    pub block_align: u16,
    /// Bits per single-channel sample.
    pub bits_per_sample: u16,
    /// Vendor-specific bytes between the format sub-block and the `data`
    /// marker, opaque and preserved as-is.
    pub ancillary: Vec<u8>,
    /// Declared size of the sample-data region in bytes.
    pub data_size: u32,
}

/// Value returned by a by-name parameter lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamValue<'a> {
    Int(u64),
    Bytes(&'a [u8]),
}

impl WavParams {
    /// Reject geometries that would divide by zero in unit arithmetic.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.block_align == 0 {
            return Err(Error::Format {
                expected: "non-zero block align",
                found: "0".to_string(),
            });
        }
        if self.num_channels == 0 {
            return Err(Error::Format {
                expected: "non-zero channel count",
                found: "0".to_string(),
            });
        }
        if self.block_align / self.num_channels == 0 {
            return Err(Error::Format {
                expected: "block align covering every channel",
                found: format!(
                    "block align {} for {} channels",
                    self.block_align, self.num_channels
                ),
            });
        }
        Ok(())
    }

    /// Size of one channel unit in bytes.
    pub fn unit_size(&self) -> u64 {
        self.block_align as u64 / self.num_channels as u64
    }

    /// Total number of channel units in the sample-data region.
    pub fn channel_units(&self) -> u64 {
        self.num_channels as u64 * self.data_size as u64 / self.block_align as u64
    }

    /// Look up a parameter by name.
    ///
    /// Unknown names fail with [`Error::ParamNotFound`].
    pub fn param(&self, name: &str) -> Result<ParamValue<'_>> {
        match name {
            "chunk_size" => Ok(ParamValue::Int(self.chunk_size as u64)),
            "num_channels" => Ok(ParamValue::Int(self.num_channels as u64)),
            "sample_rate" => Ok(ParamValue::Int(self.sample_rate as u64)),
            "byte_rate" => Ok(ParamValue::Int(self.byte_rate as u64)),
            "block_align" => Ok(ParamValue::Int(self.block_align as u64)),
            "bits_per_sample" => Ok(ParamValue::Int(self.bits_per_sample as u64)),
            "ancillary" => Ok(ParamValue::Bytes(&self.ancillary)),
            "data_size" => Ok(ParamValue::Int(self.data_size as u64)),
            _ => Err(Error::ParamNotFound(name.to_string())),
        }
    }
}
