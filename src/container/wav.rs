//! Sequential reader/writer over the WAV container binary layout.

use crate::config::{AUDIO_FORMAT_PCM, CHUNK_ID, DATA_MARK, FORMAT, SUBCHUNK1_ID, SUBCHUNK1_SIZE};
use crate::container::params::WavParams;
use crate::error::{display_marker, Error, Result};
use std::io::{Read, Write};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Read,
    Write,
}

/// Prefix automaton hunting for the `data` marker inside ancillary bytes.
///
/// States are the increasingly long prefixes of the marker. A byte that does
/// not extend the current prefix resets to `Empty` and is not reconsidered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Empty,
    D,
    Da,
    Dat,
    Matched,
}

impl ScanState {
    fn advance(self, byte: u8) -> Self {
        match (self, byte) {
            (ScanState::Empty, b'd') => ScanState::D,
            (ScanState::D, b'a') => ScanState::Da,
            (ScanState::Da, b't') => ScanState::Dat,
            (ScanState::Dat, b'a') => ScanState::Matched,
            _ => ScanState::Empty,
        }
    }
}

/// An open WAV container, either readable or writable.
///
/// Read mode parses the header and positions a sequential cursor at the
/// first payload byte; [`read_channel_units`](WavFile::read_channel_units)
/// advances it and tracks how many units were consumed. Write mode
/// serializes the header up front and appends payload bytes via
/// [`write`](WavFile::write). Calling against the wrong mode fails with
/// [`Error::UnsupportedOperation`].
#[derive(Debug)]
pub struct WavFile<S> {
    stream: S,
    mode: Mode,
    params: WavParams,
    units_read: u64,
    bytes_written: u64,
}

impl<S: Read> WavFile<S> {
    /// Parse the container header from `stream` and open it for reading.
    pub fn open(mut stream: S) -> Result<Self> {
        let params = read_header(&mut stream)?;
        info!(
            channels = params.num_channels,
            sample_rate = params.sample_rate,
            data_size = params.data_size,
            "wav container parsed"
        );
        Ok(Self {
            stream,
            mode: Mode::Read,
            params,
            units_read: 0,
            bytes_written: 0,
        })
    }

    /// Read `count` channel units, advancing the cursor.
    ///
    /// Consumes `count * block_align / num_channels` bytes and adds `count`
    /// to the resumable consumed-unit counter.
    pub fn read_channel_units(&mut self, count: u64) -> Result<Vec<u8>> {
        if self.mode != Mode::Read {
            return Err(Error::UnsupportedOperation("not readable"));
        }
        let byte_count =
            count * self.params.block_align as u64 / self.params.num_channels as u64;
        let mut buf = vec![0u8; byte_count as usize];
        self.stream.read_exact(&mut buf)?;
        self.units_read += count;
        Ok(buf)
    }
}

impl<S: Write> WavFile<S> {
    /// Serialize the header for `params` to `stream` and open it for writing.
    pub fn create(mut stream: S, params: WavParams) -> Result<Self> {
        params.validate()?;
        write_header(&mut stream, &params)?;
        debug!(data_size = params.data_size, "wav header written");
        Ok(Self {
            stream,
            mode: Mode::Write,
            params,
            units_read: 0,
            bytes_written: 0,
        })
    }

    /// Append payload bytes, advancing the written-size counter.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        if self.mode != Mode::Write {
            return Err(Error::UnsupportedOperation("not writable"));
        }
        self.stream.write_all(data)?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }
}

impl<S> WavFile<S> {
    /// The container's format parameters.
    pub fn params(&self) -> &WavParams {
        &self.params
    }

    /// Channel units consumed so far (read mode); the mask phase source.
    pub fn units_read(&self) -> u64 {
        self.units_read
    }

    /// Payload bytes appended so far (write mode).
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Total channel units in the sample-data region.
    pub fn channel_units(&self) -> u64 {
        self.params.channel_units()
    }

    /// Consume the container, returning the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

fn read_u16<R: Read>(r: &mut R) -> Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_tag<R: Read>(r: &mut R) -> Result<[u8; 4]> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

fn expect_tag<R: Read>(r: &mut R, expected: [u8; 4], name: &'static str) -> Result<()> {
    let tag = read_tag(r)?;
    if tag != expected {
        warn!(marker = name, "unsupported format marker");
        return Err(Error::Format {
            expected: name,
            found: display_marker(&tag),
        });
    }
    Ok(())
}

fn read_header<R: Read>(r: &mut R) -> Result<WavParams> {
    expect_tag(r, CHUNK_ID, "RIFF")?;
    let chunk_size = read_u32(r)?;
    expect_tag(r, FORMAT, "WAVE")?;
    expect_tag(r, SUBCHUNK1_ID, "fmt ")?;
    let subchunk1_size = read_u32(r)?;
    if subchunk1_size != SUBCHUNK1_SIZE {
        return Err(Error::Format {
            expected: "format sub-block size 16",
            found: subchunk1_size.to_string(),
        });
    }
    let audio_format = read_u16(r)?;
    if audio_format != AUDIO_FORMAT_PCM {
        return Err(Error::Format {
            expected: "PCM audio format 1",
            found: audio_format.to_string(),
        });
    }

    let num_channels = read_u16(r)?;
    let sample_rate = read_u32(r)?;
    let byte_rate = read_u32(r)?;
    let block_align = read_u16(r)?;
    let bits_per_sample = read_u16(r)?;
    let ancillary = scan_ancillary(r)?;
    let data_size = read_u32(r)?;

    let params = WavParams {
        chunk_size,
        num_channels,
        sample_rate,
        byte_rate,
        block_align,
        bits_per_sample,
        ancillary,
        data_size,
    };
    params.validate()?;
    Ok(params)
}

/// Collect bytes up to the `data` marker.
///
/// The first four bytes are taken as a whole: when they are the marker
/// itself, there are no ancillary bytes. Otherwise they seed the accumulator
/// and the automaton scans forward byte by byte. On a match the three
/// accumulated bytes of the marker's trailing overlap are dropped, leaving
/// exactly the bytes that precede the marker.
fn scan_ancillary<R: Read>(r: &mut R) -> Result<Vec<u8>> {
    let mark = read_tag(r)?;
    if mark == DATA_MARK {
        return Ok(Vec::new());
    }
    warn!("ancillary bytes found before the data marker");
    let mut ancillary = mark.to_vec();
    let mut state = ScanState::Empty;
    loop {
        let mut byte = [0u8; 1];
        r.read_exact(&mut byte)?;
        state = state.advance(byte[0]);
        if state == ScanState::Matched {
            ancillary.truncate(ancillary.len() - 3);
            debug!(len = ancillary.len(), "ancillary bytes preserved");
            return Ok(ancillary);
        }
        ancillary.push(byte[0]);
    }
}

fn write_header<W: Write>(w: &mut W, params: &WavParams) -> Result<()> {
    w.write_all(&CHUNK_ID)?;
    w.write_all(&params.chunk_size.to_le_bytes())?;
    w.write_all(&FORMAT)?;
    w.write_all(&SUBCHUNK1_ID)?;
    w.write_all(&SUBCHUNK1_SIZE.to_le_bytes())?;
    w.write_all(&AUDIO_FORMAT_PCM.to_le_bytes())?;
    w.write_all(&params.num_channels.to_le_bytes())?;
    w.write_all(&params.sample_rate.to_le_bytes())?;
    w.write_all(&params.byte_rate.to_le_bytes())?;
    w.write_all(&params.block_align.to_le_bytes())?;
    w.write_all(&params.bits_per_sample.to_le_bytes())?;
    w.write_all(&params.ancillary)?;
    w.write_all(&DATA_MARK)?;
    w.write_all(&params.data_size.to_le_bytes())?;
    Ok(())
}
