//! WAV container parsing and serialization.

mod params;
mod wav;

pub use params::{ParamValue, WavParams};
pub use wav::WavFile;
