//! Audio Module
//!
//! RIFF/WAVE header construction, PCM to WAV conversion, and read-back inspection
//! of the produced files.

pub mod wav;
pub mod converter;

pub use wav::{PcmFormat, FormatChunk, DataChunk, WavHeader, WavInfo, HEADER_LEN};
pub use converter::{Converter, ConversionReport, convert, pcm_to_wav_bytes, verify_wav_file, wav_header, write_wav};
