//! WAV header layout and read-back inspection

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use hound::{SampleFormat, WavReader};
use crate::error::Result;

/// Size of the canonical PCM WAV header written in front of the payload.
pub const HEADER_LEN: usize = 44;

/// RIFF chunk size minus the payload: "WAVE" + fmt chunk (8 + 16) + data chunk header (8).
pub const RIFF_OVERHEAD: u32 = 36;

const FMT_CHUNK_SIZE: u32 = 16;
const WAVE_FORMAT_PCM: u16 = 1;

/// Fixed output format: mono, 16 kHz, 16-bit signed little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
        }
    }
}

impl PcmFormat {
    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample >> 3
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.channels as u32 * self.bytes_per_sample() as u32
    }

    pub fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    /// Playback length of `pcm_len` bytes in seconds.
    pub fn duration_secs(&self, pcm_len: u64) -> f64 {
        pcm_len as f64 / self.byte_rate() as f64
    }

    pub fn to_wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: SampleFormat::Int,
        }
    }
}

impl std::fmt::Display for PcmFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let layout = match self.channels {
            1 => "mono".to_string(),
            2 => "stereo".to_string(),
            n => format!("{} ch", n),
        };
        write!(f, "{} {} Hz {}-bit", layout, self.sample_rate, self.bits_per_sample)
    }
}

/// The `fmt ` subchunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatChunk {
    pub chunk_size: u32,
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FormatChunk {
    pub const ID: [u8; 4] = *b"fmt ";

    pub fn new(format: &PcmFormat) -> Self {
        Self {
            chunk_size: FMT_CHUNK_SIZE,
            audio_format: WAVE_FORMAT_PCM,
            num_channels: format.channels,
            sample_rate: format.sample_rate,
            byte_rate: format.byte_rate(),
            block_align: format.block_align(),
            bits_per_sample: format.bits_per_sample,
        }
    }

    pub const ENCODED_LEN: usize = 24;

    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0..4].copy_from_slice(&Self::ID);
        out[4..8].copy_from_slice(&self.chunk_size.to_le_bytes());
        out[8..10].copy_from_slice(&self.audio_format.to_le_bytes());
        out[10..12].copy_from_slice(&self.num_channels.to_le_bytes());
        out[12..16].copy_from_slice(&self.sample_rate.to_le_bytes());
        out[16..20].copy_from_slice(&self.byte_rate.to_le_bytes());
        out[20..22].copy_from_slice(&self.block_align.to_le_bytes());
        out[22..24].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        out
    }
}

/// Header of the `data` subchunk; the payload follows it verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChunk {
    pub chunk_size: u32,
}

impl DataChunk {
    pub const ID: [u8; 4] = *b"data";

    pub const ENCODED_LEN: usize = 8;

    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0..4].copy_from_slice(&Self::ID);
        out[4..8].copy_from_slice(&self.chunk_size.to_le_bytes());
        out
    }
}

const FMT_OFFSET: usize = 12;
const DATA_OFFSET: usize = FMT_OFFSET + FormatChunk::ENCODED_LEN;
const _: () = assert!(DATA_OFFSET + DataChunk::ENCODED_LEN == HEADER_LEN);

/// Complete 44-byte RIFF/WAVE header for a PCM payload of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub riff_size: u32,
    pub format: FormatChunk,
    pub data: DataChunk,
}

impl WavHeader {
    /// Sizes wrap modulo 2^32 when `pcm_len` does not fit the 32-bit fields.
    pub fn new(format: &PcmFormat, pcm_len: u64) -> Self {
        let data_size = pcm_len as u32;
        Self {
            riff_size: RIFF_OVERHEAD.wrapping_add(data_size),
            format: FormatChunk::new(format),
            data: DataChunk { chunk_size: data_size },
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(b"RIFF");
        out[4..8].copy_from_slice(&self.riff_size.to_le_bytes());
        out[8..FMT_OFFSET].copy_from_slice(b"WAVE");
        out[FMT_OFFSET..DATA_OFFSET].copy_from_slice(&self.format.to_bytes());
        out[DATA_OFFSET..HEADER_LEN].copy_from_slice(&self.data.to_bytes());
        out
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

/// Format details of a WAV file as reported by `hound`.
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub sample_format: SampleFormat,
    pub total_samples: u32,
    pub data_bytes: u64,
    pub duration: f64,
}

impl WavInfo {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = WavReader::new(BufReader::new(file))?;

        let spec = reader.spec();
        let total_samples = reader.len();
        let frames = reader.duration();
        let data_bytes = total_samples as u64 * (spec.bits_per_sample as u64 / 8);
        let duration = if spec.sample_rate == 0 {
            0.0
        } else {
            frames as f64 / spec.sample_rate as f64
        };

        Ok(Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: spec.sample_format,
            total_samples,
            data_bytes,
            duration,
        })
    }

    pub fn matches(&self, format: &PcmFormat) -> bool {
        let spec = format.to_wav_spec();
        self.channels == spec.channels
            && self.sample_rate == spec.sample_rate
            && self.bits_per_sample == spec.bits_per_sample
            && self.sample_format == spec.sample_format
    }
}

impl std::fmt::Display for WavInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ch, {} Hz, {}-bit, {} samples ({:.3}s)",
            self.channels, self.sample_rate, self.bits_per_sample, self.total_samples, self.duration
        )
    }
}
