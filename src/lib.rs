//! pcm2wav - Raw PCM to WAV Converter
//!
//! Prepends a canonical 44-byte RIFF/WAVE header (mono, 16 kHz, 16-bit) to a
//! headerless PCM stream and copies the samples through unchanged.

pub mod audio;
pub mod config;
pub mod error;

pub use audio::{convert, verify_wav_file, Converter, ConversionReport, PcmFormat, WavHeader, WavInfo};
pub use config::{Config, Args};
pub use error::{Pcm2WavError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// `RUST_LOG`, when set, takes precedence over the verbose flag.
pub fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .parse_default_env()
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME,
        version: VERSION,
        output_format: PcmFormat::default(),
    }
}

/// Banner shown in verbose mode.
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub output_format: PcmFormat,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - writes {} WAV", self.name, self.version, self.output_format)
    }
}
