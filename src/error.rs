//! Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Pcm2WavError {
    #[error("failed to open pcm file {}: {source}", .path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create wav file {}: {source}", .path.display())]
    DestinationCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("WAV error: {message}")]
    Wav { message: String },
}

impl Pcm2WavError {
    pub fn source_open<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::SourceOpen { path: path.into(), source }
    }

    pub fn destination_create<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::DestinationCreate { path: path.into(), source }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn wav<S: Into<String>>(msg: S) -> Self { Self::Wav { message: msg.into() } }
}

pub type Result<T> = std::result::Result<T, Pcm2WavError>;

impl From<hound::Error> for Pcm2WavError {
    fn from(err: hound::Error) -> Self { Self::wav(err.to_string()) }
}
