//! Error types for the audio backend.

use std::path::PathBuf;

use thiserror::Error;
use utapack_core::OtoError;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while reading, composing, or writing audio.
#[derive(Debug, Error)]
pub enum AudioError {
    /// A source clip could not be opened or decoded.
    #[error("unable to read '{}': {source}", path.display())]
    Read {
        /// Clip path.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: hound::Error,
    },

    /// A source clip uses a sample layout that cannot be converted.
    #[error("unsupported audio format in '{}': {message}", path.display())]
    UnsupportedFormat {
        /// Clip path.
        path: PathBuf,
        /// What is unsupported.
        message: String,
    },

    /// An output file could not be written.
    #[error("unable to write '{}': {source}", path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An entry's coordinates do not fit its clip.
    #[error(transparent)]
    Region(#[from] OtoError),
}

impl AudioError {
    /// Creates an unsupported format error.
    pub fn unsupported(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns a stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AudioError::Read { .. } => "AUDIO_001",
            AudioError::UnsupportedFormat { .. } => "AUDIO_002",
            AudioError::Write { .. } => "AUDIO_003",
            AudioError::Region(_) => "AUDIO_004",
        }
    }
}
