//! Error types for pipeline runs.

use std::path::PathBuf;

use thiserror::Error;
use utapack_audio::AudioError;
use utapack_core::{ConfigError, OtoError};

/// Errors that abort a build or validation run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configuration could not be loaded.
    #[error("invalid configuration '{}': {source}", path.display())]
    Config {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: ConfigError,
    },

    /// The source folder does not exist.
    #[error("source folder '{}' does not exist", path.display())]
    SourceDir {
        /// Expected folder.
        path: PathBuf,
    },

    /// A pitch table could not be read from disk.
    #[error("unable to read '{}': {source}", path.display())]
    TableRead {
        /// Table path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A table could not be decoded, parsed, or encoded.
    #[error("'{}': {source}", path.display())]
    Table {
        /// Table path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: OtoError,
    },

    /// Audio could not be read, composed, or written.
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// The output folder could not be prepared or committed.
    #[error("output folder '{}': {source}", path.display())]
    OutputDir {
        /// Folder path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("unable to write '{}': {source}", path.display())]
    Write {
        /// File path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An alias occurs more than once and duplicates are not allowed.
    #[error("alias '{alias}' is defined more than once")]
    DuplicateAlias {
        /// The repeated alias.
        alias: String,
    },
}

impl PipelineError {
    /// Returns a stable error code.
    ///
    /// Wrapped configuration, table, and audio errors keep their own codes.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Config { source, .. } => source.code(),
            PipelineError::Table { source, .. } => source.code(),
            PipelineError::Audio(err) => err.code(),
            PipelineError::SourceDir { .. } => "PIPE_001",
            PipelineError::TableRead { .. } => "PIPE_002",
            PipelineError::OutputDir { .. } => "PIPE_003",
            PipelineError::Write { .. } => "PIPE_004",
            PipelineError::DuplicateAlias { .. } => "PIPE_005",
        }
    }
}
