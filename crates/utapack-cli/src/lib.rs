//! utapack CLI library.
//!
//! This crate drives a full voicebank build: it loads the configuration,
//! reads every pitch table, plans and composes batches, and writes the
//! packed voicebank into a staged output folder that replaces the previous
//! build only once everything succeeded.

pub mod aux_files;
pub mod commands;
pub mod duplicates;
pub mod error;
pub mod output_dir;
pub mod pipeline;
pub mod validate;

pub use error::PipelineError;
pub use pipeline::{run_pipeline, BatchSummary, PipelineOutput, PipelineRequest, OUTPUT_FOLDER};
pub use validate::{validate_voicebank, PitchReport, ValidationReport};
