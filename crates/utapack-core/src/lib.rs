//! utapack core library
//!
//! Types, text formats, and validation for packing UTAU voicebanks.
//!
//! # Overview
//!
//! A voicebank is a set of pitch directories, each with an OTO table
//! (`oto.ini`) that maps sample aliases to timing coordinates inside short
//! WAV clips. utapack concatenates those clips into a few large files and
//! rewrites the table so every alias still points at the same audio.
//!
//! This crate holds everything that does not touch audio samples:
//!
//! - [`oto`]: OTO entry type, line codec, text encodings and mojibake repair
//! - [`coords`]: cutoff sign conventions and absolute region resolution
//! - [`batch`]: partitioning entries into output files
//! - [`condense`]: removal of duplicate table rows
//! - [`config`]: typed, validated build configuration
//! - [`report`]: structured progress events
//! - [`precision`]: three-decimal canonical numbers
//!
//! # Example
//!
//! ```
//! use utapack_core::coords::resolve_region;
//! use utapack_core::oto::{parse, serialize};
//!
//! let entries = parse("ka.wav=- ka,100,80,200,60,20").unwrap();
//! let region = resolve_region(&entries[0], 1000.0).unwrap();
//! assert_eq!((region.start, region.end), (100.0, 800.0));
//!
//! assert_eq!(
//!     serialize(&entries),
//!     "ka.wav=- ka,100.000,80.000,200.000,60.000,20.000"
//! );
//! ```

pub mod batch;
pub mod condense;
pub mod config;
pub mod coords;
pub mod error;
pub mod oto;
pub mod precision;
pub mod report;

// Re-export commonly used types at the crate root
pub use batch::{batch_file_name, plan_batches, Batch};
pub use condense::{condense, CondenseSummary};
pub use config::{
    Config, DuplicatePolicy, EncodingSettings, FileSettings, RecordingStyle, SeedSetting,
    stays_inside, ToneRange, DEFAULT_CONFIG_FILE,
};
pub use coords::{resolve_region, Cutoff, Region};
pub use error::{ConfigError, OtoError, OtoResult};
pub use oto::{OtoEntry, OTO_FILE_NAME};
pub use report::{Event, Level, MemoryReporter, Reporter, TracingReporter};
