//! Structured progress reporting.
//!
//! Components never log through a global; they receive a [`Reporter`] and
//! emit [`Event`]s. [`TracingReporter`] forwards events to `tracing`,
//! [`MemoryReporter`] keeps them for inspection.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::config::DuplicatePolicy;

/// Severity of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Detailed progress.
    Debug,
    /// Normal progress.
    Info,
    /// Something was skipped or degraded.
    Warn,
}

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The RNG was seeded with a fixed value.
    SeedApplied {
        /// Seed value.
        seed: u64,
    },
    /// The configured seed was unusable; randomization is not reproducible.
    SeedFallback {
        /// Configured value.
        raw: String,
    },
    /// Output is being staged.
    OutputStaged {
        /// Final output directory.
        path: PathBuf,
    },
    /// An auxiliary file or folder was copied.
    AuxCopied {
        /// Source path.
        path: PathBuf,
    },
    /// An auxiliary file or folder does not exist.
    AuxMissing {
        /// Source path.
        path: PathBuf,
    },
    /// An auxiliary file or folder could not be copied.
    AuxCopyFailed {
        /// Source path.
        path: PathBuf,
        /// Error text.
        error: String,
    },
    /// A pitch table was parsed.
    PitchParsed {
        /// Pitch directory name.
        pitch: String,
        /// Number of entries read.
        entries: usize,
    },
    /// An alias occurred more than once.
    DuplicateAlias {
        /// The repeated alias.
        alias: String,
        /// Policy applied.
        policy: DuplicatePolicy,
    },
    /// Entries were shuffled.
    Shuffled {
        /// Number of entries.
        entries: usize,
    },
    /// One entry was placed into its batch.
    EntryPlaced {
        /// Batch file name.
        file: String,
        /// Alias.
        alias: String,
        /// New offset in milliseconds.
        offset: f64,
        /// New stored cutoff.
        cutoff: f64,
    },
    /// A batch file was written.
    BatchWritten {
        /// Batch file name.
        file: String,
        /// Entries in the batch.
        entries: usize,
        /// Audio duration in milliseconds.
        duration_ms: f64,
        /// BLAKE3 hash of the PCM data.
        pcm_hash: String,
    },
    /// Duplicates were removed from the table.
    Condensed {
        /// Entries before.
        before: usize,
        /// Entries after.
        after: usize,
    },
    /// The rewritten table was written.
    OtoWritten {
        /// Table path.
        path: PathBuf,
        /// Number of lines.
        entries: usize,
    },
    /// A problem found while validating a voicebank.
    ValidationIssue {
        /// Pitch directory name.
        pitch: String,
        /// Description.
        message: String,
    },
}

impl Event {
    /// Severity of this event.
    pub fn level(&self) -> Level {
        match self {
            Event::SeedFallback { .. }
            | Event::AuxCopyFailed { .. }
            | Event::DuplicateAlias { .. }
            | Event::ValidationIssue { .. } => Level::Warn,
            Event::EntryPlaced { .. } | Event::AuxCopied { .. } | Event::AuxMissing { .. } => {
                Level::Debug
            }
            _ => Level::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::SeedApplied { seed } => write!(f, "applied seed {seed}"),
            Event::SeedFallback { raw } => write!(
                f,
                "unable to apply seed '{raw}', using standard randomization instead"
            ),
            Event::OutputStaged { path } => write!(f, "creating output folder {}", path.display()),
            Event::AuxCopied { path } => write!(f, "copied {}", path.display()),
            Event::AuxMissing { path } => write!(f, "{} not found, skipped", path.display()),
            Event::AuxCopyFailed { path, error } => {
                write!(f, "unable to copy {}: {error}", path.display())
            }
            Event::PitchParsed { pitch, entries } => {
                write!(f, "read {entries} entries from pitch '{pitch}'")
            }
            Event::DuplicateAlias { alias, policy } => {
                write!(f, "duplicate alias '{alias}' ({policy:?})")
            }
            Event::Shuffled { entries } => write!(f, "shuffled {entries} entries"),
            Event::EntryPlaced {
                file,
                alias,
                offset,
                cutoff,
            } => write!(f, "placed '{alias}' in {file} at {offset}, cutoff {cutoff}"),
            Event::BatchWritten {
                file,
                entries,
                duration_ms,
                ..
            } => write!(f, "wrote {file} ({entries} entries, {duration_ms:.1} ms)"),
            Event::Condensed { before, after } => {
                write!(f, "condensed oto from {before} to {after} lines")
            }
            Event::OtoWritten { path, entries } => {
                write!(f, "exported {entries} lines to {}", path.display())
            }
            Event::ValidationIssue { pitch, message } => write!(f, "{pitch}: {message}"),
        }
    }
}

/// Receiver for run events.
pub trait Reporter {
    /// Handles one event.
    fn report(&self, event: &Event);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, event: &Event) {
        (**self).report(event)
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &Event) {
        match event {
            Event::SeedApplied { seed } => info!(seed, "applied seed"),
            Event::SeedFallback { raw } => {
                warn!(seed = %raw, "unable to apply seed, using standard randomization instead")
            }
            Event::OutputStaged { path } => {
                info!(path = %path.display(), "creating output folder")
            }
            Event::AuxCopied { path } => debug!(path = %path.display(), "copied"),
            Event::AuxMissing { path } => debug!(path = %path.display(), "not found, skipped"),
            Event::AuxCopyFailed { path, error } => {
                warn!(path = %path.display(), error = %error, "unable to copy")
            }
            Event::PitchParsed { pitch, entries } => {
                info!(pitch = %pitch, entries, "read oto.ini")
            }
            Event::DuplicateAlias { alias, policy } => {
                warn!(alias = %alias, policy = ?policy, "duplicate alias")
            }
            Event::Shuffled { entries } => info!(entries, "shuffled entries"),
            Event::EntryPlaced {
                file,
                alias,
                offset,
                cutoff,
            } => debug!(file = %file, alias = %alias, offset, cutoff, "placed entry"),
            Event::BatchWritten {
                file,
                entries,
                duration_ms,
                pcm_hash,
            } => info!(
                file = %file,
                entries,
                duration_ms,
                pcm_hash = %pcm_hash,
                "wrote batch"
            ),
            Event::Condensed { before, after } => info!(before, after, "condensed oto"),
            Event::OtoWritten { path, entries } => {
                info!(path = %path.display(), entries, "exported oto")
            }
            Event::ValidationIssue { pitch, message } => {
                warn!(pitch = %pitch, "{}", message)
            }
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<Event>>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all events received so far.
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Returns events at or above `level`.
    pub fn at_least(&self, level: Level) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|event| event.level() >= level)
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, event: &Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
