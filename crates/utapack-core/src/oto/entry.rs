//! A single OTO table row.

use std::path::{Path, PathBuf};

use crate::coords::Cutoff;
use crate::precision::canonical;

/// One voiced sample: where it lives and how it is timed.
#[derive(Debug, Clone, PartialEq)]
pub struct OtoEntry {
    /// Source clip, relative to the table until rebased.
    pub source: PathBuf,
    /// Sample label.
    pub alias: String,
    /// Start of the usable region, in milliseconds from clip start.
    pub offset: f64,
    /// Fixed (consonant) region length.
    pub consonant: f64,
    /// End of the usable region, in either convention.
    pub cutoff: Cutoff,
    /// Preutterance.
    pub preutterance: f64,
    /// Overlap.
    pub overlap: f64,
}

impl OtoEntry {
    /// Returns a copy of this entry whose source is joined onto `dir`.
    pub fn rebased(mut self, dir: &Path) -> Self {
        self.source = dir.join(&self.source);
        self
    }

    /// Rewrites a from-end cutoff into the from-offset convention.
    ///
    /// Needs the clip duration, since a from-end cutoff cannot be
    /// interpreted without it. From-offset cutoffs are left untouched.
    pub fn relativize(&mut self, clip_ms: f64) {
        if self.cutoff.is_from_end() {
            let end = self.cutoff.resolve_end(self.offset, clip_ms);
            self.cutoff = Cutoff::from_length(canonical(end - self.offset));
        }
    }

    /// Returns the entry placed at new container coordinates.
    ///
    /// Alias, consonant, preutterance and overlap are carried over unchanged.
    pub fn relocated(&self, source: impl Into<PathBuf>, offset: f64, cutoff: Cutoff) -> Self {
        Self {
            source: source.into(),
            alias: self.alias.clone(),
            offset: canonical(offset),
            consonant: self.consonant,
            cutoff,
            preutterance: self.preutterance,
            overlap: self.overlap,
        }
    }
}
