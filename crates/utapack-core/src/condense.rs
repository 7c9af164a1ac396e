//! Removal of exact duplicate entries from a finished table.
//!
//! Two entries are duplicates when their trimmed aliases match and their
//! source, offset, consonant, cutoff, preutterance and overlap are identical
//! at table precision. The first occurrence is kept and order is preserved.
//! Entries that differ in any field are never dropped, so the pass is
//! idempotent.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::oto::OtoEntry;
use crate::precision::canonical;

/// Counts before and after condensing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CondenseSummary {
    /// Entries before the pass.
    pub before: usize,
    /// Entries after the pass.
    pub after: usize,
}

impl CondenseSummary {
    /// Number of entries removed.
    pub fn removed(&self) -> usize {
        self.before - self.after
    }
}

#[derive(Hash, PartialEq, Eq)]
struct EntryKey {
    alias: String,
    source: PathBuf,
    timings: [u64; 5],
}

impl EntryKey {
    fn of(entry: &OtoEntry) -> Self {
        let bits = |v: f64| canonical(v).to_bits();
        Self {
            alias: entry.alias.trim().to_string(),
            source: entry.source.clone(),
            timings: [
                bits(entry.offset),
                bits(entry.consonant),
                bits(entry.cutoff.to_stored()),
                bits(entry.preutterance),
                bits(entry.overlap),
            ],
        }
    }
}

/// Drops exact duplicates, keeping the first occurrence of each.
pub fn condense(entries: Vec<OtoEntry>) -> (Vec<OtoEntry>, CondenseSummary) {
    let before = entries.len();
    let mut seen = HashSet::with_capacity(before);
    let kept: Vec<OtoEntry> = entries
        .into_iter()
        .filter(|entry| seen.insert(EntryKey::of(entry)))
        .collect();

    let summary = CondenseSummary {
        before,
        after: kept.len(),
    };
    (kept, summary)
}
