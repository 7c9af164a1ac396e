//! Handling of aliases that occur more than once across pitch tables.

use std::collections::HashMap;

use utapack_core::{DuplicatePolicy, Event, OtoEntry, Reporter};

use crate::error::PipelineError;

/// Applies `policy` to the combined entry list.
///
/// Order is preserved. Under [`DuplicatePolicy::LastWins`] a repeated alias
/// keeps the position of its first occurrence and takes the contents of
/// its last.
pub fn apply_duplicate_policy<R: Reporter + ?Sized>(
    entries: Vec<OtoEntry>,
    policy: DuplicatePolicy,
    reporter: &R,
) -> Result<Vec<OtoEntry>, PipelineError> {
    if policy == DuplicatePolicy::KeepAll {
        return Ok(entries);
    }

    let mut slots: HashMap<String, usize> = HashMap::with_capacity(entries.len());
    let mut kept: Vec<OtoEntry> = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(&slot) = slots.get(&entry.alias) else {
            slots.insert(entry.alias.clone(), kept.len());
            kept.push(entry);
            continue;
        };

        if policy == DuplicatePolicy::Error {
            return Err(PipelineError::DuplicateAlias { alias: entry.alias });
        }
        reporter.report(&Event::DuplicateAlias {
            alias: entry.alias.clone(),
            policy,
        });
        if policy == DuplicatePolicy::LastWins {
            kept[slot] = entry;
        }
    }

    Ok(kept)
}
