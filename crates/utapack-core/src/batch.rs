//! Partitioning of the entry list into output files.

use std::num::NonZeroUsize;

use crate::oto::OtoEntry;

/// A group of entries packed into one output file.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// 1-based position of the batch; drives the output file name.
    pub index: usize,
    /// Entries in concatenation order.
    pub entries: Vec<OtoEntry>,
}

impl Batch {
    /// Output file name, e.g. `00001.wav`.
    pub fn file_name(&self) -> String {
        batch_file_name(self.index)
    }

    /// Number of entries in the batch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the batch has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Formats the output file name for a 1-based batch index.
pub fn batch_file_name(index: usize) -> String {
    format!("{index:05}.wav")
}

/// Splits entries into consecutive batches of at most `chunk_size`.
///
/// Order is preserved and only the final batch may be shorter.
pub fn plan_batches(entries: Vec<OtoEntry>, chunk_size: NonZeroUsize) -> Vec<Batch> {
    let size = chunk_size.get();
    let mut batches = Vec::with_capacity(entries.len().div_ceil(size));
    let mut iter = entries.into_iter().peekable();

    while iter.peek().is_some() {
        let chunk: Vec<OtoEntry> = iter.by_ref().take(size).collect();
        batches.push(Batch {
            index: batches.len() + 1,
            entries: chunk,
        });
    }

    batches
}
