//! Cutoff conventions and absolute region resolution.
//!
//! An OTO cutoff value carries two meanings depending on its sign:
//!
//! - **positive**: distance in milliseconds measured back from the end of the clip
//! - **zero or negative**: its magnitude is the length of the region after `offset`
//!
//! [`Cutoff::from_stored`] classifies a value read from a table,
//! [`Cutoff::to_stored`] turns it back into the signed value written to a table,
//! and [`resolve_region`] converts an entry into absolute clip positions.

use crate::error::{OtoError, OtoResult};
use crate::oto::OtoEntry;
use crate::precision::canonical;

/// A cutoff value tagged with the convention it was written in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutoff {
    /// Milliseconds measured back from the end of the clip (stored positive).
    FromEnd(f64),
    /// Region length in milliseconds after the offset (stored as zero or negative).
    FromOffset(f64),
}

impl Cutoff {
    /// Classifies a signed value read from an OTO table.
    pub fn from_stored(value: f64) -> Self {
        let value = canonical(value);
        if value > 0.0 {
            Cutoff::FromEnd(value)
        } else {
            Cutoff::FromOffset(canonical(-value))
        }
    }

    /// Builds an offset-relative cutoff covering `length_ms` milliseconds.
    pub fn from_length(length_ms: f64) -> Self {
        Cutoff::FromOffset(canonical(length_ms.max(0.0)))
    }

    /// Reconstructs the signed value written to an OTO table.
    pub fn to_stored(self) -> f64 {
        match self {
            Cutoff::FromEnd(distance) => canonical(distance),
            Cutoff::FromOffset(length) => canonical(-length),
        }
    }

    /// Absolute end position for an entry starting at `offset` in a clip of `clip_ms`.
    pub fn resolve_end(self, offset: f64, clip_ms: f64) -> f64 {
        match self {
            Cutoff::FromEnd(distance) => canonical(clip_ms - distance),
            Cutoff::FromOffset(length) => canonical(offset + length),
        }
    }

    /// Returns true when the value was written in the from-end convention.
    pub fn is_from_end(self) -> bool {
        matches!(self, Cutoff::FromEnd(_))
    }
}

/// Absolute `[start, end)` positions inside a source clip, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Start of the usable region.
    pub start: f64,
    /// End of the usable region (exclusive).
    pub end: f64,
}

impl Region {
    /// Length of the region in milliseconds.
    pub fn length(&self) -> f64 {
        canonical(self.end - self.start)
    }
}

/// Resolves an entry's offset and cutoff into absolute clip positions.
///
/// Fails with [`OtoError::InvalidRegion`] unless `0 <= start < end <= clip_ms`.
/// Out-of-range values are reported rather than clamped.
pub fn resolve_region(entry: &OtoEntry, clip_ms: f64) -> OtoResult<Region> {
    let clip_ms = canonical(clip_ms);
    let start = canonical(entry.offset);
    let end = entry.cutoff.resolve_end(start, clip_ms);

    if start < 0.0 || end <= start || end > clip_ms {
        return Err(OtoError::InvalidRegion {
            alias: entry.alias.clone(),
            start,
            end,
            clip_ms,
        });
    }

    Ok(Region { start, end })
}
