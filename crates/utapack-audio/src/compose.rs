//! Segment composer.
//!
//! Builds one batch file: each entry's usable region is cut from its source
//! clip and appended to a growing buffer, optionally with padding, fades and
//! separator tones. The entry is rewritten to point at its new position.
//!
//! With region sharing enabled, an entry whose source region was already
//! placed in the same batch points at that slice instead of adding audio.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rand::Rng;
use utapack_core::precision::canonical;
use utapack_core::{
    resolve_region, Batch, Config, Cutoff, Event, OtoEntry, Region, Reporter, ToneRange,
};

use crate::clip::{frames_to_ms, ms_to_frames, Clip};
use crate::error::{AudioError, AudioResult};
use crate::tone::generate_tone;
use crate::wav::read_clip;

/// Provides decoded source clips by path.
pub trait ClipSource {
    /// Returns the clip stored at `path`.
    fn clip(&mut self, path: &Path) -> AudioResult<&Clip>;
}

/// Reads clips from WAV files on disk.
///
/// The most recently read clip is kept, since consecutive entries usually
/// share a recording.
#[derive(Debug, Default)]
pub struct WavFileSource {
    last: Option<(PathBuf, Clip)>,
}

impl WavFileSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipSource for WavFileSource {
    fn clip(&mut self, path: &Path) -> AudioResult<&Clip> {
        let cached = match self.last.take() {
            Some((cached_path, clip)) if cached_path == path => (cached_path, clip),
            _ => (path.to_path_buf(), read_clip(path)?),
        };
        Ok(&self.last.insert(cached).1)
    }
}

/// Clips held in memory, keyed by path.
#[derive(Debug, Default, Clone)]
pub struct ClipMap {
    clips: HashMap<PathBuf, Clip>,
}

impl ClipMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a clip.
    pub fn insert(&mut self, path: impl Into<PathBuf>, clip: Clip) {
        self.clips.insert(path.into(), clip);
    }
}

impl ClipSource for ClipMap {
    fn clip(&mut self, path: &Path) -> AudioResult<&Clip> {
        self.clips.get(path).ok_or_else(|| AudioError::Read {
            path: path.to_path_buf(),
            source: hound::Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "clip not loaded",
            )),
        })
    }
}

/// How samples are laid out in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComposeSettings {
    /// Extra audio kept on both sides of each region, in milliseconds.
    /// `None` cuts regions exactly.
    pub padding_ms: Option<f64>,
    /// Separator tone ranges; `None` disables tones.
    pub tones: Option<ToneRange>,
    /// Entries cut from the same source region reuse one slice.
    pub share_regions: bool,
}

impl ComposeSettings {
    /// Derives the layout from a validated configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            padding_ms: config
                .uses_padding()
                .then_some(config.encoding.padding_ms),
            tones: config
                .encoding
                .tones_enabled
                .then_some(config.encoding.tones),
            share_regions: config.encoding.optimize,
        }
    }
}

/// Audio and rewritten entries of one batch.
#[derive(Debug, Clone)]
pub struct ComposedBatch {
    /// 1-based batch index.
    pub index: usize,
    /// Output file name.
    pub file_name: String,
    /// Concatenated audio.
    pub audio: Clip,
    /// Entries pointing into `audio`, in batch order.
    pub entries: Vec<OtoEntry>,
}

/// Identity of a resolved source region.
#[derive(Hash, PartialEq, Eq)]
struct RegionKey {
    source: PathBuf,
    start: u64,
    end: u64,
}

impl RegionKey {
    fn of(source: &Path, region: &Region) -> Self {
        Self {
            source: source.to_path_buf(),
            start: region.start.to_bits(),
            end: region.end.to_bits(),
        }
    }
}

/// Concatenates batches of samples into single clips.
pub struct Composer<S, P> {
    settings: ComposeSettings,
    source: S,
    reporter: P,
}

impl<S: ClipSource, P: Reporter> Composer<S, P> {
    pub fn new(settings: ComposeSettings, source: S, reporter: P) -> Self {
        Self {
            settings,
            source,
            reporter,
        }
    }

    /// Composes one batch.
    ///
    /// Tones, when enabled, are drawn from `rng` in placement order: one at
    /// the start of the file and one between consecutive slices.
    ///
    /// Padded slices always carry the full padding on both sides, so each
    /// entry starts one pad after the previous slice ends.
    ///
    /// # Errors
    /// Fails if a clip cannot be read or an entry's region does not fit its
    /// clip.
    pub fn compose<R: Rng + ?Sized>(&mut self, batch: &Batch, rng: &mut R) -> AudioResult<ComposedBatch> {
        let file_name = batch.file_name();
        let mut buffer = Clip::empty();
        let mut entries = Vec::with_capacity(batch.len());
        let mut placed: HashMap<RegionKey, (f64, f64)> = HashMap::new();

        if let Some(range) = &self.settings.tones {
            buffer.append(&generate_tone(range, rng));
        }

        for entry in &batch.entries {
            let clip = self.source.clip(&entry.source)?;
            let region = resolve_region(entry, clip.duration_ms())?;
            let key = RegionKey::of(&entry.source, &region);

            let shared = if self.settings.share_regions {
                placed.get(&key).copied()
            } else {
                None
            };
            let (offset, length) = match shared {
                Some(position) => position,
                None => {
                    let (slice, lead) = match self.settings.padding_ms {
                        None => (clip.slice_ms(region.start, region.end), 0.0),
                        Some(pad) => {
                            let mut slice = clip.slice_padded(region.start, region.end, pad);
                            slice.fade_in(pad / 4.0);
                            slice.fade_out(pad / 4.0);
                            (slice, frames_to_ms(ms_to_frames(pad)))
                        }
                    };

                    if !entries.is_empty() {
                        if let Some(range) = &self.settings.tones {
                            buffer.append(&generate_tone(range, rng));
                        }
                    }
                    let position = (buffer.duration_ms() + lead, slice.duration_ms() - lead);
                    buffer.append(&slice);
                    if self.settings.share_regions {
                        placed.insert(key, position);
                    }
                    position
                }
            };

            let placed_entry = entry.relocated(
                file_name.as_str(),
                offset,
                Cutoff::from_length(canonical(length)),
            );
            self.reporter.report(&Event::EntryPlaced {
                file: file_name.clone(),
                alias: placed_entry.alias.clone(),
                offset: placed_entry.offset,
                cutoff: placed_entry.cutoff.to_stored(),
            });
            entries.push(placed_entry);
        }

        Ok(ComposedBatch {
            index: batch.index,
            file_name,
            audio: buffer,
            entries,
        })
    }
}
