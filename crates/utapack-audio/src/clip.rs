//! Mono 16-bit sample buffer at the output sample rate.
//!
//! Every clip in the pipeline, whether loaded from a voicebank or
//! synthesized, is held in this one format, so buffers can be sliced and
//! appended without conversion. Positions are given in milliseconds and
//! rounded to the nearest frame.

use crate::fade;
use crate::level;

/// Output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Converts milliseconds to a frame count at [`SAMPLE_RATE`].
pub fn ms_to_frames(ms: f64) -> usize {
    if ms <= 0.0 || !ms.is_finite() {
        return 0;
    }
    (ms * SAMPLE_RATE as f64 / 1000.0).round() as usize
}

/// Converts a frame count at [`SAMPLE_RATE`] to milliseconds.
pub fn frames_to_ms(frames: usize) -> f64 {
    frames as f64 * 1000.0 / SAMPLE_RATE as f64
}

/// A mono, 16-bit, 44.1 kHz audio buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clip {
    samples: Vec<i16>,
}

impl Clip {
    /// Wraps samples that are already mono 16-bit at [`SAMPLE_RATE`].
    pub fn from_samples(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    /// Creates an empty clip.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a clip of digital silence.
    pub fn silent(ms: f64) -> Self {
        Self {
            samples: vec![0; ms_to_frames(ms)],
        }
    }

    /// Raw samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the clip has no frames.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        frames_to_ms(self.samples.len())
    }

    /// Frame index for a position in milliseconds, clamped to the clip.
    pub fn frame_at(&self, ms: f64) -> usize {
        ms_to_frames(ms).min(self.samples.len())
    }

    /// Copies `[start_ms, end_ms)`, clamped to the clip.
    pub fn slice_ms(&self, start_ms: f64, end_ms: f64) -> Clip {
        let start = self.frame_at(start_ms);
        let end = self.frame_at(end_ms).max(start);
        Clip::from_samples(self.samples[start..end].to_vec())
    }

    /// Copies `[start_ms, end_ms)` with `pad_ms` of surrounding audio.
    ///
    /// Padding that reaches past either edge of the clip is filled with
    /// silence, so the region always starts exactly one pad into the result.
    pub fn slice_padded(&self, start_ms: f64, end_ms: f64, pad_ms: f64) -> Clip {
        let pad = ms_to_frames(pad_ms);
        let start = self.frame_at(start_ms);
        let end = self.frame_at(end_ms).max(start);
        let from = start.saturating_sub(pad);
        let to = (end + pad).min(self.samples.len());

        let mut samples = Vec::with_capacity(end - start + 2 * pad);
        samples.resize(pad - (start - from), 0);
        samples.extend_from_slice(&self.samples[from..to]);
        samples.resize(samples.len() + pad - (to - end), 0);
        Clip::from_samples(samples)
    }

    /// Appends another clip.
    pub fn append(&mut self, other: &Clip) {
        self.samples.extend_from_slice(&other.samples);
    }

    /// Applies a linear fade-in over the first `ms` milliseconds.
    pub fn fade_in(&mut self, ms: f64) {
        fade::linear_fade_in(&mut self.samples, ms_to_frames(ms));
    }

    /// Applies a linear fade-out over the last `ms` milliseconds.
    pub fn fade_out(&mut self, ms: f64) {
        fade::linear_fade_out(&mut self.samples, ms_to_frames(ms));
    }

    /// RMS level in dB relative to full scale.
    pub fn dbfs(&self) -> f64 {
        level::dbfs(&self.samples)
    }

    /// Changes the level by `db` decibels.
    pub fn apply_gain(&mut self, db: f64) {
        level::apply_gain(&mut self.samples, db);
    }
}
