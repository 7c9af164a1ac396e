//! WAV file generation result type.

use crate::clip::{frames_to_ms, Clip, SAMPLE_RATE};

use super::format::WavFormat;
use super::writer::{samples_to_pcm16, write_wav_to_vec};

/// An encoded batch file.
#[derive(Debug)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of PCM data only.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of frames.
    pub num_samples: usize,
}

impl WavResult {
    /// Encodes a clip in the output format.
    pub fn from_clip(clip: &Clip) -> Self {
        let pcm = samples_to_pcm16(clip.samples());
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let wav_data = write_wav_to_vec(&WavFormat::output(), &pcm);

        Self {
            wav_data,
            pcm_hash,
            sample_rate: SAMPLE_RATE,
            num_samples: clip.len(),
        }
    }

    /// Returns the duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        frames_to_ms(self.num_samples)
    }
}
