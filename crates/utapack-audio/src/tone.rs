//! Separator tones.
//!
//! A short randomized beep is placed between samples in a batch file so the
//! boundaries are audible when the file is played back. Each tone draws its
//! waveform, pitch, length and volume from the configured [`ToneRange`].

use std::f64::consts::TAU;

use rand::Rng;
use utapack_core::precision::canonical;
use utapack_core::ToneRange;

use crate::clip::{Clip, SAMPLE_RATE};
use crate::level;

/// RMS level every tone is normalized to.
pub const TONE_TARGET_DBFS: f64 = -30.0;

/// Silence placed on both sides of a tone.
pub const TONE_SILENCE_MS: f64 = 50.0;

/// Configured durations are in hundredths of a second.
const DURATION_SCALE: f64 = 100.0;

/// Each fade lasts this fraction of the tone.
const FADE_DIVISOR: f64 = 10.0;

/// Tone waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneWaveform {
    Sine,
    Square,
    Triangle,
}

impl ToneWaveform {
    const ALL: [ToneWaveform; 3] = [ToneWaveform::Sine, ToneWaveform::Square, ToneWaveform::Triangle];

    /// Value of the waveform at `cycles` periods from its start, in [-1, 1].
    fn at(self, cycles: f64) -> f64 {
        match self {
            ToneWaveform::Sine => (TAU * cycles).sin(),
            ToneWaveform::Square => {
                if (TAU * cycles).sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            ToneWaveform::Triangle => 4.0 * (cycles - (cycles + 0.5).floor()).abs() - 1.0,
        }
    }
}

/// Concrete parameters of one tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParams {
    pub waveform: ToneWaveform,
    /// Frequency in Hz.
    pub frequency: u32,
    /// Length of the audible part in seconds.
    pub duration_s: f64,
    /// Linear amplitude before level matching.
    pub volume: f64,
}

impl ToneParams {
    /// Draws tone parameters from `range`.
    ///
    /// Values are drawn in a fixed order (waveform, frequency, duration,
    /// volume) so a seeded RNG always yields the same tones.
    pub fn draw<R: Rng + ?Sized>(range: &ToneRange, rng: &mut R) -> Self {
        let waveform = ToneWaveform::ALL[rng.gen_range(0..ToneWaveform::ALL.len())];
        let frequency = rng.gen_range(range.min_frequency..=range.max_frequency);
        let duration = rng.gen_range(range.min_duration..=range.max_duration);
        let volume = rng.gen_range(range.min_volume..=range.max_volume);

        Self {
            waveform,
            frequency,
            duration_s: canonical(duration) / DURATION_SCALE,
            volume,
        }
    }

    /// Renders the tone with its fades and surrounding silence.
    pub fn render(&self) -> Clip {
        let num_samples = (SAMPLE_RATE as f64 * self.duration_s).floor() as usize;
        let mut samples: Vec<i16> = (0..num_samples)
            .map(|i| {
                let t = i as f64 / SAMPLE_RATE as f64;
                let value = self.waveform.at(t * self.frequency as f64) * self.volume;
                (value.clamp(-1.0, 1.0) * 32767.0).round() as i16
            })
            .collect();

        level::match_level(&mut samples, TONE_TARGET_DBFS);

        let mut body = Clip::from_samples(samples);
        let fade_ms = self.duration_s * 1000.0 / FADE_DIVISOR;
        body.fade_in(fade_ms);
        body.fade_out(fade_ms);

        let mut clip = Clip::silent(TONE_SILENCE_MS);
        clip.append(&body);
        clip.append(&Clip::silent(TONE_SILENCE_MS));
        clip
    }
}

/// Draws and renders one separator tone.
pub fn generate_tone<R: Rng + ?Sized>(range: &ToneRange, rng: &mut R) -> Clip {
    ToneParams::draw(range, rng).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ms_to_frames;
    use crate::rng::create_rng;

    fn fixed(waveform: ToneWaveform) -> ToneParams {
        ToneParams {
            waveform,
            frequency: 441,
            duration_s: 0.02,
            volume: 0.5,
        }
    }

    #[test]
    fn test_waveform_shapes() {
        assert!(ToneWaveform::Sine.at(0.25) > 0.999);
        assert_eq!(ToneWaveform::Square.at(0.25), 1.0);
        assert_eq!(ToneWaveform::Square.at(0.75), -1.0);
        assert_eq!(ToneWaveform::Triangle.at(0.0), -1.0);
        assert_eq!(ToneWaveform::Triangle.at(0.5), 1.0);
        assert_eq!(ToneWaveform::Triangle.at(0.25), 0.0);
    }

    #[test]
    fn test_draw_stays_in_range() {
        let range = ToneRange::default();
        let mut rng = create_rng(1);
        for _ in 0..200 {
            let params = ToneParams::draw(&range, &mut rng);
            assert!((200..=1000).contains(&params.frequency));
            assert!(params.duration_s >= 0.01 && params.duration_s <= 0.04);
            assert!(params.volume >= 0.2 && params.volume <= 0.6);
        }
    }

    #[test]
    fn test_degenerate_range_is_constant() {
        let range = ToneRange {
            min_frequency: 500,
            max_frequency: 500,
            min_duration: 2.5,
            max_duration: 2.5,
            min_volume: 0.3,
            max_volume: 0.3,
        };
        let mut rng = create_rng(9);
        let params = ToneParams::draw(&range, &mut rng);
        assert_eq!(params.frequency, 500);
        assert_eq!(params.duration_s, 0.025);
        assert_eq!(params.volume, 0.3);
    }

    #[test]
    fn test_render_layout() {
        let clip = fixed(ToneWaveform::Sine).render();
        let silence = ms_to_frames(TONE_SILENCE_MS);
        let body = 882;

        assert_eq!(clip.len(), silence * 2 + body);
        assert!(clip.samples()[..silence].iter().all(|&s| s == 0));
        assert!(clip.samples()[silence + body..].iter().all(|&s| s == 0));
        assert_eq!(clip.samples()[silence], 0);
        assert!(clip.samples()[silence + body / 2..silence + body / 2 + 50]
            .iter()
            .any(|&s| s != 0));
    }

    #[test]
    fn test_render_is_level_matched() {
        for waveform in ToneWaveform::ALL {
            let params = ToneParams {
                duration_s: 0.5,
                ..fixed(waveform)
            };
            let clip = params.render();
            let silence = ms_to_frames(TONE_SILENCE_MS);
            let body = &clip.samples()[silence..clip.len() - silence];
            let fade = ms_to_frames(50.0);
            let sustained = &body[fade..body.len() - fade];
            assert!(
                (level::dbfs(sustained) - TONE_TARGET_DBFS).abs() < 0.5,
                "{waveform:?} not level matched"
            );
        }
    }

    #[test]
    fn test_generate_tone_is_deterministic() {
        let range = ToneRange::default();
        let a = generate_tone(&range, &mut create_rng(42));
        let b = generate_tone(&range, &mut create_rng(42));
        assert_eq!(a, b);
    }
}
