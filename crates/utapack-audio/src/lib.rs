//! utapack audio backend
//!
//! Cuts voicebank samples out of their recordings and packs them into
//! batch WAV files.
//!
//! # Overview
//!
//! Every source clip is converted on load to mono, 16-bit, 44.1 kHz. The
//! [`Composer`] takes a planned batch, slices each entry's region out of its
//! clip (with optional padding and fades), separates entries with short
//! randomized tones, and returns the concatenated audio together with the
//! rewritten OTO entries.
//!
//! # Determinism
//!
//! Output bytes depend only on the inputs and the RNG handle passed in. The
//! crate uses PCG32 for all random number generation, and the WAV writer
//! emits no variable metadata, so a fixed seed reproduces identical files.
//!
//! # Example
//!
//! ```
//! use utapack_audio::{create_rng, Clip, ClipMap, ComposeSettings, Composer, WavResult};
//! use utapack_core::{oto::parse, plan_batches, TracingReporter};
//! use std::num::NonZeroUsize;
//!
//! let mut clips = ClipMap::new();
//! clips.insert("ka.wav", Clip::silent(500.0));
//!
//! let entries = parse("ka.wav=ka,100,0,-50,0,0").unwrap();
//! let batches = plan_batches(entries, NonZeroUsize::new(8).unwrap());
//!
//! let mut composer = Composer::new(ComposeSettings::default(), clips, TracingReporter);
//! let composed = composer.compose(&batches[0], &mut create_rng(69420)).unwrap();
//! assert_eq!(composed.entries[0].offset, 0.0);
//!
//! let wav = WavResult::from_clip(&composed.audio);
//! println!("PCM hash: {}", wav.pcm_hash);
//! ```
//!
//! # Crate Structure
//!
//! - [`clip`] - Mono 16-bit sample buffer
//! - [`compose`] - Batch composition
//! - [`fade`] - Linear fade envelopes
//! - [`level`] - RMS level and gain
//! - [`rng`] - Deterministic RNG
//! - [`tone`] - Separator tone synthesis
//! - [`wav`] - WAV reading and deterministic WAV writing

pub mod clip;
pub mod compose;
pub mod error;
pub mod fade;
pub mod level;
pub mod rng;
pub mod tone;
pub mod wav;

// Re-export main types at crate root
pub use clip::{frames_to_ms, ms_to_frames, Clip, SAMPLE_RATE};
pub use compose::{ClipMap, ClipSource, ComposeSettings, ComposedBatch, Composer, WavFileSource};
pub use error::{AudioError, AudioResult};
pub use rng::{base_seed, create_rng};
pub use tone::{generate_tone, ToneParams, ToneWaveform};
pub use wav::{clip_duration_ms, read_clip, write_clip, WavResult};
