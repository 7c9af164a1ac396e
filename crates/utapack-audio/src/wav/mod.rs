//! WAV input and deterministic WAV output.
//!
//! Output files are 16-bit mono PCM with no timestamps or variable metadata,
//! so identical audio always produces identical bytes. The hash of the PCM
//! data identifies a batch's audio in reports and tests.
//!
//! Input files may use any integer or float layout; they are converted to
//! the pipeline's mono 16-bit 44.1 kHz format on load.

mod format;
mod reader;
mod result;
mod writer;


pub use format::WavFormat;
pub use reader::{clip_duration_ms, read_clip};
pub use result::WavResult;
pub use writer::{samples_to_pcm16, write_clip, write_wav, write_wav_to_vec};
