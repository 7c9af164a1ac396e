//! Test fixture utilities for creating synthetic voicebanks.

use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use tempfile::TempDir;

/// A voicebank folder on disk.
pub struct VoicebankFixture {
    pub root: TempDir,
}

impl Default for VoicebankFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl VoicebankFixture {
    /// Create a new empty voicebank.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        Self { root }
    }

    /// Get the voicebank root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Default output folder for a configuration named `name`.
    pub fn output_dir(&self, name: &str) -> PathBuf {
        self.path().join("UTAPackOutput").join(name)
    }

    /// Write the configuration file.
    pub fn config(&self, yaml: &str) -> &Self {
        fs::write(self.path().join("utapack_config.yaml"), yaml).expect("Failed to write config");
        self
    }

    /// Write an `oto.ini` as UTF-8 into `pitch` (use "." for the root).
    pub fn oto(&self, pitch: &str, text: &str) -> &Self {
        self.oto_bytes(pitch, text.as_bytes())
    }

    /// Write raw `oto.ini` bytes into `pitch`.
    pub fn oto_bytes(&self, pitch: &str, bytes: &[u8]) -> &Self {
        let dir = self.path().join(pitch);
        fs::create_dir_all(&dir).expect("Failed to create pitch dir");
        fs::write(dir.join("oto.ini"), bytes).expect("Failed to write oto.ini");
        self
    }

    /// Write a 16-bit mono 44.1 kHz clip of `ms` milliseconds.
    ///
    /// Frame `i` holds `base + i % 100`, so slices can be located in the output.
    pub fn clip(&self, rel_path: &str, ms: u32, base: i16) -> &Self {
        self.clip_with(rel_path, ms, 44_100, 1, base)
    }

    /// Write a 16-bit clip with an arbitrary rate and channel count.
    pub fn clip_with(&self, rel_path: &str, ms: u32, rate: u32, channels: u16, base: i16) -> &Self {
        let path = self.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create clip dir");
        }
        let spec = WavSpec {
            channels,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).expect("Failed to create wav");
        let frames = (rate as u64 * ms as u64 / 1000) as usize;
        for i in 0..frames {
            for _ in 0..channels {
                writer
                    .write_sample(base.wrapping_add((i % 100) as i16))
                    .expect("Failed to write sample");
            }
        }
        writer.finalize().expect("Failed to finalize wav");
        self
    }

    /// Write an auxiliary file.
    pub fn file(&self, rel_path: &str, content: &str) -> &Self {
        let path = self.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dir");
        }
        fs::write(path, content).expect("Failed to write file");
        self
    }
}

/// A configuration with tones off, no shuffling and UTF-8 tables.
pub fn plain_config(name: &str, style: &str, chunk: usize) -> String {
    format!(
        "name: {name}\n\
         seed: 1\n\
         recording_style: {style}\n\
         files:\n  \
           file_encoding: utf-8\n  \
           scramble: false\n  \
           glob: {chunk}\n\
         encoding:\n  \
           enabled: false\n  \
           pad_val: 0\n"
    )
}
