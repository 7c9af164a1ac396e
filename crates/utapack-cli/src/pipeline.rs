//! Voicebank build pipeline.
//!
//! A build reads the configuration, collects the OTO entries of every pitch
//! folder, optionally shuffles them, packs them into batch WAV files, and
//! writes a rewritten `oto.ini` next to the batches. Everything is written
//! into a staged folder that replaces the previous build on success.

use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use serde::Serialize;
use utapack_audio::{create_rng, write_clip, ComposeSettings, Composer, WavFileSource};
use utapack_core::oto::{decode_text, encode_text, parse, serialize};
use utapack_core::{
    condense, plan_batches, Config, Event, OtoEntry, Reporter, SeedSetting, DEFAULT_CONFIG_FILE,
    OTO_FILE_NAME,
};

use crate::aux_files::copy_aux;
use crate::duplicates::apply_duplicate_policy;
use crate::error::PipelineError;
use crate::output_dir::StagedOutput;

/// Folder created inside the source folder when no output root is given.
pub const OUTPUT_FOLDER: &str = "UTAPackOutput";

/// Sub-folder holding the batch files and the rewritten table.
pub const AUDIO_FOLDER: &str = "src";

/// Where to read a voicebank from and where to write the result.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// Voicebank root holding the pitch folders.
    pub source_dir: PathBuf,
    /// Configuration file; defaults to `utapack_config.yaml` in `source_dir`.
    pub config_path: Option<PathBuf>,
    /// Folder the named output folder is created in; defaults to
    /// `<source_dir>/UTAPackOutput`.
    pub out_root: Option<PathBuf>,
}

impl PipelineRequest {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            config_path: None,
            out_root: None,
        }
    }

    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_out_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_root = Some(path.into());
        self
    }

    /// Resolved configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| self.source_dir.join(DEFAULT_CONFIG_FILE))
    }

    /// Loads and validates the configuration.
    pub fn load_config(&self) -> Result<Config, PipelineError> {
        let path = self.config_path();
        Config::load(&path).map_err(|source| PipelineError::Config { path, source })
    }

    /// Final output folder for a configuration.
    pub fn output_dir(&self, config: &Config) -> PathBuf {
        self.out_root
            .clone()
            .unwrap_or_else(|| self.source_dir.join(OUTPUT_FOLDER))
            .join(&config.name)
    }
}

/// One written batch file.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub file: String,
    pub entries: usize,
    pub duration_ms: f64,
    pub pcm_hash: String,
}

/// Result of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// Committed output folder.
    pub output_dir: PathBuf,
    /// Rewritten table.
    pub oto_path: PathBuf,
    /// Seed the run used.
    pub seed: u64,
    /// False when the configured seed was unusable.
    pub reproducible: bool,
    /// Entries read from all pitch tables.
    pub entries_read: usize,
    /// Lines in the rewritten table.
    pub entries_written: usize,
    /// Auxiliary files and folders copied.
    pub aux_copied: usize,
    pub batches: Vec<BatchSummary>,
}

/// Builds a packed voicebank.
///
/// # Errors
/// Any configuration, table, or audio error aborts the build. Nothing is
/// left in the output location on failure; a previous build stays in place.
pub fn run_pipeline<R: Reporter + ?Sized>(
    request: &PipelineRequest,
    reporter: &R,
) -> Result<PipelineOutput, PipelineError> {
    let config = request.load_config()?;
    build(&config, request, reporter)
}

/// Builds a packed voicebank from an already validated configuration.
pub fn build<R: Reporter + ?Sized>(
    config: &Config,
    request: &PipelineRequest,
    reporter: &R,
) -> Result<PipelineOutput, PipelineError> {
    if !request.source_dir.is_dir() {
        return Err(PipelineError::SourceDir {
            path: request.source_dir.clone(),
        });
    }

    let seed = utapack_audio::base_seed(&config.seed);
    let reproducible = match &config.seed {
        SeedSetting::Fixed(value) => {
            reporter.report(&Event::SeedApplied { seed: *value });
            true
        }
        SeedSetting::Unseeded { raw } => {
            reporter.report(&Event::SeedFallback { raw: raw.clone() });
            false
        }
    };
    let mut rng = create_rng(seed);

    let staged = StagedOutput::create(&request.output_dir(config))?;
    reporter.report(&Event::OutputStaged {
        path: staged.final_path().to_path_buf(),
    });

    let aux_copied = copy_aux(
        &request.source_dir,
        staged.path(),
        &config.files.keep_files,
        &config.files.keep_folders,
        reporter,
    );

    let mut entries = Vec::new();
    for pitch in &config.files.pitches {
        let pitch_entries = read_pitch(&request.source_dir, pitch, &config.files.file_encoding)?;
        reporter.report(&Event::PitchParsed {
            pitch: pitch.clone(),
            entries: pitch_entries.len(),
        });
        entries.extend(pitch_entries);
    }
    let entries_read = entries.len();

    let mut entries = apply_duplicate_policy(entries, config.files.duplicate_aliases, reporter)?;

    if config.files.scramble {
        entries.shuffle(&mut rng);
        reporter.report(&Event::Shuffled {
            entries: entries.len(),
        });
    }

    let audio_dir = staged.path().join(AUDIO_FOLDER);
    fs::create_dir_all(&audio_dir).map_err(|source| PipelineError::OutputDir {
        path: audio_dir.clone(),
        source,
    })?;

    let mut composer = Composer::new(
        ComposeSettings::from_config(config),
        WavFileSource::new(),
        reporter,
    );
    let mut table = Vec::with_capacity(entries.len());
    let mut batches = Vec::new();

    for batch in plan_batches(entries, config.files.chunk_size) {
        let composed = composer.compose(&batch, &mut rng)?;
        let wav = write_clip(&audio_dir.join(&composed.file_name), &composed.audio)?;

        let summary = BatchSummary {
            file: composed.file_name.clone(),
            entries: composed.entries.len(),
            duration_ms: wav.duration_ms(),
            pcm_hash: wav.pcm_hash,
        };
        reporter.report(&Event::BatchWritten {
            file: summary.file.clone(),
            entries: summary.entries,
            duration_ms: summary.duration_ms,
            pcm_hash: summary.pcm_hash.clone(),
        });
        batches.push(summary);
        table.extend(composed.entries);
    }

    if config.encoding.optimize {
        let (condensed, summary) = condense(table);
        reporter.report(&Event::Condensed {
            before: summary.before,
            after: summary.after,
        });
        table = condensed;
    }

    let entries_written = table.len();
    let staged_oto = audio_dir.join(OTO_FILE_NAME);
    write_table(&staged_oto, &table, &config.files.file_encoding)?;

    let output_dir = staged.commit()?;
    let oto_path = output_dir.join(AUDIO_FOLDER).join(OTO_FILE_NAME);
    reporter.report(&Event::OtoWritten {
        path: oto_path.clone(),
        entries: entries_written,
    });

    Ok(PipelineOutput {
        output_dir,
        oto_path,
        seed,
        reproducible,
        entries_read,
        entries_written,
        aux_copied,
        batches,
    })
}

/// Reads one pitch folder's table, with sources rebased onto the folder.
pub(crate) fn read_pitch(
    source_dir: &Path,
    pitch: &str,
    encoding: &str,
) -> Result<Vec<OtoEntry>, PipelineError> {
    let pitch_dir = source_dir.join(pitch);
    let path = pitch_dir.join(OTO_FILE_NAME);

    let bytes = fs::read(&path).map_err(|source| PipelineError::TableRead {
        path: path.clone(),
        source,
    })?;
    let table_err = |source| PipelineError::Table {
        path: path.clone(),
        source,
    };
    let text = decode_text(&bytes, encoding).map_err(table_err)?;
    let entries = parse(&text).map_err(table_err)?;

    Ok(entries
        .into_iter()
        .map(|entry| entry.rebased(&pitch_dir))
        .collect())
}

fn write_table(path: &Path, entries: &[OtoEntry], encoding: &str) -> Result<(), PipelineError> {
    let bytes = encode_text(&serialize(entries), encoding).map_err(|source| {
        PipelineError::Table {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, bytes).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use utapack_audio::{ms_to_frames, read_clip, Clip};
    use utapack_core::{Level, MemoryReporter};

    fn write_wav(path: &Path, ms: f64, value: i16) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        write_clip(path, &Clip::from_samples(vec![value; ms_to_frames(ms)])).unwrap();
    }

    fn voicebank(config: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(DEFAULT_CONFIG_FILE), config).unwrap();
        write_wav(&root.join("a.wav"), 500.0, 100);
        write_wav(&root.join("b.wav"), 500.0, 200);
        write_wav(&root.join("c.wav"), 500.0, 300);
        fs::write(
            root.join(OTO_FILE_NAME),
            "a.wav=A,100,0,-50,0,0\nb.wav=B,200,0,-80,0,0\nc.wav=C,0,0,-30,0,0",
        )
        .unwrap();
        dir
    }

    const PLAIN: &str = "name: out\nseed: 1\nrecording_style: CV\nfiles:\n  scramble: false\n  glob: 2\n  file_encoding: utf-8\nencoding:\n  enabled: false\n";

    #[test]
    fn test_request_paths() {
        let request = PipelineRequest::new("/vb");
        assert_eq!(request.config_path(), PathBuf::from("/vb/utapack_config.yaml"));

        let config = Config::from_yaml_str("name: Voice\nrecording_style: CV\n").unwrap();
        assert_eq!(
            request.output_dir(&config),
            PathBuf::from("/vb/UTAPackOutput/Voice")
        );
        assert_eq!(
            request.clone().with_out_root("/out").output_dir(&config),
            PathBuf::from("/out/Voice")
        );
    }

    #[test]
    fn test_build_writes_batches_and_table() {
        let dir = voicebank(PLAIN);
        let reporter = MemoryReporter::new();

        let output = run_pipeline(&PipelineRequest::new(dir.path()), &reporter).unwrap();

        assert_eq!(output.output_dir, dir.path().join("UTAPackOutput/out"));
        assert_eq!(output.batches.len(), 2);
        assert_eq!(output.entries_read, 3);
        assert_eq!(output.entries_written, 3);
        assert!(output.reproducible);

        let table = fs::read_to_string(&output.oto_path).unwrap();
        assert_eq!(
            table,
            "00001.wav=A,0.000,0.000,-50.000,0.000,0.000\n\
             00001.wav=B,50.000,0.000,-80.000,0.000,0.000\n\
             00002.wav=C,0.000,0.000,-30.000,0.000,0.000"
        );

        let first = read_clip(&output.output_dir.join("src/00001.wav")).unwrap();
        assert_eq!(first.len(), ms_to_frames(130.0));
        assert!(reporter.at_least(Level::Warn).is_empty());
    }

    #[test]
    fn test_optimize_condenses_repeated_entries() {
        let config = PLAIN
            .replace("glob: 2", "glob: 8\n  duplicate_aliases: keep_all")
            .replace("enabled: false", "enabled: false\n  optimize: true");
        let dir = voicebank(&config);
        fs::write(
            dir.path().join(OTO_FILE_NAME),
            "a.wav=A,100,0,-50,0,0\na.wav=A,100,0,-50,0,0\nb.wav=B,200,0,-80,0,0\na.wav=A,100,0,-50,0,0",
        )
        .unwrap();
        let reporter = MemoryReporter::new();

        let output = run_pipeline(&PipelineRequest::new(dir.path()), &reporter).unwrap();

        assert_eq!(output.entries_read, 4);
        assert_eq!(output.entries_written, 2);
        assert!(reporter
            .events()
            .contains(&Event::Condensed { before: 4, after: 2 }));
        assert_eq!(
            fs::read_to_string(&output.oto_path).unwrap(),
            "00001.wav=A,0.000,0.000,-50.000,0.000,0.000\n\
             00001.wav=B,50.000,0.000,-80.000,0.000,0.000"
        );
        assert_eq!(output.batches[0].duration_ms, 130.0);
    }

    #[test]
    fn test_without_optimize_repeats_are_kept() {
        let dir = voicebank(&PLAIN.replace("glob: 2", "glob: 8\n  duplicate_aliases: keep_all"));
        fs::write(
            dir.path().join(OTO_FILE_NAME),
            "a.wav=A,100,0,-50,0,0\na.wav=A,100,0,-50,0,0",
        )
        .unwrap();

        let output = run_pipeline(&PipelineRequest::new(dir.path()), &MemoryReporter::new()).unwrap();

        assert_eq!(output.entries_written, 2);
        assert_eq!(output.batches[0].duration_ms, 100.0);
    }

    #[test]
    fn test_unseeded_run_warns() {
        let dir = voicebank(&PLAIN.replace("seed: 1", "seed: hello"));
        let reporter = MemoryReporter::new();

        let output = run_pipeline(&PipelineRequest::new(dir.path()), &reporter).unwrap();

        assert!(!output.reproducible);
        assert!(reporter
            .events()
            .iter()
            .any(|e| matches!(e, Event::SeedFallback { raw } if raw == "hello")));
    }

    #[test]
    fn test_invalid_region_leaves_no_output() {
        let dir = voicebank(PLAIN);
        fs::write(dir.path().join(OTO_FILE_NAME), "a.wav=A,480,0,-50,0,0").unwrap();

        let err = run_pipeline(&PipelineRequest::new(dir.path()), &MemoryReporter::new()).unwrap_err();

        assert_eq!(err.code(), "AUDIO_004");
        assert!(!dir.path().join("UTAPackOutput/out").exists());
        let leftovers = fs::read_dir(dir.path().join("UTAPackOutput")).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_missing_table_is_reported() {
        let dir = voicebank(&PLAIN.replace("files:\n", "files:\n  pitches: [A3]\n"));

        let err = run_pipeline(&PipelineRequest::new(dir.path()), &MemoryReporter::new()).unwrap_err();

        assert!(matches!(err, PipelineError::TableRead { .. }));
    }
}
