//! Voicebank validation without building.
//!
//! Reads every pitch table and every referenced clip, and checks that each
//! entry's region fits its clip and spans at least one sample. Problems are collected per pitch instead of
//! aborting, so one run lists everything that would make a build fail.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde::Serialize;
use utapack_audio::{clip_duration_ms, ms_to_frames};
use utapack_core::{resolve_region, DuplicatePolicy, Event, Reporter};

use crate::error::PipelineError;
use crate::pipeline::{read_pitch, PipelineRequest};

/// Findings for one pitch folder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PitchReport {
    pub pitch: String,
    /// Entries parsed from the table.
    pub entries: usize,
    /// Entries whose cutoff is measured from the clip end.
    pub from_end_cutoffs: usize,
    pub issues: Vec<String>,
}

/// Findings for a whole voicebank.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub pitches: Vec<PitchReport>,
}

impl ValidationReport {
    /// Returns true if no issues were found.
    pub fn is_ok(&self) -> bool {
        self.pitches.iter().all(|p| p.issues.is_empty())
    }

    /// Total number of issues.
    pub fn issue_count(&self) -> usize {
        self.pitches.iter().map(|p| p.issues.len()).sum()
    }

    /// Total number of entries read.
    pub fn entry_count(&self) -> usize {
        self.pitches.iter().map(|p| p.entries).sum()
    }
}

/// Checks a voicebank against its configuration.
///
/// # Errors
/// Only an unusable configuration or a missing source folder is an error;
/// everything else is recorded in the report.
pub fn validate_voicebank<R: Reporter + ?Sized>(
    request: &PipelineRequest,
    reporter: &R,
) -> Result<ValidationReport, PipelineError> {
    let config = request.load_config()?;
    if !request.source_dir.is_dir() {
        return Err(PipelineError::SourceDir {
            path: request.source_dir.clone(),
        });
    }

    let mut durations: HashMap<PathBuf, Result<f64, String>> = HashMap::new();
    let mut seen_aliases: HashSet<String> = HashSet::new();
    let mut report = ValidationReport::default();

    for pitch in &config.files.pitches {
        let mut pitch_report = PitchReport {
            pitch: pitch.clone(),
            ..PitchReport::default()
        };

        match read_pitch(&request.source_dir, pitch, &config.files.file_encoding) {
            Err(err) => pitch_report.issues.push(err.to_string()),
            Ok(entries) => {
                pitch_report.entries = entries.len();
                for entry in entries {
                    if !seen_aliases.insert(entry.alias.clone())
                        && config.files.duplicate_aliases == DuplicatePolicy::Error
                    {
                        pitch_report
                            .issues
                            .push(format!("alias '{}' is defined more than once", entry.alias));
                    }

                    let duration = durations
                        .entry(entry.source.clone())
                        .or_insert_with(|| clip_duration_ms(&entry.source).map_err(|e| e.to_string()));
                    let clip_ms = match duration {
                        Ok(ms) => *ms,
                        Err(message) => {
                            pitch_report
                                .issues
                                .push(format!("alias '{}': {}", entry.alias, message));
                            continue;
                        }
                    };

                    let region = match resolve_region(&entry, clip_ms) {
                        Ok(region) => region,
                        Err(err) => {
                            pitch_report.issues.push(err.to_string());
                            continue;
                        }
                    };
                    if entry.cutoff.is_from_end() {
                        pitch_report.from_end_cutoffs += 1;
                    }
                    if ms_to_frames(region.end) <= ms_to_frames(region.start) {
                        pitch_report.issues.push(format!(
                            "alias '{}': region [{}, {}) is shorter than one sample",
                            entry.alias, region.start, region.end
                        ));
                    }
                }
            }
        }

        for issue in &pitch_report.issues {
            reporter.report(&Event::ValidationIssue {
                pitch: pitch.clone(),
                message: issue.clone(),
            });
        }
        report.pitches.push(pitch_report);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use utapack_audio::{ms_to_frames, write_clip, Clip};
    use utapack_core::{MemoryReporter, DEFAULT_CONFIG_FILE, OTO_FILE_NAME};

    fn setup(table: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join(DEFAULT_CONFIG_FILE),
            "name: v\nrecording_style: CVVC\nfiles:\n  pitches: [A3]\n  file_encoding: utf-8\n  duplicate_aliases: error\n",
        )
        .unwrap();
        fs::create_dir_all(root.join("A3")).unwrap();
        write_clip(
            &root.join("A3/ka.wav"),
            &Clip::from_samples(vec![0; ms_to_frames(1000.0)]),
        )
        .unwrap();
        fs::write(root.join("A3").join(OTO_FILE_NAME), table).unwrap();
        dir
    }

    fn outputs(root: &Path) -> bool {
        root.join("UTAPackOutput").exists()
    }

    #[test]
    fn test_clean_voicebank() {
        let dir = setup("ka.wav=ka,100,0,200,0,0\nka.wav=k a,100,0,-300,0,0");
        let report = validate_voicebank(&PipelineRequest::new(dir.path()), &MemoryReporter::new()).unwrap();

        assert!(report.is_ok());
        assert_eq!(report.entry_count(), 2);
        assert_eq!(report.pitches[0].from_end_cutoffs, 1);
        assert!(!outputs(dir.path()));
    }

    #[test]
    fn test_problems_are_collected() {
        let dir = setup(
            "ka.wav=ka,900,0,-300,0,0\nmissing.wav=mi,0,0,-10,0,0\nka.wav=ka,0,0,-10,0,0",
        );
        let reporter = MemoryReporter::new();
        let report = validate_voicebank(&PipelineRequest::new(dir.path()), &reporter).unwrap();

        assert!(!report.is_ok());
        assert_eq!(report.issue_count(), 3);
        assert_eq!(reporter.events().len(), 3);
    }

    #[test]
    fn test_sub_sample_region_is_an_issue() {
        let dir = setup("ka.wav=ka,100,0,-0.01,0,0\nka.wav=kb,100,0,-0.05,0,0");
        let report = validate_voicebank(&PipelineRequest::new(dir.path()), &MemoryReporter::new()).unwrap();

        assert_eq!(report.issue_count(), 1);
        assert!(report.pitches[0].issues[0].contains("'ka'"));
    }

    #[test]
    fn test_unparsable_table_is_an_issue() {
        let dir = setup("ka.wav=ka,abc,0,-300,0,0");
        let report = validate_voicebank(&PipelineRequest::new(dir.path()), &MemoryReporter::new()).unwrap();
        assert_eq!(report.issue_count(), 1);
        assert!(report.pitches[0].issues[0].contains("offset"));
    }
}
