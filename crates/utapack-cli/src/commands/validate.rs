//! Validate command implementation
//!
//! Checks a voicebank's configuration, tables, and clips without writing
//! anything.

use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use colored::Colorize;
use utapack_core::{MemoryReporter, TracingReporter};

use super::json_output::{print_json, ValidateOutput};
use crate::pipeline::PipelineRequest;
use crate::validate::validate_voicebank;

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if no issues were found, 1 otherwise
pub fn run(source_dir: &str, config_path: Option<&str>, json_output: bool) -> Result<ExitCode> {
    let mut request = PipelineRequest::new(source_dir);
    if let Some(path) = config_path {
        request = request.with_config(path);
    }

    if json_output {
        run_json(&request)
    } else {
        run_human(&request)
    }
}

/// Run validate with human-readable (colored) output
fn run_human(request: &PipelineRequest) -> Result<ExitCode> {
    let start = Instant::now();
    println!("{} {}", "Validating:".cyan().bold(), request.source_dir.display());

    // Issues are printed below; keep the log quiet about them.
    let memory = MemoryReporter::new();
    let report = validate_voicebank(request, &memory)?;

    for pitch in &report.pitches {
        let marker = if pitch.issues.is_empty() {
            "ok".green()
        } else {
            "!!".red()
        };
        println!(
            "  {} {} ({} entries, {} from-end cutoffs)",
            marker,
            pitch.pitch,
            pitch.entries,
            pitch.from_end_cutoffs
        );
        for issue in &pitch.issues {
            println!("      {} {}", "-".red(), issue);
        }
    }

    let duration_ms = start.elapsed().as_millis();
    if report.is_ok() {
        println!(
            "\n{} {} entries checked ({}ms)",
            "SUCCESS".green().bold(),
            report.entry_count(),
            duration_ms
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} {} issue(s) found ({}ms)",
            "FAILED".red().bold(),
            report.issue_count(),
            duration_ms
        );
        Ok(ExitCode::from(1))
    }
}

/// Run validate with machine-readable JSON output
fn run_json(request: &PipelineRequest) -> Result<ExitCode> {
    let result = validate_voicebank(request, &TracingReporter);

    let output = match result {
        Ok(report) => ValidateOutput::from_report(report),
        Err(err) => ValidateOutput::failure(&err),
    };
    print_json(&output)?;

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
