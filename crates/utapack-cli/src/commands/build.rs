//! Build command implementation
//!
//! Packs a voicebank into batch files and a rewritten OTO table.

use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use colored::Colorize;
use utapack_core::{Level, MemoryReporter, TracingReporter};

use super::json_output::{print_json, BuildOutput};
use super::Tee;
use crate::pipeline::{run_pipeline, PipelineRequest};

/// Run the build command
///
/// # Arguments
/// * `source_dir` - Voicebank root folder
/// * `config_path` - Configuration file (default: `<source_dir>/utapack_config.yaml`)
/// * `out_root` - Folder the output folder is created in
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 success, 1 failure
pub fn run(
    source_dir: &str,
    config_path: Option<&str>,
    out_root: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let mut request = PipelineRequest::new(source_dir);
    if let Some(path) = config_path {
        request = request.with_config(path);
    }
    if let Some(path) = out_root {
        request = request.with_out_root(path);
    }

    if json_output {
        run_json(&request)
    } else {
        run_human(&request)
    }
}

/// Run build with human-readable (colored) output
fn run_human(request: &PipelineRequest) -> Result<ExitCode> {
    let start = Instant::now();

    println!("{} {}", "Building from:".cyan().bold(), request.source_dir.display());
    println!("{} {}", "Config:".cyan().bold(), request.config_path().display());

    let output = run_pipeline(request, &TracingReporter)?;

    for batch in &output.batches {
        println!(
            "  {} {} ({} entries, {:.1} ms) {}",
            "+".green(),
            batch.file,
            batch.entries,
            batch.duration_ms,
            batch.pcm_hash[..16].dimmed()
        );
    }
    if !output.reproducible {
        println!(
            "  {} configured seed is not an integer, used random seed {}",
            "!".yellow(),
            output.seed
        );
    }

    println!(
        "\n{} {} entries in {} files -> {} ({}ms)",
        "SUCCESS".green().bold(),
        output.entries_written,
        output.batches.len(),
        output.oto_path.display(),
        start.elapsed().as_millis()
    );
    Ok(ExitCode::SUCCESS)
}

/// Run build with machine-readable JSON output
fn run_json(request: &PipelineRequest) -> Result<ExitCode> {
    let memory = MemoryReporter::new();
    let reporter = Tee(TracingReporter, &memory);

    let result = run_pipeline(request, &reporter);
    let warnings = memory
        .at_least(Level::Warn)
        .iter()
        .map(ToString::to_string)
        .collect();

    match result {
        Ok(output) => {
            print_json(&BuildOutput::success(output, warnings))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            print_json(&BuildOutput::failure(&err, warnings))?;
            Ok(ExitCode::from(1))
        }
    }
}
