//! JSON output types for machine-readable CLI output.
//!
//! Printed instead of colored text when `--json` is given, so scripts can
//! read the result of a run from stdout.

use serde::Serialize;

use crate::error::PipelineError;
use crate::pipeline::PipelineOutput;
use crate::validate::ValidationReport;

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CFG_001", "PIPE_003")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl From<&PipelineError> for JsonError {
    fn from(err: &PipelineError) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        Self {
            code: err.code().to_string(),
            message,
        }
    }
}

/// JSON output for the `build` command.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutput {
    /// Whether the build succeeded
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
    /// Build details (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PipelineOutput>,
    /// Warnings raised during the run
    pub warnings: Vec<String>,
}

impl BuildOutput {
    pub fn success(result: PipelineOutput, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
            warnings,
        }
    }

    pub fn failure(error: &PipelineError, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            errors: vec![JsonError::from(error)],
            result: None,
            warnings,
        }
    }
}

/// JSON output for the `validate` command.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateOutput {
    /// Whether the voicebank has no issues
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ValidationReport>,
}

impl ValidateOutput {
    pub fn from_report(report: ValidationReport) -> Self {
        Self {
            success: report.is_ok(),
            errors: Vec::new(),
            report: Some(report),
        }
    }

    pub fn failure(error: &PipelineError) -> Self {
        Self {
            success: false,
            errors: vec![JsonError::from(error)],
            report: None,
        }
    }
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
