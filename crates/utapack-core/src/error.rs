//! Error types for OTO processing and configuration loading.

use thiserror::Error;

/// Result type for OTO operations.
pub type OtoResult<T> = Result<T, OtoError>;

/// Errors produced while decoding, parsing, or resolving OTO tables.
#[derive(Debug, Error)]
pub enum OtoError {
    /// The configured text encoding label is not known.
    #[error("unknown text encoding: {label}")]
    UnknownEncoding {
        /// The label that failed to resolve.
        label: String,
    },

    /// The input bytes are not valid in the configured encoding.
    #[error("text is not valid {encoding}")]
    Decode {
        /// Name of the encoding used.
        encoding: String,
    },

    /// The output text contains characters the configured encoding cannot represent.
    #[error("text cannot be represented in {encoding}")]
    Encode {
        /// Name of the encoding used.
        encoding: String,
    },

    /// A line does not have the `source=alias,...` shape.
    #[error("line {line}: {message}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// What is wrong with the line.
        message: String,
    },

    /// A numeric field could not be parsed.
    #[error("line {line}: field '{field}' is not a number: '{value}'")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Field name.
        field: &'static str,
        /// Raw field text.
        value: String,
    },

    /// Resolved coordinates fall outside the source clip.
    #[error(
        "alias '{alias}': region [{start}, {end}) does not fit a clip of {clip_ms} ms"
    )]
    InvalidRegion {
        /// Alias of the offending entry.
        alias: String,
        /// Resolved start in milliseconds.
        start: f64,
        /// Resolved end in milliseconds.
        end: f64,
        /// Clip duration in milliseconds.
        clip_ms: f64,
    },
}

impl OtoError {
    /// Creates a malformed line error.
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedLine {
            line,
            message: message.into(),
        }
    }

    /// Returns a stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            OtoError::UnknownEncoding { .. } => "OTO_001",
            OtoError::Decode { .. } => "OTO_002",
            OtoError::Encode { .. } => "OTO_003",
            OtoError::MalformedLine { .. } => "OTO_004",
            OtoError::InvalidNumber { .. } => "OTO_005",
            OtoError::InvalidRegion { .. } => "OTO_006",
        }
    }
}

/// Errors produced while loading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("unable to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid YAML or has the wrong shape.
    #[error("unable to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The recording style is not one of CV, VCV, CVVC, VCCV.
    #[error("unsupported recording style '{0}' (expected CV, VCV, CVVC, or VCCV)")]
    UnsupportedStyle(String),

    /// A field is outside its allowed range.
    #[error("invalid config value '{field}': {message}")]
    InvalidValue {
        /// Dotted field path.
        field: &'static str,
        /// Error message.
        message: String,
    },

    /// The configured file encoding is not known.
    #[error("unknown file encoding '{0}'")]
    UnknownEncoding(String),
}

impl ConfigError {
    /// Creates an invalid value error.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }

    /// Returns a stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io(_) => "CFG_001",
            ConfigError::Yaml(_) => "CFG_002",
            ConfigError::UnsupportedStyle(_) => "CFG_003",
            ConfigError::InvalidValue { .. } => "CFG_004",
            ConfigError::UnknownEncoding(_) => "CFG_005",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_helper() {
        let err = OtoError::malformed(7, "missing '='");
        assert_eq!(err.to_string(), "line 7: missing '='");
        assert_eq!(err.code(), "OTO_004");
    }

    #[test]
    fn test_invalid_value_helper() {
        let err = ConfigError::invalid("files.glob", "must be at least 1");
        assert!(err.to_string().contains("files.glob"));
        assert!(err.to_string().contains("at least 1"));
    }
}
