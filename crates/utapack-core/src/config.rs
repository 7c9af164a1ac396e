//! Typed build configuration.
//!
//! Configuration is read from YAML with the key layout used by existing
//! voicebank build configs, then validated once into [`Config`]. A config that
//! fails validation never reaches the pipeline.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Component, Path};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::oto::lookup_encoding;

/// Default configuration file name looked up in the voicebank root.
pub const DEFAULT_CONFIG_FILE: &str = "utapack_config.yaml";

/// Highest tone frequency accepted (just below Nyquist at 44.1 kHz).
pub const MAX_TONE_FREQUENCY: u32 = 22_049;

/// How the voicebank was recorded; decides whether slices get padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordingStyle {
    /// Consonant-vowel. Slices are cut without padding.
    Cv,
    /// Vowel-consonant-vowel.
    Vcv,
    /// Consonant-vowel plus vowel-consonant.
    Cvvc,
    /// Vowel-consonant-consonant-vowel.
    Vccv,
}

impl RecordingStyle {
    /// All supported styles.
    pub const ALL: [RecordingStyle; 4] = [
        RecordingStyle::Cv,
        RecordingStyle::Vcv,
        RecordingStyle::Cvvc,
        RecordingStyle::Vccv,
    ];

    /// Returns the config spelling of the style.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingStyle::Cv => "CV",
            RecordingStyle::Vcv => "VCV",
            RecordingStyle::Cvvc => "CVVC",
            RecordingStyle::Vccv => "VCCV",
        }
    }

    /// Parses the config spelling of a style.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.as_str() == s)
    }

    /// Returns true if slices of this style get padding and fades.
    pub fn uses_padding(&self) -> bool {
        !matches!(self, RecordingStyle::Cv)
    }
}

impl fmt::Display for RecordingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seed for every random decision of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "serde_yaml::Value")]
pub enum SeedSetting {
    /// A usable integer seed.
    Fixed(u64),
    /// The configured value is not an integer; randomization is not reproducible.
    Unseeded {
        /// The configured value, for reporting.
        raw: String,
    },
}

impl Default for SeedSetting {
    fn default() -> Self {
        SeedSetting::Unseeded {
            raw: "(none)".to_string(),
        }
    }
}

impl From<serde_yaml::Value> for SeedSetting {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        let fixed = match &value {
            Value::Number(n) => n
                .as_u64()
                // Negative seeds keep their two's complement bits.
                .or_else(|| n.as_i64().map(|v| v as u64))
                .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64 as u64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<u64>()
                    .ok()
                    .or_else(|| s.parse::<i64>().ok().map(|v| v as u64))
            }
            _ => None,
        };

        match fixed {
            Some(seed) => SeedSetting::Fixed(seed),
            None => SeedSetting::Unseeded {
                raw: serde_yaml::to_string(&value)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
            },
        }
    }
}

/// What to do when the same alias appears more than once across pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep every entry.
    KeepAll,
    /// Keep the first entry, drop later ones.
    FirstWins,
    /// Keep the slot of the first entry with the contents of the last.
    #[default]
    LastWins,
    /// Abort the run.
    Error,
}

/// Ranges the separator tone parameters are drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneRange {
    /// Lowest frequency in Hz.
    pub min_frequency: u32,
    /// Highest frequency in Hz.
    pub max_frequency: u32,
    /// Shortest duration, in hundredths of a second.
    pub min_duration: f64,
    /// Longest duration, in hundredths of a second.
    pub max_duration: f64,
    /// Lowest linear volume.
    pub min_volume: f64,
    /// Highest linear volume.
    pub max_volume: f64,
}

impl Default for ToneRange {
    fn default() -> Self {
        Self {
            min_frequency: 200,
            max_frequency: 1000,
            min_duration: 1.0,
            max_duration: 4.0,
            min_volume: 0.2,
            max_volume: 0.6,
        }
    }
}

/// Input and output file settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSettings {
    /// Sub-directories holding one OTO table each.
    pub pitches: Vec<String>,
    /// Files copied verbatim into the output.
    pub keep_files: Vec<String>,
    /// Folders copied verbatim into the output.
    pub keep_folders: Vec<String>,
    /// Encoding label of the OTO tables (read and written).
    pub file_encoding: String,
    /// Shuffle entries before batching.
    pub scramble: bool,
    /// Maximum entries per output file.
    pub chunk_size: NonZeroUsize,
    /// Handling of repeated aliases.
    pub duplicate_aliases: DuplicatePolicy,
}

/// Audio encoding settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingSettings {
    /// Insert separator tones between slices.
    pub tones_enabled: bool,
    /// Run the condenser on the rewritten table.
    pub optimize: bool,
    /// Separator tone ranges.
    pub tones: ToneRange,
    /// Context kept around each slice for padded styles, in milliseconds.
    pub padding_ms: f64,
}

/// Validated build configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Output folder name.
    pub name: String,
    /// Random seed.
    pub seed: SeedSetting,
    /// Recording style of the voicebank.
    pub recording_style: RecordingStyle,
    /// File settings.
    pub files: FileSettings,
    /// Encoding settings.
    pub encoding: EncodingSettings,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    name: String,
    #[serde(default)]
    seed: SeedSetting,
    recording_style: String,
    #[serde(default)]
    files: RawFiles,
    #[serde(default)]
    encoding: RawEncoding,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawFiles {
    pitches: Vec<String>,
    keep_files: Vec<String>,
    keep_folders: Vec<String>,
    file_encoding: String,
    scramble: bool,
    glob: i64,
    duplicate_aliases: DuplicatePolicy,
}

impl Default for RawFiles {
    fn default() -> Self {
        Self {
            pitches: vec![".".to_string()],
            keep_files: Vec::new(),
            keep_folders: Vec::new(),
            file_encoding: "shift-jis".to_string(),
            scramble: true,
            glob: 8,
            duplicate_aliases: DuplicatePolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawEncoding {
    enabled: bool,
    optimize: bool,
    min_frq: i64,
    max_frq: i64,
    min_dur: f64,
    max_dur: f64,
    min_vol: f64,
    max_vol: f64,
    pad_val: f64,
}

impl Default for RawEncoding {
    fn default() -> Self {
        let tones = ToneRange::default();
        Self {
            enabled: true,
            optimize: false,
            min_frq: tones.min_frequency as i64,
            max_frq: tones.max_frequency as i64,
            min_dur: tones.min_duration,
            max_dur: tones.max_duration,
            min_vol: tones.min_volume,
            max_vol: tones.max_volume,
            pad_val: 0.75,
        }
    }
}

impl Config {
    /// Loads and validates a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parses and validates YAML configuration text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let recording_style = RecordingStyle::parse(raw.recording_style.trim())
            .ok_or_else(|| ConfigError::UnsupportedStyle(raw.recording_style.clone()))?;

        let name = raw.name.trim().to_string();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ConfigError::invalid(
                "name",
                format!("'{}' is not a usable folder name", raw.name),
            ));
        }

        let files = validate_files(raw.files)?;
        let encoding = validate_encoding(raw.encoding)?;

        Ok(Self {
            name,
            seed: raw.seed,
            recording_style,
            files,
            encoding,
        })
    }

    /// Returns true if slices are cut with padding and fades.
    pub fn uses_padding(&self) -> bool {
        self.recording_style.uses_padding() && self.encoding.padding_ms > 0.0
    }
}

/// Returns true if `name` is a relative path that cannot leave its base folder.
pub fn stays_inside(name: &str) -> bool {
    let path = Path::new(name);
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)))
}

fn validate_files(raw: RawFiles) -> Result<FileSettings, ConfigError> {
    if raw.pitches.is_empty() {
        return Err(ConfigError::invalid(
            "files.pitches",
            "at least one pitch directory is required",
        ));
    }

    for (field, names) in [
        ("files.keep_files", &raw.keep_files),
        ("files.keep_folders", &raw.keep_folders),
    ] {
        if let Some(name) = names.iter().find(|name| !stays_inside(name)) {
            return Err(ConfigError::invalid(
                field,
                format!("'{name}' must be a relative path inside the voicebank folder"),
            ));
        }
    }

    let chunk_size = usize::try_from(raw.glob)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| {
            ConfigError::invalid("files.glob", format!("must be at least 1, got {}", raw.glob))
        })?;

    if lookup_encoding(&raw.file_encoding).is_err() {
        return Err(ConfigError::UnknownEncoding(raw.file_encoding));
    }

    Ok(FileSettings {
        pitches: raw.pitches,
        keep_files: raw.keep_files,
        keep_folders: raw.keep_folders,
        file_encoding: raw.file_encoding,
        scramble: raw.scramble,
        chunk_size,
        duplicate_aliases: raw.duplicate_aliases,
    })
}

fn validate_encoding(raw: RawEncoding) -> Result<EncodingSettings, ConfigError> {
    let frequency = |field: &'static str, value: i64| -> Result<u32, ConfigError> {
        u32::try_from(value)
            .ok()
            .filter(|v| (1..=MAX_TONE_FREQUENCY).contains(v))
            .ok_or_else(|| {
                ConfigError::invalid(
                    field,
                    format!("must be between 1 and {} Hz, got {}", MAX_TONE_FREQUENCY, value),
                )
            })
    };
    let min_frequency = frequency("encoding.min_frq", raw.min_frq)?;
    let max_frequency = frequency("encoding.max_frq", raw.max_frq)?;
    if min_frequency > max_frequency {
        return Err(ConfigError::invalid(
            "encoding.max_frq",
            "must not be lower than encoding.min_frq",
        ));
    }

    if !(raw.min_dur.is_finite() && raw.min_dur > 0.0) {
        return Err(ConfigError::invalid(
            "encoding.min_dur",
            format!("must be positive, got {}", raw.min_dur),
        ));
    }
    if !(raw.max_dur.is_finite() && raw.max_dur >= raw.min_dur) {
        return Err(ConfigError::invalid(
            "encoding.max_dur",
            "must not be lower than encoding.min_dur",
        ));
    }

    let unit = 0.0..=1.0;
    if !unit.contains(&raw.min_vol) {
        return Err(ConfigError::invalid(
            "encoding.min_vol",
            format!("must be between 0 and 1, got {}", raw.min_vol),
        ));
    }
    if !unit.contains(&raw.max_vol) || raw.max_vol < raw.min_vol {
        return Err(ConfigError::invalid(
            "encoding.max_vol",
            "must be between encoding.min_vol and 1",
        ));
    }

    if !(raw.pad_val.is_finite() && raw.pad_val >= 0.0) {
        return Err(ConfigError::invalid(
            "encoding.pad_val",
            format!("must be zero or positive, got {}", raw.pad_val),
        ));
    }

    Ok(EncodingSettings {
        tones_enabled: raw.enabled,
        optimize: raw.optimize,
        tones: ToneRange {
            min_frequency,
            max_frequency,
            min_duration: raw.min_dur,
            max_duration: raw.max_dur,
            min_volume: raw.min_vol,
            max_volume: raw.max_vol,
        },
        padding_ms: raw.pad_val,
    })
}
