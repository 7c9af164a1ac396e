//! Line codec for `source=alias,offset,consonant,cutoff,preutterance,overlap`.

use std::path::PathBuf;

use crate::coords::Cutoff;
use crate::error::{OtoError, OtoResult};
use crate::precision::{canonical, format_fixed};

use super::entry::OtoEntry;
use super::text::repair_mojibake;

/// Number of comma-separated fields after the `=`.
const FIELD_COUNT: usize = 6;

/// Parses a whole OTO table.
///
/// Empty lines are skipped. The first malformed line aborts the parse.
pub fn parse(text: &str) -> OtoResult<Vec<OtoEntry>> {
    let mut entries = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        if let Some(entry) = parse_line(raw, index + 1)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Parses one line. Returns `Ok(None)` for blank lines.
pub fn parse_line(raw: &str, line: usize) -> OtoResult<Option<OtoEntry>> {
    let repaired = repair_mojibake(raw);
    let text = repaired.trim_end();
    if text.trim().is_empty() {
        return Ok(None);
    }

    let (source, remainder) = text
        .split_once('=')
        .ok_or_else(|| OtoError::malformed(line, "missing '=' after the file name"))?;
    if source.is_empty() {
        return Err(OtoError::malformed(line, "empty file name"));
    }

    let fields: Vec<&str> = remainder.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(OtoError::malformed(
            line,
            format!(
                "expected {} comma-separated fields, found {}",
                FIELD_COUNT,
                fields.len()
            ),
        ));
    }

    let number = |field: &'static str, value: &str| -> OtoResult<f64> {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(canonical)
            .ok_or_else(|| OtoError::InvalidNumber {
                line,
                field,
                value: value.to_string(),
            })
    };

    Ok(Some(OtoEntry {
        source: PathBuf::from(source),
        alias: fields[0].to_string(),
        offset: number("offset", fields[1])?,
        consonant: number("consonant", fields[2])?,
        cutoff: Cutoff::from_stored(number("cutoff", fields[3])?),
        preutterance: number("preutterance", fields[4])?,
        overlap: number("overlap", fields[5])?,
    }))
}

/// Formats one entry as a table line (without a newline).
pub fn format_line(entry: &OtoEntry) -> String {
    format!(
        "{}={},{},{},{},{},{}",
        entry.source.to_string_lossy(),
        entry.alias,
        format_fixed(entry.offset),
        format_fixed(entry.consonant),
        format_fixed(entry.cutoff.to_stored()),
        format_fixed(entry.preutterance),
        format_fixed(entry.overlap),
    )
}

/// Serializes entries as a table: one line each, no trailing newline.
pub fn serialize(entries: &[OtoEntry]) -> String {
    entries
        .iter()
        .map(format_line)
        .collect::<Vec<_>>()
        .join("\n")
}
