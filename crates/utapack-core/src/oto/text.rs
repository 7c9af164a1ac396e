//! Text encoding and mojibake repair for OTO tables.
//!
//! Voicebanks are commonly authored in Shift-JIS, but tables that have passed
//! through the wrong editor often contain UTF-8 that was read as Windows-1252
//! and saved again. Those lines are repaired before any field is split.

use std::borrow::Cow;

use encoding_rs::{Encoding, WINDOWS_1252};

use crate::error::{OtoError, OtoResult};

/// Resolves an encoding label such as `shift-jis` or `utf-8`.
pub fn lookup_encoding(label: &str) -> OtoResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| OtoError::UnknownEncoding {
        label: label.to_string(),
    })
}

/// Decodes raw table bytes with the given encoding label.
///
/// A byte order mark, if present, takes precedence over the label.
pub fn decode_text(bytes: &[u8], label: &str) -> OtoResult<String> {
    let encoding = lookup_encoding(label)?;
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(OtoError::Decode {
            encoding: used.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

/// Encodes table text with the given encoding label.
pub fn encode_text(text: &str, label: &str) -> OtoResult<Vec<u8>> {
    let encoding = lookup_encoding(label)?;
    let (bytes, used, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(OtoError::Encode {
            encoding: used.name().to_string(),
        });
    }
    Ok(bytes.into_owned())
}

/// Undoes UTF-8 text that was decoded as Windows-1252 / Latin-1.
///
/// The line is mapped back to single bytes and re-read as UTF-8. The repair
/// is only accepted when every character maps to one byte, the bytes form
/// valid UTF-8, and at least one multi-byte sequence was recovered.
/// Anything else is returned unchanged.
pub fn repair_mojibake(line: &str) -> Cow<'_, str> {
    if line.is_ascii() {
        return Cow::Borrowed(line);
    }

    let Some(bytes) = to_single_bytes(line) else {
        return Cow::Borrowed(line);
    };

    match String::from_utf8(bytes) {
        Ok(repaired) if !repaired.is_ascii() && repaired != line => Cow::Owned(repaired),
        _ => Cow::Borrowed(line),
    }
}

fn to_single_bytes(line: &str) -> Option<Vec<u8>> {
    let mut bytes = Vec::with_capacity(line.len());
    let mut buf = [0u8; 4];
    for ch in line.chars() {
        let code = ch as u32;
        if code < 0x100 {
            bytes.push(code as u8);
            continue;
        }
        // Characters Windows-1252 places in 0x80..=0x9F (curly quotes, euro sign, ...)
        let (encoded, _, had_errors) = WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
        if had_errors || encoded.len() != 1 {
            return None;
        }
        bytes.push(encoded[0]);
    }
    Some(bytes)
}
