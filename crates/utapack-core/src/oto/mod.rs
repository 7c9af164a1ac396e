//! OTO table model and codec.
//!
//! An OTO table (`oto.ini`) maps each sample alias to a source clip and its
//! timing coordinates, one line per sample:
//!
//! ```text
//! source.wav=alias,offset,consonant,cutoff,preutterance,overlap
//! ```

mod codec;
mod entry;
mod text;


// Re-export public API
pub use codec::{format_line, parse, parse_line, serialize};
pub use entry::OtoEntry;
pub use text::{decode_text, encode_text, lookup_encoding, repair_mojibake};

/// File name of the table inside each pitch directory.
pub const OTO_FILE_NAME: &str = "oto.ini";
