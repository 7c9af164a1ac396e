//! Determinism helpers for comparing build outputs.

use std::fmt;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

/// Hash of every file below a folder, keyed by relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeHash {
    /// `(relative path, BLAKE3 hex)` pairs in path order.
    pub files: Vec<(String, String)>,
}

impl TreeHash {
    /// Relative paths of all files.
    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|(path, _)| path.as_str()).collect()
    }
}

impl fmt::Display for TreeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (path, hash) in &self.files {
            writeln!(f, "{}  {}", &hash[..16], path)?;
        }
        Ok(())
    }
}

/// Hashes all files below `root`.
pub fn hash_tree(root: &Path) -> TreeHash {
    let mut files: Vec<(String, String)> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e
                .path()
                .strip_prefix(root)
                .expect("walked path is below root")
                .to_string_lossy()
                .replace('\\', "/");
            let bytes = fs::read(e.path()).expect("Failed to read output file");
            (rel, blake3::hash(&bytes).to_hex().to_string())
        })
        .collect();
    files.sort();
    TreeHash { files }
}
