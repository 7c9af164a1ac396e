//! Staged output folder.
//!
//! A build writes into a hidden temporary folder next to its final
//! location. Committing swaps it into place; dropping it without a commit
//! deletes everything written so far and leaves any previous build intact.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::PipelineError;

const STAGING_PREFIX: &str = ".utapack-staging-";

/// An output folder that only appears once the build succeeds.
#[derive(Debug)]
pub struct StagedOutput {
    staging: TempDir,
    final_path: PathBuf,
}

impl StagedOutput {
    /// Creates a staging folder beside `final_path`.
    pub fn create(final_path: &Path) -> Result<Self, PipelineError> {
        let parent = final_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let output_err = |source| PipelineError::OutputDir {
            path: final_path.to_path_buf(),
            source,
        };

        fs::create_dir_all(parent).map_err(output_err)?;
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(parent)
            .map_err(output_err)?;

        Ok(Self {
            staging,
            final_path: final_path.to_path_buf(),
        })
    }

    /// Folder to write into.
    pub fn path(&self) -> &Path {
        self.staging.path()
    }

    /// Where the folder ends up after [`commit`](Self::commit).
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Replaces any existing output with the staged folder.
    pub fn commit(self) -> Result<PathBuf, PipelineError> {
        let output_err = |source| PipelineError::OutputDir {
            path: self.final_path.clone(),
            source,
        };

        if self.final_path.exists() {
            fs::remove_dir_all(&self.final_path).map_err(output_err)?;
        }
        fs::rename(self.staging.path(), &self.final_path).map_err(output_err)?;
        // The staging path no longer exists; dropping the guard is a no-op.
        Ok(self.final_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_commit_moves_into_place() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("out").join("voice");

        let staged = StagedOutput::create(&target).unwrap();
        fs::write(staged.path().join("a.txt"), "a").unwrap();
        assert!(!target.exists());

        let committed = staged.commit().unwrap();
        assert_eq!(committed, target);
        assert_eq!(fs::read_to_string(target.join("a.txt")).unwrap(), "a");
        assert_eq!(entries(&root.path().join("out")), vec!["voice"]);
    }

    #[test]
    fn test_commit_replaces_previous_output() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("voice");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stale.txt"), "old").unwrap();

        let staged = StagedOutput::create(&target).unwrap();
        fs::write(staged.path().join("fresh.txt"), "new").unwrap();
        staged.commit().unwrap();

        assert_eq!(entries(&target), vec!["fresh.txt"]);
    }

    #[test]
    fn test_drop_discards_staging_and_keeps_previous() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("voice");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("keep.txt"), "old").unwrap();

        {
            let staged = StagedOutput::create(&target).unwrap();
            fs::write(staged.path().join("partial.wav"), "x").unwrap();
        }

        assert_eq!(entries(root.path()), vec!["voice"]);
        assert_eq!(entries(&target), vec!["keep.txt"]);
    }
}
