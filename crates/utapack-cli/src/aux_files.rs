//! Copying of auxiliary voicebank files.
//!
//! Files such as `character.txt` or folders of artwork are copied into the
//! output unchanged. Copying is best effort: a missing source is skipped
//! and any other failure is reported without stopping the build. Names that
//! are absolute or climb out of the voicebank folder are never copied.

use std::fs;
use std::io;
use std::path::Path;

use utapack_core::{stays_inside, Event, Reporter};
use walkdir::WalkDir;

/// Copies listed files and folders from `source_dir` into `dest_dir`.
///
/// Returns the number of items copied.
pub fn copy_aux<R: Reporter + ?Sized>(
    source_dir: &Path,
    dest_dir: &Path,
    files: &[String],
    folders: &[String],
    reporter: &R,
) -> usize {
    let mut copied = 0;

    for name in files {
        let from = source_dir.join(name);
        if try_copy(name, &from, reporter, || copy_file(&from, &dest_dir.join(name))) {
            copied += 1;
        }
    }

    for name in folders {
        let from = source_dir.join(name);
        if try_copy(name, &from, reporter, || copy_tree(&from, &dest_dir.join(name))) {
            copied += 1;
        }
    }

    copied
}

fn try_copy<R, F>(name: &str, from: &Path, reporter: &R, copy: F) -> bool
where
    R: Reporter + ?Sized,
    F: FnOnce() -> io::Result<()>,
{
    if !stays_inside(name) {
        reporter.report(&Event::AuxCopyFailed {
            path: from.to_path_buf(),
            error: "path leaves the voicebank folder".to_string(),
        });
        return false;
    }
    if !from.exists() {
        reporter.report(&Event::AuxMissing {
            path: from.to_path_buf(),
        });
        return false;
    }

    match copy() {
        Ok(()) => {
            reporter.report(&Event::AuxCopied {
                path: from.to_path_buf(),
            });
            true
        }
        Err(err) => {
            reporter.report(&Event::AuxCopyFailed {
                path: from.to_path_buf(),
                error: err.to_string(),
            });
            false
        }
    }
}

fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).map(|_| ())
}

fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use utapack_core::MemoryReporter;

    #[test]
    fn test_copies_files_and_folders() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::write(src.path().join("character.txt"), "name=Test").unwrap();
        fs::create_dir_all(src.path().join("art/icons")).unwrap();
        fs::write(src.path().join("art/icons/icon.bmp"), [1u8, 2, 3]).unwrap();

        let reporter = MemoryReporter::new();
        let copied = copy_aux(
            src.path(),
            dst.path(),
            &["character.txt".to_string()],
            &["art".to_string()],
            &reporter,
        );

        assert_eq!(copied, 2);
        assert_eq!(
            fs::read_to_string(dst.path().join("character.txt")).unwrap(),
            "name=Test"
        );
        assert_eq!(
            fs::read(dst.path().join("art/icons/icon.bmp")).unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_missing_sources_are_skipped() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let reporter = MemoryReporter::new();

        let copied = copy_aux(
            src.path(),
            dst.path(),
            &["readme.txt".to_string()],
            &["bgm".to_string()],
            &reporter,
        );

        assert_eq!(copied, 0);
        let missing = reporter
            .events()
            .into_iter()
            .filter(|e| matches!(e, Event::AuxMissing { .. }))
            .count();
        assert_eq!(missing, 2);
        assert_eq!(fs::read_dir(dst.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_outside_paths_are_never_touched() {
        let outside = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let original = outside.path().join("character.txt");
        fs::write(&original, "name=Precious").unwrap();

        let reporter = MemoryReporter::new();
        let copied = copy_aux(
            src.path(),
            dst.path(),
            &[
                original.to_string_lossy().into_owned(),
                "../character.txt".to_string(),
            ],
            &["..".to_string()],
            &reporter,
        );

        assert_eq!(copied, 0);
        assert_eq!(fs::read_to_string(&original).unwrap(), "name=Precious");
        let failed = reporter
            .events()
            .into_iter()
            .filter(|e| matches!(e, Event::AuxCopyFailed { .. }))
            .count();
        assert_eq!(failed, 3);
    }

    #[test]
    fn test_copy_failure_is_reported_not_fatal() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.txt"), "a").unwrap();
        fs::write(src.path().join("b.txt"), "b").unwrap();
        // A file where the destination folder should be makes the copy fail.
        fs::write(dst.path().join("sub"), "blocker").unwrap();
        fs::create_dir_all(src.path().join("sub")).unwrap();
        fs::write(src.path().join("sub/c.txt"), "c").unwrap();

        let reporter = MemoryReporter::new();
        let copied = copy_aux(
            src.path(),
            dst.path(),
            &["a.txt".to_string(), "b.txt".to_string()],
            &["sub".to_string()],
            &reporter,
        );

        assert_eq!(copied, 2);
        assert!(reporter
            .events()
            .iter()
            .any(|e| matches!(e, Event::AuxCopyFailed { .. })));
    }
}
