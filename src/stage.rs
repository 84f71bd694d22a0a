//! Directory staging: clean-then-create semantics for output directories.
//!
//! `reset` is not safe against concurrent use of the same path; callers
//! must serialize resets of a given directory. Within one pipeline run the
//! per-target archive paths are disjoint, so no locking is needed.

use std::fs;
use std::io;
use std::path::Path;

use crate::report::Reporter;

/// Remove the directory tree at `path` if present, then create a fresh
/// empty directory there.
pub fn reset(path: &Path, reporter: &dyn Reporter) -> io::Result<()> {
    remove(path, reporter)?;
    fs::create_dir_all(path)?;
    reporter.info(&format!("Created directory: {}", path.display()));
    Ok(())
}

/// Remove the directory tree at `path`. A missing path is not an error.
pub fn remove(path: &Path, reporter: &dyn Reporter) -> io::Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
        reporter.info(&format!("Removed directory: {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::CapturingReporter;

    #[test]
    fn test_reset_missing_path_creates_empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("out");
        let reporter = CapturingReporter::new();

        reset(&target, &reporter).unwrap();

        assert!(target.is_dir());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn test_reset_clears_existing_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("out");
        fs::create_dir_all(target.join("stale")).unwrap();
        fs::write(target.join("stale/leftover.txt"), b"old").unwrap();
        let reporter = CapturingReporter::new();

        reset(&target, &reporter).unwrap();

        assert!(target.is_dir());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn test_remove_missing_path_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let reporter = CapturingReporter::new();

        remove(&tmp.path().join("absent"), &reporter).unwrap();
    }

    #[test]
    fn test_remove_does_not_recreate() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("gone");
        fs::create_dir_all(&target).unwrap();
        let reporter = CapturingReporter::new();

        remove(&target, &reporter).unwrap();

        assert!(!target.exists());
    }

    #[test]
    fn test_reset_reports_progress() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("out");
        fs::create_dir_all(&target).unwrap();
        let reporter = CapturingReporter::new();

        reset(&target, &reporter).unwrap();

        let infos = reporter.infos();
        assert!(infos.iter().any(|m| m.starts_with("Removed directory")));
        assert!(infos.iter().any(|m| m.starts_with("Created directory")));
    }
}
