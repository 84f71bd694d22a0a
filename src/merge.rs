//! Merging per-target archives into a single XCFramework bundle.
//!
//! Builds the `-create-xcframework` argument list from every target's
//! archive path, runs the external tool once, then removes the intermediate
//! archives. A launch failure aborts before cleanup.

use std::path::{Path, PathBuf};

use crate::archive::archive_path;
use crate::manifest::Manifest;
use crate::report::Reporter;
use crate::stage;
use crate::tool::{InvokeError, ToolRunner};

/// Extension of the final merged bundle.
pub const BUNDLE_EXTENSION: &str = "xcframework";

/// Framework product path nested inside a target's archive.
pub fn framework_path(archive: &Path, framework: &str) -> PathBuf {
    archive
        .join("Products/Library/Frameworks")
        .join(format!("{}.framework", framework))
}

/// Final bundle path under the output directory.
pub fn bundle_path(output_dir: &Path, framework: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", framework, BUNDLE_EXTENSION))
}

/// Errors from the merge step.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("archive cleanup failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("merge failed: {0}")]
    Invoke(#[from] InvokeError),
}

/// Drives the external tool's `-create-xcframework` step.
pub struct Merger<'a> {
    runner: &'a dyn ToolRunner,
    reporter: &'a dyn Reporter,
}

impl<'a> Merger<'a> {
    pub fn new(runner: &'a dyn ToolRunner, reporter: &'a dyn Reporter) -> Self {
        Self { runner, reporter }
    }

    /// Merge all target archives into the final bundle, then remove the
    /// intermediate archives. A manifest without targets is a no-op.
    pub fn merge(&self, manifest: &Manifest) -> Result<(), MergeError> {
        if manifest.targets.is_empty() {
            return Ok(());
        }

        let output_dir = Path::new(&manifest.output_path);

        let mut args = vec!["-create-xcframework".to_string()];
        for target in &manifest.targets {
            let archive = archive_path(output_dir, target.sdk);
            args.push("-framework".to_string());
            args.push(
                framework_path(&archive, &manifest.framework)
                    .display()
                    .to_string(),
            );
        }

        let bundle = bundle_path(output_dir, &manifest.framework);
        args.push("-output".to_string());
        args.push(bundle.display().to_string());

        self.reporter.info("Creating the XCFramework");
        self.runner.run(&args)?;
        self.reporter.info(&format!(
            "Successfully created the XCFramework at: {}",
            bundle.display()
        ));

        // Intermediate archives are no longer needed once merged.
        for target in &manifest.targets {
            stage::remove(&archive_path(output_dir, target.sdk), self.reporter)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Sdk, Target};
    use crate::mock::{CapturingReporter, FailureMode, RecordingRunner};
    use std::fs;

    fn manifest_with_targets(output_path: &str, targets: Vec<Target>) -> Manifest {
        Manifest {
            output_path: output_path.to_string(),
            framework: "Lib".to_string(),
            targets,
        }
    }

    fn target(sdk: Sdk) -> Target {
        Target {
            sdk,
            workspace: Some("W.xcworkspace".to_string()),
            project: None,
            scheme: "S".to_string(),
        }
    }

    #[test]
    fn test_merge_empty_targets_is_a_no_op() {
        let runner = RecordingRunner::new();
        let reporter = CapturingReporter::new();
        let merger = Merger::new(&runner, &reporter);

        let manifest = manifest_with_targets("out", vec![]);
        merger.merge(&manifest).unwrap();

        assert_eq!(runner.invocation_count(), 0);
    }

    #[test]
    fn test_merge_argument_vector() {
        let runner = RecordingRunner::new();
        let reporter = CapturingReporter::new();
        let merger = Merger::new(&runner, &reporter);

        let manifest =
            manifest_with_targets("out", vec![target(Sdk::Ios), target(Sdk::IosSimulator)]);
        merger.merge(&manifest).unwrap();

        let calls = runner.invocations();
        assert_eq!(calls.len(), 1);
        let expected = vec![
            "-create-xcframework",
            "-framework",
            "out/iOS.xcarchive/Products/Library/Frameworks/Lib.framework",
            "-framework",
            "out/iOSSimulator.xcarchive/Products/Library/Frameworks/Lib.framework",
            "-output",
            "out/Lib.xcframework",
        ];
        assert_eq!(calls[0], expected);
    }

    #[test]
    fn test_merge_removes_archives_on_success() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let archive = archive_path(&out, Sdk::Ios);
        fs::create_dir_all(&archive).unwrap();

        let runner = RecordingRunner::new();
        let reporter = CapturingReporter::new();
        let merger = Merger::new(&runner, &reporter);

        let manifest =
            manifest_with_targets(&out.display().to_string(), vec![target(Sdk::Ios)]);
        merger.merge(&manifest).unwrap();

        assert!(!archive.exists());
    }

    #[test]
    fn test_merge_launch_failure_skips_cleanup() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let archive = archive_path(&out, Sdk::Ios);
        fs::create_dir_all(&archive).unwrap();

        let runner = RecordingRunner::new();
        runner.fail_with(FailureMode::SpawnFailure);
        let reporter = CapturingReporter::new();
        let merger = Merger::new(&runner, &reporter);

        let manifest =
            manifest_with_targets(&out.display().to_string(), vec![target(Sdk::Ios)]);
        let result = merger.merge(&manifest);

        assert!(result.is_err());
        assert!(archive.exists(), "archives must survive a failed merge");
    }

    #[test]
    fn test_framework_and_bundle_paths() {
        assert_eq!(
            framework_path(Path::new("out/iOS.xcarchive"), "Lib"),
            PathBuf::from("out/iOS.xcarchive/Products/Library/Frameworks/Lib.framework")
        );
        assert_eq!(
            bundle_path(Path::new("out"), "Lib"),
            PathBuf::from("out/Lib.xcframework")
        );
    }
}
