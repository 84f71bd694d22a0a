//! Per-target archiving.
//!
//! Builds the `xcodebuild archive` argument list for each target and runs
//! it through the tool runner, staging the target's archive directory
//! first. Targets without a workspace or project reference are soft-skipped
//! with a diagnostic; they never abort the run.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::manifest::{BuildSource, Sdk, Target};
use crate::report::Reporter;
use crate::stage;
use crate::tool::{InvokeError, ToolRunner};

/// Extension of a per-target archive directory.
pub const ARCHIVE_EXTENSION: &str = "xcarchive";

/// Archive path for an SDK under the output directory.
///
/// Pure function of its inputs. The archiver, the merger, and the merge
/// cleanup all recompute the archive path through here and must agree.
pub fn archive_path(output_dir: &Path, sdk: Sdk) -> PathBuf {
    output_dir.join(format!("{}.{}", sdk, ARCHIVE_EXTENSION))
}

/// Errors from archiving a target.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive staging failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("build failed: {0}")]
    Invoke(#[from] InvokeError),
}

/// Outcome of archiving a single target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Archived,
    /// Target had neither a workspace nor a project reference.
    Skipped,
}

/// Drives the external tool's `archive` step over build targets.
pub struct Archiver<'a> {
    runner: &'a dyn ToolRunner,
    reporter: &'a dyn Reporter,
}

impl<'a> Archiver<'a> {
    pub fn new(runner: &'a dyn ToolRunner, reporter: &'a dyn Reporter) -> Self {
        Self { runner, reporter }
    }

    /// Archive a single target into `output_dir`.
    ///
    /// The archive directory is reset first so a stale archive from a prior
    /// run cannot leak into this one.
    pub fn archive_target(
        &self,
        target: &Target,
        output_dir: &Path,
    ) -> Result<ArchiveOutcome, ArchiveError> {
        let archive = archive_path(output_dir, target.sdk);
        stage::reset(&archive, self.reporter)?;

        let mut args = vec!["-quiet".to_string(), "archive".to_string()];

        match target.source() {
            Some(BuildSource::Workspace(workspace)) => {
                args.push("-workspace".to_string());
                args.push(workspace.to_string());
            }
            Some(BuildSource::Project(project)) => {
                args.push("-project".to_string());
                args.push(project.to_string());
            }
            None => {
                self.reporter.warn(&format!(
                    "Skipping target with no workspace or project reference: {}",
                    target.describe()
                ));
                return Ok(ArchiveOutcome::Skipped);
            }
        }

        args.push("-sdk".to_string());
        args.push(target.sdk.platform_name().to_string());
        args.push("-scheme".to_string());
        args.push(target.scheme.clone());
        args.push("-archivePath".to_string());
        args.push(archive.display().to_string());
        args.push("SKIP_INSTALL=NO".to_string());

        self.reporter
            .info(&format!("Archiving for the {} SDK", target.sdk));

        self.runner.run(&args)?;

        self.reporter
            .info(&format!("Archiving completed for the target: {}", target.sdk));

        Ok(ArchiveOutcome::Archived)
    }

    /// Archive every target, `jobs` at a time.
    ///
    /// With `jobs == 1` targets are processed strictly in manifest order.
    /// With more, a pool of scoped worker threads pulls targets off a shared
    /// index; the per-target archive paths are disjoint, so no further
    /// coordination is needed. The first error wins; workers that already
    /// started keep draining their remaining targets.
    pub fn archive_all(
        &self,
        targets: &[Target],
        output_dir: &Path,
        jobs: usize,
    ) -> Result<(), ArchiveError> {
        if jobs <= 1 || targets.len() <= 1 {
            for target in targets {
                self.archive_target(target, output_dir)?;
            }
        } else {
            self.archive_parallel(targets, output_dir, jobs)?;
        }

        if !targets.is_empty() {
            self.reporter.info(&format!(
                "Archive completed for {}",
                if targets.len() > 1 { "all targets" } else { "a target" }
            ));
        }

        Ok(())
    }

    fn archive_parallel(
        &self,
        targets: &[Target],
        output_dir: &Path,
        jobs: usize,
    ) -> Result<(), ArchiveError> {
        let next = AtomicUsize::new(0);
        let workers = jobs.min(targets.len());
        let mut first_err: Option<ArchiveError> = None;

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(|| -> Result<(), ArchiveError> {
                        loop {
                            let index = next.fetch_add(1, Ordering::SeqCst);
                            let Some(target) = targets.get(index) else {
                                return Ok(());
                            };
                            self.archive_target(target, output_dir)?;
                        }
                    })
                })
                .collect();

            for handle in handles {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        if first_err.is_none() {
                            first_err = Some(e);
                        }
                    }
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
        });

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
