//! Pipeline orchestration.
//!
//! One run walks the state machine
//! Start → ManifestLoaded → OutputReset → Archived → Merged → Done,
//! dropping to Failed on the first fatal error:
//! - parse the manifest
//! - reset the output directory
//! - archive every target
//! - merge the archives into the bundle and clean up
//!
//! Errors propagate as `Result` up to the caller; only `main` decides the
//! process exit status.

use std::path::{Path, PathBuf};

use crate::archive::{ArchiveError, Archiver};
use crate::manifest::{Manifest, ManifestError};
use crate::merge::{self, MergeError, Merger};
use crate::report::Reporter;
use crate::stage;
use crate::tool::ToolRunner;

/// Conventional manifest location relative to the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = "xcbundle.toml";

/// Pipeline state enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    ManifestLoaded,
    OutputReset,
    Archived,
    Merged,
    Done,
    Failed,
}

impl PipelineState {
    /// Check if transition from this state to target is valid
    pub fn can_transition_to(&self, target: PipelineState) -> bool {
        use PipelineState::*;
        match (self, target) {
            (Start, ManifestLoaded) => true,
            (ManifestLoaded, OutputReset) => true,
            (OutputReset, Archived) => true,
            (Archived, Merged) => true,
            (Merged, Done) => true,

            // Any non-terminal state can fail
            (Start | ManifestLoaded | OutputReset | Archived | Merged, Failed) => true,

            // Done and Failed are terminal
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

/// Pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("no targets defined in the manifest")]
    NoTargets,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("invalid state transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: PipelineState,
        to: PipelineState,
    },
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Path to the build manifest
    pub manifest_path: PathBuf,

    /// Number of targets to archive concurrently (1 = strict manifest order)
    pub jobs: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            jobs: 1,
        }
    }
}

/// Drives one manifest-to-bundle run.
pub struct Pipeline<'a> {
    config: PipelineConfig,
    runner: &'a dyn ToolRunner,
    reporter: &'a dyn Reporter,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: PipelineConfig,
        runner: &'a dyn ToolRunner,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            config,
            runner,
            reporter,
            state: PipelineState::Start,
        }
    }

    /// Current pipeline state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Execute the full run. Returns the path of the created bundle.
    pub fn run(&mut self) -> PipelineResult<PathBuf> {
        match self.execute() {
            Ok(bundle) => {
                self.transition(PipelineState::Done)?;
                Ok(bundle)
            }
            Err(e) => {
                self.state = PipelineState::Failed;
                Err(e)
            }
        }
    }

    fn execute(&mut self) -> PipelineResult<PathBuf> {
        let manifest = Manifest::from_file(&self.config.manifest_path)?;
        self.transition(PipelineState::ManifestLoaded)?;
        self.reporter.info(&format!(
            "Loaded manifest: output_path: {}, framework: {}, {} target(s)",
            manifest.output_path,
            manifest.framework,
            manifest.targets.len()
        ));

        let output_dir = Path::new(&manifest.output_path).to_path_buf();
        stage::reset(&output_dir, self.reporter)?;
        self.transition(PipelineState::OutputReset)?;

        // A single invalid target only skips itself; a manifest with no
        // targets at all fails the whole run.
        if manifest.targets.is_empty() {
            return Err(PipelineError::NoTargets);
        }

        let archiver = Archiver::new(self.runner, self.reporter);
        archiver.archive_all(&manifest.targets, &output_dir, self.config.jobs)?;
        self.transition(PipelineState::Archived)?;

        let merger = Merger::new(self.runner, self.reporter);
        merger.merge(&manifest)?;
        self.transition(PipelineState::Merged)?;

        Ok(merge::bundle_path(&output_dir, &manifest.framework))
    }

    fn transition(&mut self, to: PipelineState) -> PipelineResult<()> {
        if !self.state.can_transition_to(to) {
            return Err(PipelineError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
