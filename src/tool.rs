//! External toolchain seam.
//!
//! The pipeline never compiles anything itself; it drives `xcodebuild`
//! through the [`ToolRunner`] trait. Production code uses
//! [`XcodebuildRunner`]; tests substitute a recording runner.

use std::io;
use std::process::Command;

/// Name of the external build tool.
pub const XCODEBUILD: &str = "xcodebuild";

/// Errors from launching or running the external tool.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The tool launched but exited with a non-zero status.
    #[error("{tool} exited with status {code:?}")]
    Failed { tool: String, code: Option<i32> },
}

/// Synchronous runner for the external build tool.
///
/// `run` blocks until the child process exits. No timeout is applied: a
/// hung tool hangs the pipeline.
pub trait ToolRunner: Sync {
    fn run(&self, args: &[String]) -> Result<(), InvokeError>;
}

/// Runs `xcodebuild` with inherited stdio.
#[derive(Debug, Default)]
pub struct XcodebuildRunner;

impl ToolRunner for XcodebuildRunner {
    fn run(&self, args: &[String]) -> Result<(), InvokeError> {
        let status = Command::new(XCODEBUILD)
            .args(args)
            .status()
            .map_err(|source| InvokeError::Spawn {
                tool: XCODEBUILD.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InvokeError::Failed {
                tool: XCODEBUILD.to_string(),
                code: status.code(),
            })
        }
    }
}
