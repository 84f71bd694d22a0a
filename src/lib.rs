//! xcbundle - Manifest-driven XCFramework build orchestration
//!
//! This crate reads a declarative build manifest describing one or more
//! targets for a native framework project, drives `xcodebuild archive` per
//! target, then merges the archives into a single `.xcframework` bundle
//! with `xcodebuild -create-xcframework`.

pub mod archive;
pub mod manifest;
pub mod merge;
pub mod mock;
pub mod pipeline;
pub mod report;
pub mod stage;
pub mod tool;

pub use archive::{archive_path, ArchiveError, ArchiveOutcome, Archiver};
pub use manifest::{BuildSource, Manifest, ManifestError, Sdk, Target};
pub use merge::{bundle_path, framework_path, MergeError, Merger};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, PipelineState, DEFAULT_MANIFEST_PATH};
pub use report::{ConsoleReporter, Reporter};
pub use tool::{InvokeError, ToolRunner, XcodebuildRunner};
