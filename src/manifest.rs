//! Build manifest model (xcbundle.toml / xcbundle.json)
//!
//! Defines the manifest format and parsing for a bundle build: the output
//! directory, the framework name, and the ordered list of build targets.
//! Manifest-level validation happens at parse time; per-target source
//! validation is deferred to archive time so that the target sequence keeps
//! its order and count for diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Error types for manifest operations
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// SDK identifiers accepted in the manifest.
///
/// Each variant maps to a fixed `xcodebuild -sdk` platform string via
/// [`Sdk::platform_name`]. The manifest-facing name (also used for archive
/// directory naming) is the variant's `Display` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sdk {
    #[serde(rename = "iOS")]
    Ios,
    #[serde(rename = "iOSSimulator")]
    IosSimulator,
    #[serde(rename = "macOS")]
    MacOs,
    #[serde(rename = "tvOS")]
    TvOs,
    #[serde(rename = "tvOSSimulator")]
    TvOsSimulator,
    #[serde(rename = "watchOS")]
    WatchOs,
    #[serde(rename = "watchSimulator")]
    WatchSimulator,
}

impl Sdk {
    /// The `xcodebuild -sdk` platform string for this SDK.
    pub fn platform_name(&self) -> &'static str {
        match self {
            Sdk::Ios => "iphoneos",
            Sdk::IosSimulator => "iphonesimulator",
            Sdk::MacOs => "macosx",
            Sdk::TvOs => "appletvos",
            Sdk::TvOsSimulator => "appletvsimulator",
            Sdk::WatchOs => "watchos",
            Sdk::WatchSimulator => "watchsimulator",
        }
    }

    /// The manifest-facing name, e.g. `iOS`.
    pub fn name(&self) -> &'static str {
        match self {
            Sdk::Ios => "iOS",
            Sdk::IosSimulator => "iOSSimulator",
            Sdk::MacOs => "macOS",
            Sdk::TvOs => "tvOS",
            Sdk::TvOsSimulator => "tvOSSimulator",
            Sdk::WatchOs => "watchOS",
            Sdk::WatchSimulator => "watchSimulator",
        }
    }
}

impl fmt::Display for Sdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The build source a target archives from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildSource<'a> {
    Workspace(&'a str),
    Project(&'a str),
}

/// One build target: SDK, workspace-or-project reference, and scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// SDK to archive for
    pub sdk: Sdk,

    /// Workspace path (e.g. "MyLib.xcworkspace")
    /// Mutually exclusive with project
    pub workspace: Option<String>,

    /// Project path (e.g. "MyLib.xcodeproj")
    /// Mutually exclusive with workspace
    pub project: Option<String>,

    /// Scheme to archive
    pub scheme: String,
}

impl Target {
    /// The build source for this target, or `None` when neither a workspace
    /// nor a project reference is set (an invalid target, soft-skipped at
    /// archive time). When both are set the workspace wins.
    pub fn source(&self) -> Option<BuildSource<'_>> {
        if let Some(ref ws) = self.workspace {
            Some(BuildSource::Workspace(ws))
        } else {
            self.project.as_deref().map(BuildSource::Project)
        }
    }

    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> String {
        format!(
            "sdk: {}, workspace: {}, project: {}, scheme: {}",
            self.sdk,
            self.workspace.as_deref().unwrap_or("-"),
            self.project.as_deref().unwrap_or("-"),
            self.scheme,
        )
    }
}

/// Build manifest: output location, framework name, and targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Directory where archives are staged and the final bundle is placed
    pub output_path: String,

    /// Framework (artifact) name, without extension
    pub framework: String,

    /// Build targets, in archive order
    #[serde(default)]
    pub targets: Vec<Target>,
}

impl Manifest {
    /// Load and parse a manifest file. Files with a `.json` extension are
    /// parsed as JSON; everything else is parsed as TOML.
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Parse a manifest from a TOML string
    pub fn from_toml_str(s: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = toml::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse a manifest from a JSON string
    pub fn from_json_str(s: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_json::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate manifest-level invariants.
    ///
    /// Target source references are deliberately not checked here: an
    /// invalid target is skipped at archive time, not rejected at parse
    /// time.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.output_path.is_empty() {
            return Err(ManifestError::Validation(
                "'output_path' must not be empty".to_string(),
            ));
        }

        if self.framework.is_empty() {
            return Err(ManifestError::Validation(
                "'framework' must not be empty".to_string(),
            ));
        }

        for (index, target) in self.targets.iter().enumerate() {
            if target.scheme.is_empty() {
                return Err(ManifestError::Validation(format!(
                    "target {} ({}): 'scheme' must not be empty",
                    index, target.sdk
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
            output_path = "out"
            framework = "Lib"
        "#;

        let manifest = Manifest::from_toml_str(toml).unwrap();
        assert_eq!(manifest.output_path, "out");
        assert_eq!(manifest.framework, "Lib");
        assert!(manifest.targets.is_empty());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            output_path = "frameworks"
            framework = "MyLib"

            [[targets]]
            sdk = "iOS"
            workspace = "MyLib.xcworkspace"
            scheme = "MyLib"

            [[targets]]
            sdk = "iOSSimulator"
            project = "MyLib.xcodeproj"
            scheme = "MyLib"
        "#;

        let manifest = Manifest::from_toml_str(toml).unwrap();
        assert_eq!(manifest.targets.len(), 2);
        assert_eq!(manifest.targets[0].sdk, Sdk::Ios);
        assert_eq!(
            manifest.targets[0].source(),
            Some(BuildSource::Workspace("MyLib.xcworkspace"))
        );
        assert_eq!(manifest.targets[1].sdk, Sdk::IosSimulator);
        assert_eq!(
            manifest.targets[1].source(),
            Some(BuildSource::Project("MyLib.xcodeproj"))
        );
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "output_path": "out",
            "framework": "Lib",
            "targets": [
                { "sdk": "macOS", "workspace": "Lib.xcworkspace", "scheme": "Lib" }
            ]
        }"#;

        let manifest = Manifest::from_json_str(json).unwrap();
        assert_eq!(manifest.targets.len(), 1);
        assert_eq!(manifest.targets[0].sdk, Sdk::MacOs);
    }

    #[test]
    fn test_reject_empty_output_path() {
        let toml = r#"
            output_path = ""
            framework = "Lib"
        "#;

        let result = Manifest::from_toml_str(toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("output_path"));
    }

    #[test]
    fn test_reject_empty_framework() {
        let toml = r#"
            output_path = "out"
            framework = ""
        "#;

        let result = Manifest::from_toml_str(toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("framework"));
    }

    #[test]
    fn test_reject_missing_output_path() {
        let toml = r#"
            framework = "Lib"
        "#;

        assert!(Manifest::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_reject_empty_scheme() {
        let toml = r#"
            output_path = "out"
            framework = "Lib"

            [[targets]]
            sdk = "iOS"
            workspace = "Lib.xcworkspace"
            scheme = ""
        "#;

        let result = Manifest::from_toml_str(toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("scheme"));
    }

    #[test]
    fn test_reject_unknown_sdk() {
        let toml = r#"
            output_path = "out"
            framework = "Lib"

            [[targets]]
            sdk = "visionOS"
            workspace = "Lib.xcworkspace"
            scheme = "Lib"
        "#;

        assert!(Manifest::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_invalid_target_retained_at_parse_time() {
        // Neither workspace nor project: parse keeps the target so that
        // order and count survive for diagnostics. The skip happens later.
        let toml = r#"
            output_path = "out"
            framework = "Lib"

            [[targets]]
            sdk = "iOS"
            scheme = "Lib"

            [[targets]]
            sdk = "macOS"
            workspace = "Lib.xcworkspace"
            scheme = "Lib"
        "#;

        let manifest = Manifest::from_toml_str(toml).unwrap();
        assert_eq!(manifest.targets.len(), 2);
        assert!(manifest.targets[0].source().is_none());
        assert!(manifest.targets[1].source().is_some());
    }

    #[test]
    fn test_workspace_wins_over_project() {
        let target = Target {
            sdk: Sdk::Ios,
            workspace: Some("A.xcworkspace".to_string()),
            project: Some("A.xcodeproj".to_string()),
            scheme: "A".to_string(),
        };

        assert_eq!(
            target.source(),
            Some(BuildSource::Workspace("A.xcworkspace"))
        );
    }

    #[test]
    fn test_platform_name_mapping() {
        assert_eq!(Sdk::Ios.platform_name(), "iphoneos");
        assert_eq!(Sdk::IosSimulator.platform_name(), "iphonesimulator");
        assert_eq!(Sdk::MacOs.platform_name(), "macosx");
        assert_eq!(Sdk::TvOs.platform_name(), "appletvos");
        assert_eq!(Sdk::TvOsSimulator.platform_name(), "appletvsimulator");
        assert_eq!(Sdk::WatchOs.platform_name(), "watchos");
        assert_eq!(Sdk::WatchSimulator.platform_name(), "watchsimulator");
    }

    #[test]
    fn test_sdk_display_matches_manifest_name() {
        assert_eq!(Sdk::Ios.to_string(), "iOS");
        assert_eq!(Sdk::TvOsSimulator.to_string(), "tvOSSimulator");
    }
}
