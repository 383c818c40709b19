//! Publish request descriptor
//!
//! An immutable, fully validated description of one publish run, built once
//! by the request resolver and passed explicitly to the orchestrator. There
//! is no ambient configuration state anywhere in the crate.

use crate::core::error::{PublishError, Result};
use std::path::{Path, PathBuf};

/// The track name that carries a staged-rollout fraction
pub const TRACK_ROLLOUT: &str = "rollout";

/// MIME type for APK uploads
pub const MIME_TYPE_APK: &str = "application/vnd.android.package-archive";

/// MIME type for App Bundle and deobfuscation file uploads
pub const MIME_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Kind of Android artifact, resolved from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Apk,
    Bundle,
}

impl ArtifactKind {
    /// Resolve the artifact kind from a file path
    ///
    /// Anything other than `.apk` / `.aab` fails before any network call.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("apk") => Ok(Self::Apk),
            Some("aab") => Ok(Self::Bundle),
            _ => Err(PublishError::UnsupportedArtifact {
                path: path.display().to_string(),
            }),
        }
    }

    /// MIME type used for the upload request body
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Apk => MIME_TYPE_APK,
            Self::Bundle => MIME_TYPE_OCTET_STREAM,
        }
    }

    /// Path segment of the upload endpoint (`apks` or `bundles`)
    pub fn upload_segment(&self) -> &'static str {
        match self {
            Self::Apk => "apks",
            Self::Bundle => "bundles",
        }
    }
}

/// One localized release-notes entry, in operator-supplied order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNote {
    /// BCP47 language code (e.g. "en-US")
    pub language: String,

    /// Full text of the release notes file
    pub text: String,
}

/// Immutable, validated publish request
///
/// Invariants (enforced by the resolver, relied upon by the orchestrator):
/// application name, package name and artifact path are non-empty; the
/// artifact and deobfuscation files exist; `rollout_fraction` is present and
/// in `[0, 1)` whenever `tracks` contains the rollout track.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Application name sent to the API, e.g. "MyCompany-Application/1.0"
    pub application_name: String,

    /// Package name of the app, e.g. "com.example.app"
    pub package_name: String,

    /// Absolute path to the apk/aab artifact
    pub artifact_path: PathBuf,

    /// Artifact kind resolved from the file extension
    pub artifact_kind: ArtifactKind,

    /// Absolute path to the proguard mapping file, if any
    pub deobfuscation_path: Option<PathBuf>,

    /// Target track names, deduplicated, first-seen order preserved.
    /// Empty means: upload and commit without assigning any track.
    pub tracks: Vec<String>,

    /// Staged rollout fraction, only meaningful for the rollout track
    pub rollout_fraction: Option<f64>,

    /// Localized release notes, in input order
    pub release_notes: Vec<ReleaseNote>,
}

impl PublishRequest {
    /// Check whether the rollout track was requested
    pub fn has_rollout_track(&self) -> bool {
        self.tracks.iter().any(|t| t == TRACK_ROLLOUT)
    }
}
