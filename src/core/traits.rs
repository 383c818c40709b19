//! Core trait and wire types for the publishing API
//!
//! This module defines the typed surface of the five remote calls the
//! orchestrator needs, plus the JSON bodies they exchange. The trait is the
//! seam that lets tests drive the orchestrator against a recording mock.

use crate::core::error::Result;
use crate::core::request::ArtifactKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Wire types
// ============================================================================

/// Server-assigned edit session, one mutation transaction per run
#[derive(Debug, Clone, Deserialize)]
pub struct EditSession {
    /// The `editId` assigned by the API
    pub id: String,
}

/// Result of the artifact upload step
#[derive(Debug, Clone, Copy)]
pub struct UploadedArtifact {
    pub version_code: i64,
    pub kind: ArtifactKind,
}

/// One localized release-notes entry as the API expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub language: String,
    pub text: String,
}

/// A single release inside a track update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRelease {
    /// Version codes are transmitted as decimal strings
    pub version_codes: Vec<String>,

    /// "completed" for immediate availability, "inProgress" for staged rollout
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_fraction: Option<f64>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub release_notes: Vec<LocalizedText>,
}

/// Track update body: one track name, one release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub track: String,
    pub releases: Vec<TrackRelease>,
}

// ============================================================================
// Publishing API trait
// ============================================================================

/// Typed wrapper around the five publishing API calls
///
/// Each call is a single synchronous request/response with no internal
/// retry; a failed call propagates immediately to the orchestrator.
#[async_trait]
pub trait AndroidPublisherApi: Send + Sync {
    /// Open a new edit session for the package
    async fn insert_edit(&self, package_name: &str) -> Result<EditSession>;

    /// Upload the apk/aab under the edit and return its version code
    async fn upload_artifact(
        &self,
        package_name: &str,
        edit_id: &str,
        artifact_path: &Path,
        kind: ArtifactKind,
    ) -> Result<UploadedArtifact>;

    /// Upload a proguard deobfuscation file for the given version code
    async fn upload_deobfuscation(
        &self,
        package_name: &str,
        edit_id: &str,
        version_code: i64,
        deobfuscation_path: &Path,
    ) -> Result<()>;

    /// Replace the release list of one track
    async fn update_track(&self, package_name: &str, edit_id: &str, track: &Track) -> Result<()>;

    /// Commit the edit session, making all changes live
    async fn commit_edit(&self, package_name: &str, edit_id: &str) -> Result<()>;
}
