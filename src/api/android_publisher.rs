//! Android Publisher API client
//!
//! Thin reqwest-based wrapper around the five calls the orchestrator needs.
//! Metadata calls carry JSON bodies, artifact and mapping uploads carry raw
//! bytes with the media upload endpoint. Every request runs with a fixed
//! 3-minute connect timeout and 3-minute read timeout; nothing is retried.

use crate::core::error::{PublishError, Result};
use crate::core::request::{ArtifactKind, MIME_TYPE_OCTET_STREAM};
use crate::core::traits::{AndroidPublisherApi, EditSession, Track, UploadedArtifact};
use crate::security::credentials::Credential;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::fs;

const API_BASE_URL: &str = "https://androidpublisher.googleapis.com/androidpublisher/v3";
const UPLOAD_BASE_URL: &str =
    "https://androidpublisher.googleapis.com/upload/androidpublisher/v3";

/// Connect and read timeout applied uniformly to every call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// Build the HTTP client shared by the credential exchange and API calls
pub fn http_client(application_name: &str) -> Result<Client> {
    Client::builder()
        .user_agent(application_name.to_string())
        .connect_timeout(REQUEST_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(PublishError::from)
}

/// Upload responses only carry the version code we need
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    version_code: i64,
}

/// Bearer-authenticated client for the publishing API
pub struct AndroidPublisherClient {
    client: Client,
    credential: Credential,
}

impl AndroidPublisherClient {
    /// Create a client from a shared HTTP client and a scoped credential
    pub fn new(client: Client, credential: Credential) -> Self {
        Self { client, credential }
    }

    /// Turn a non-2xx response into a network error with status and body
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(PublishError::network(format!("HTTP {}: {}", status, body)))
    }

    /// POST raw file bytes to a media upload endpoint
    async fn upload_bytes(&self, url: &str, path: &Path, mime_type: &str) -> Result<reqwest::Response> {
        let bytes = fs::read(path).await?;
        let response = self
            .client
            .post(url)
            .bearer_auth(self.credential.bearer_token())
            .header("Content-Type", mime_type)
            .body(bytes)
            .send()
            .await?;
        Self::check_status(response).await
    }
}

#[async_trait]
impl AndroidPublisherApi for AndroidPublisherClient {
    async fn insert_edit(&self, package_name: &str) -> Result<EditSession> {
        let url = urls::insert_edit(API_BASE_URL, package_name);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.credential.bearer_token())
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let session = Self::check_status(response).await?.json().await?;
        Ok(session)
    }

    async fn upload_artifact(
        &self,
        package_name: &str,
        edit_id: &str,
        artifact_path: &Path,
        kind: ArtifactKind,
    ) -> Result<UploadedArtifact> {
        let url = urls::upload_artifact(UPLOAD_BASE_URL, package_name, edit_id, kind);
        let response = self
            .upload_bytes(&url, artifact_path, kind.mime_type())
            .await?;

        let uploaded: UploadResponse = response.json().await?;
        Ok(UploadedArtifact {
            version_code: uploaded.version_code,
            kind,
        })
    }

    async fn upload_deobfuscation(
        &self,
        package_name: &str,
        edit_id: &str,
        version_code: i64,
        deobfuscation_path: &Path,
    ) -> Result<()> {
        let url = urls::upload_deobfuscation(UPLOAD_BASE_URL, package_name, edit_id, version_code);
        self.upload_bytes(&url, deobfuscation_path, MIME_TYPE_OCTET_STREAM)
            .await?;
        Ok(())
    }

    async fn update_track(&self, package_name: &str, edit_id: &str, track: &Track) -> Result<()> {
        let url = urls::update_track(API_BASE_URL, package_name, edit_id, &track.track);
        let response = self
            .client
            .put(&url)
            .bearer_auth(self.credential.bearer_token())
            .json(track)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn commit_edit(&self, package_name: &str, edit_id: &str) -> Result<()> {
        let url = urls::commit_edit(API_BASE_URL, package_name, edit_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.credential.bearer_token())
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }
}

/// Endpoint URL construction, kept separate so tests can pin the paths
mod urls {
    use crate::core::request::ArtifactKind;

    pub fn insert_edit(base: &str, package_name: &str) -> String {
        format!("{}/applications/{}/edits", base, package_name)
    }

    pub fn upload_artifact(
        base: &str,
        package_name: &str,
        edit_id: &str,
        kind: ArtifactKind,
    ) -> String {
        format!(
            "{}/applications/{}/edits/{}/{}?uploadType=media",
            base,
            package_name,
            edit_id,
            kind.upload_segment()
        )
    }

    pub fn upload_deobfuscation(
        base: &str,
        package_name: &str,
        edit_id: &str,
        version_code: i64,
    ) -> String {
        format!(
            "{}/applications/{}/edits/{}/apks/{}/deobfuscationFiles/proguard?uploadType=media",
            base, package_name, edit_id, version_code
        )
    }

    pub fn update_track(base: &str, package_name: &str, edit_id: &str, track: &str) -> String {
        format!(
            "{}/applications/{}/edits/{}/tracks/{}",
            base, package_name, edit_id, track
        )
    }

    pub fn commit_edit(base: &str, package_name: &str, edit_id: &str) -> String {
        format!("{}/applications/{}/edits/{}:commit", base, package_name, edit_id)
    }
}
