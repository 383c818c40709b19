//! Play Publisher - orchestrator for the publish protocol
//!
//! Executes the fixed edit-session protocol against the publishing API:
//! - open a new edit session
//! - upload the apk/aab artifact
//! - upload the proguard mapping file (optional)
//! - update each requested track with a release record
//! - commit the edit
//!
//! The steps are strictly sequential. The first failure aborts the run and
//! the orphaned edit session is abandoned on the server, never rolled back.

use crate::core::error::Result;
use crate::core::request::{ArtifactKind, PublishRequest, TRACK_ROLLOUT};
use crate::core::traits::{AndroidPublisherApi, LocalizedText, Track, TrackRelease};
use std::time::Instant;

/// Report returned after a successful publish run
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub package_name: String,
    pub edit_id: String,
    pub version_code: i64,
    pub tracks: Vec<String>,
    pub duration_ms: u64,
}

/// Orchestrator driving the publish protocol over any API implementation
pub struct PlayPublisher<A: AndroidPublisherApi> {
    api: A,
}

impl<A: AndroidPublisherApi> PlayPublisher<A> {
    /// Create a publisher over the given API client
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Run the whole publish protocol for one validated request
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishReport> {
        let start_time = Instant::now();
        let package_name = request.package_name.as_str();

        println!("📝 Creating a new edit session...");
        let edit = self.api.insert_edit(package_name).await?;
        println!("   Edit session created: {}", edit.id);

        match request.artifact_kind {
            ArtifactKind::Apk => println!("⬆️  Uploading apk file..."),
            ArtifactKind::Bundle => println!("⬆️  Uploading app bundle..."),
        }
        let uploaded = self
            .api
            .upload_artifact(
                package_name,
                &edit.id,
                &request.artifact_path,
                request.artifact_kind,
            )
            .await?;
        let version_code = uploaded.version_code;
        println!("   Uploaded version code: {}", version_code);

        if let Some(ref deobfuscation_path) = request.deobfuscation_path {
            println!("⬆️  Uploading mapping file...");
            self.api
                .upload_deobfuscation(package_name, &edit.id, version_code, deobfuscation_path)
                .await?;
            println!("   Mapping file uploaded");
        }

        if request.tracks.is_empty() {
            println!("ℹ️  No tracks requested, artifact will not be assigned to any track");
        } else {
            for track_name in &request.tracks {
                println!("🚀 Assigning release to track: {}", track_name);
                let track = Track {
                    track: track_name.clone(),
                    releases: vec![self.build_release(request, version_code, track_name)],
                };
                self.api.update_track(package_name, &edit.id, &track).await?;
            }
        }

        println!("✔️  Committing changes for edit {}...", edit.id);
        self.api.commit_edit(package_name, &edit.id).await?;

        Ok(PublishReport {
            package_name: request.package_name.clone(),
            edit_id: edit.id,
            version_code,
            tracks: request.tracks.clone(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// Build the release record for one track
    ///
    /// Only the rollout track carries a user fraction and runs `inProgress`;
    /// every other track is released as `completed`.
    fn build_release(
        &self,
        request: &PublishRequest,
        version_code: i64,
        track_name: &str,
    ) -> TrackRelease {
        let release_notes = request
            .release_notes
            .iter()
            .map(|note| LocalizedText {
                language: note.language.clone(),
                text: note.text.clone(),
            })
            .collect();

        if track_name == TRACK_ROLLOUT {
            TrackRelease {
                version_codes: vec![version_code.to_string()],
                status: "inProgress".to_string(),
                user_fraction: request.rollout_fraction,
                release_notes,
            }
        } else {
            TrackRelease {
                version_codes: vec![version_code.to_string()],
                status: "completed".to_string(),
                user_fraction: None,
                release_notes,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PublishError;
    use crate::core::request::ReleaseNote;
    use crate::core::traits::{EditSession, UploadedArtifact};
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Records every API call in order and can fail at a chosen step
    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<String>>,
        track_updates: Mutex<Vec<Track>>,
        fail_at: Option<&'static str>,
    }

    impl RecordingApi {
        fn failing_at(step: &'static str) -> Self {
            Self {
                fail_at: Some(step),
                ..Self::default()
            }
        }

        fn record(&self, call: &str) -> Result<()> {
            self.calls.lock().unwrap().push(call.to_string());
            let step = call.split(':').next().unwrap();
            if self.fail_at == Some(step) {
                return Err(PublishError::network(format!("injected failure at {}", step)));
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AndroidPublisherApi for RecordingApi {
        async fn insert_edit(&self, _package_name: &str) -> Result<EditSession> {
            self.record("insert_edit")?;
            Ok(EditSession {
                id: "edit-1".to_string(),
            })
        }

        async fn upload_artifact(
            &self,
            _package_name: &str,
            edit_id: &str,
            _artifact_path: &Path,
            kind: ArtifactKind,
        ) -> Result<UploadedArtifact> {
            self.record(&format!("upload_artifact:{}:{}", edit_id, kind.upload_segment()))?;
            Ok(UploadedArtifact {
                version_code: 42,
                kind,
            })
        }

        async fn upload_deobfuscation(
            &self,
            _package_name: &str,
            edit_id: &str,
            version_code: i64,
            _deobfuscation_path: &Path,
        ) -> Result<()> {
            self.record(&format!("upload_deobfuscation:{}:{}", edit_id, version_code))
        }

        async fn update_track(
            &self,
            _package_name: &str,
            edit_id: &str,
            track: &Track,
        ) -> Result<()> {
            self.record(&format!("update_track:{}:{}", edit_id, track.track))?;
            self.track_updates.lock().unwrap().push(track.clone());
            Ok(())
        }

        async fn commit_edit(&self, _package_name: &str, edit_id: &str) -> Result<()> {
            self.record(&format!("commit_edit:{}", edit_id))
        }
    }

    fn request(tracks: Vec<&str>, fraction: Option<f64>) -> PublishRequest {
        PublishRequest {
            application_name: "MyCompany-Application/1.0".to_string(),
            package_name: "com.example.app".to_string(),
            artifact_path: PathBuf::from("/builds/app.apk"),
            artifact_kind: ArtifactKind::Apk,
            deobfuscation_path: None,
            tracks: tracks.into_iter().map(str::to_string).collect(),
            rollout_fraction: fraction,
            release_notes: vec![],
        }
    }

    #[tokio::test]
    async fn test_apk_internal_track_call_order() {
        let api = RecordingApi::default();
        let publisher = PlayPublisher::new(api);

        let report = publisher
            .publish(&request(vec!["internal"], None))
            .await
            .unwrap();

        assert_eq!(
            publisher.api.calls(),
            vec![
                "insert_edit",
                "upload_artifact:edit-1:apks",
                "update_track:edit-1:internal",
                "commit_edit:edit-1",
            ]
        );
        assert_eq!(report.version_code, 42);
        assert_eq!(report.edit_id, "edit-1");

        let updates = publisher.api.track_updates.lock().unwrap();
        assert_eq!(updates[0].releases[0].status, "completed");
        assert_eq!(updates[0].releases[0].user_fraction, None);
        assert_eq!(updates[0].releases[0].version_codes, vec!["42"]);
    }

    #[tokio::test]
    async fn test_bundle_uses_bundles_endpoint() {
        let api = RecordingApi::default();
        let publisher = PlayPublisher::new(api);
        let mut req = request(vec!["internal"], None);
        req.artifact_path = PathBuf::from("/builds/app.aab");
        req.artifact_kind = ArtifactKind::Bundle;

        publisher.publish(&req).await.unwrap();

        assert!(publisher
            .api
            .calls()
            .contains(&"upload_artifact:edit-1:bundles".to_string()));
    }

    #[tokio::test]
    async fn test_rollout_track_carries_fraction() {
        let api = RecordingApi::default();
        let publisher = PlayPublisher::new(api);

        publisher
            .publish(&request(vec!["rollout"], Some(0.1)))
            .await
            .unwrap();

        let updates = publisher.api.track_updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].track, "rollout");
        assert_eq!(updates[0].releases[0].status, "inProgress");
        assert_eq!(updates[0].releases[0].user_fraction, Some(0.1));
    }

    #[tokio::test]
    async fn test_mixed_tracks_only_rollout_gets_fraction() {
        let api = RecordingApi::default();
        let publisher = PlayPublisher::new(api);

        publisher
            .publish(&request(vec!["production", "rollout"], Some(0.2)))
            .await
            .unwrap();

        let updates = publisher.api.track_updates.lock().unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].track, "production");
        assert_eq!(updates[0].releases[0].status, "completed");
        assert_eq!(updates[0].releases[0].user_fraction, None);
        assert_eq!(updates[1].track, "rollout");
        assert_eq!(updates[1].releases[0].user_fraction, Some(0.2));
    }

    #[tokio::test]
    async fn test_zero_tracks_still_commits() {
        let api = RecordingApi::default();
        let publisher = PlayPublisher::new(api);

        publisher.publish(&request(vec![], None)).await.unwrap();

        assert_eq!(
            publisher.api.calls(),
            vec![
                "insert_edit",
                "upload_artifact:edit-1:apks",
                "commit_edit:edit-1",
            ]
        );
    }

    #[tokio::test]
    async fn test_deobfuscation_uploaded_after_artifact() {
        let api = RecordingApi::default();
        let publisher = PlayPublisher::new(api);
        let mut req = request(vec!["internal"], None);
        req.deobfuscation_path = Some(PathBuf::from("/builds/mapping.txt"));

        publisher.publish(&req).await.unwrap();

        assert_eq!(
            publisher.api.calls(),
            vec![
                "insert_edit",
                "upload_artifact:edit-1:apks",
                "upload_deobfuscation:edit-1:42",
                "update_track:edit-1:internal",
                "commit_edit:edit-1",
            ]
        );
    }

    #[tokio::test]
    async fn test_release_notes_attached_to_every_track() {
        let api = RecordingApi::default();
        let publisher = PlayPublisher::new(api);
        let mut req = request(vec!["internal", "beta"], None);
        req.release_notes = vec![
            ReleaseNote {
                language: "en-US".to_string(),
                text: "English notes".to_string(),
            },
            ReleaseNote {
                language: "de-DE".to_string(),
                text: "Deutsche Notizen".to_string(),
            },
        ];

        publisher.publish(&req).await.unwrap();

        let updates = publisher.api.track_updates.lock().unwrap();
        for update in updates.iter() {
            let notes = &update.releases[0].release_notes;
            assert_eq!(notes.len(), 2);
            assert_eq!(notes[0].language, "en-US");
            assert_eq!(notes[1].language, "de-DE");
        }
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_before_commit() {
        let api = RecordingApi::failing_at("upload_artifact");
        let publisher = PlayPublisher::new(api);

        let error = publisher
            .publish(&request(vec!["internal"], None))
            .await
            .unwrap_err();

        assert_eq!(error.code(), "NETWORK_ERROR");
        let calls = publisher.api.calls();
        assert_eq!(calls.last().unwrap(), "upload_artifact:edit-1:apks");
        assert!(!calls.iter().any(|c| c.starts_with("commit_edit")));
    }

    #[tokio::test]
    async fn test_track_failure_skips_commit() {
        let api = RecordingApi::failing_at("update_track");
        let publisher = PlayPublisher::new(api);

        let error = publisher
            .publish(&request(vec!["internal", "beta"], None))
            .await
            .unwrap_err();

        assert_eq!(error.code(), "NETWORK_ERROR");
        let calls = publisher.api.calls();
        assert!(!calls.iter().any(|c| c.starts_with("commit_edit")));
        // first failing track update aborts the loop
        assert_eq!(
            calls
                .iter()
                .filter(|c| c.starts_with("update_track"))
                .count(),
            1
        );
    }
}
