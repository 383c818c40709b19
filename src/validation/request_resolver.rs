//! Request resolver - validates operator input into a publish request
//!
//! This module turns raw CLI input into an immutable [`PublishRequest`]:
//! - non-empty checks for application name, package name and artifact path
//! - path resolution against the program directory and existence checks
//! - artifact kind resolution from the file extension
//! - rollout fraction range validation
//! - release-notes listings parsing and file loading
//! - credential key source resolution (file path vs inline JSON)
//!
//! All checks run before any network call is attempted.

use crate::core::error::{PublishError, Result};
use crate::core::request::{ArtifactKind, PublishRequest, ReleaseNote, TRACK_ROLLOUT};
use crate::security::credentials::KeySource;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Raw operator input, exactly as received from the CLI
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    /// Application name, e.g. "MyCompany-Application/1.0"
    pub application_name: String,

    /// Package name of the app
    pub package_name: String,

    /// Service account key.json file path or file content as text
    pub json_key: String,

    /// File path to the apk/aab artifact
    pub artifact_path: String,

    /// File path to the deobfuscation file, if any
    pub deobfuscation_path: Option<String>,

    /// Recent changes in format `lang::path,lang::path`
    pub listings: Option<String>,

    /// Comma-separated track names; None means no track assignment
    pub tracks: Option<String>,

    /// Staged rollout fraction
    pub rollout_fraction: Option<f64>,
}

/// Resolves and validates raw input into a publish request
pub struct RequestResolver {
    /// Directory relative paths are resolved against
    base_dir: PathBuf,
}

impl RequestResolver {
    /// Create a resolver with the given base directory
    ///
    /// # Arguments
    ///
    /// * `base_dir` - Directory used to resolve relative paths, normally the
    ///   directory containing the running executable
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Validate everything and build the request plus the credential source
    ///
    /// Fails fast with an argument error on the first violated rule; no
    /// remote call is issued here or anywhere before this succeeds.
    pub async fn resolve(&self, raw: RawRequest) -> Result<(PublishRequest, KeySource)> {
        if raw.application_name.trim().is_empty() {
            return Err(PublishError::argument(
                "アプリケーション名を指定してください",
            ));
        }
        if raw.package_name.trim().is_empty() {
            return Err(PublishError::argument("パッケージ名を指定してください"));
        }
        if raw.artifact_path.trim().is_empty() {
            return Err(PublishError::argument(
                "apk/aabファイルのパスを指定してください",
            ));
        }

        let tracks = self.parse_tracks(raw.tracks.as_deref())?;

        let artifact_path = self
            .require_file(&raw.artifact_path, "apk/aabファイル")
            .await?;
        let artifact_kind = ArtifactKind::from_path(&artifact_path)?;

        let deobfuscation_path = match raw.deobfuscation_path.as_deref() {
            Some(path) if !path.trim().is_empty() => {
                Some(self.require_file(path, "マッピング（難読化解除）ファイル").await?)
            }
            _ => None,
        };

        if tracks.iter().any(|t| t == TRACK_ROLLOUT) {
            let fraction = raw.rollout_fraction.ok_or_else(|| {
                PublishError::argument("rolloutトラックにはフラクションの指定が必要です")
            })?;
            // NaN fails this check as well
            if !(fraction >= 0.0 && fraction < 1.0) {
                return Err(PublishError::argument(format!(
                    "フラクションは 0 <= fraction < 1 の範囲で指定してください（指定値: {}）",
                    fraction
                )));
            }
        }

        let release_notes = match raw.listings.as_deref() {
            Some(listings) if !listings.trim().is_empty() => {
                self.parse_listings(listings).await?
            }
            _ => Vec::new(),
        };

        let key_source = self.resolve_key_source(&raw.json_key).await?;

        Ok((
            PublishRequest {
                application_name: raw.application_name,
                package_name: raw.package_name,
                artifact_path,
                artifact_kind,
                deobfuscation_path,
                tracks,
                rollout_fraction: raw.rollout_fraction,
                release_notes,
            },
            key_source,
        ))
    }

    /// Resolve a possibly-relative path against the base directory
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path.trim());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Resolve a path and require that the file exists
    async fn require_file(&self, path: &str, what: &str) -> Result<PathBuf> {
        let resolved = self.resolve_path(path);
        if fs::metadata(&resolved).await.is_err() {
            return Err(PublishError::argument(format!(
                "{}が見つかりません: {}",
                what,
                resolved.display()
            )));
        }
        Ok(resolved)
    }

    /// Parse the comma-separated track list
    ///
    /// Duplicates are dropped, first-seen order is kept. An omitted flag
    /// means no track assignment; a supplied but empty value is an error.
    fn parse_tracks(&self, tracks: Option<&str>) -> Result<Vec<String>> {
        let Some(tracks) = tracks else {
            return Ok(Vec::new());
        };

        let mut resolved: Vec<String> = Vec::new();
        for name in tracks.split(',') {
            let name = name.trim();
            if name.is_empty() {
                return Err(PublishError::argument(format!(
                    "トラック名が不正です: {}",
                    tracks
                )));
            }
            if !resolved.iter().any(|t| t == name) {
                resolved.push(name.to_string());
            }
        }

        if resolved.is_empty() {
            return Err(PublishError::argument(
                "トラックを1つ以上指定してください",
            ));
        }

        Ok(resolved)
    }

    /// Parse `lang::path,lang::path` listings and load each file as UTF-8
    async fn parse_listings(&self, listings: &str) -> Result<Vec<ReleaseNote>> {
        let mut notes = Vec::new();

        for entry in listings.trim().split(',') {
            let pieces: Vec<&str> = entry.split("::").map(str::trim).collect();
            if pieces.len() != 2 || pieces[0].is_empty() || pieces[1].is_empty() {
                return Err(PublishError::argument(format!(
                    "リリースノートの指定が不正です: {}",
                    entry.trim()
                )));
            }

            let language = pieces[0].to_string();
            let path = self.resolve_path(pieces[1]);
            let text = fs::read_to_string(&path).await.map_err(|_| {
                PublishError::argument(format!(
                    "言語 \"{}\" のリリースノートファイルが見つかりません: {}",
                    language,
                    path.display()
                ))
            })?;

            notes.push(ReleaseNote { language, text });
        }

        Ok(notes)
    }

    /// Decide between inline JSON key material and a key file path
    ///
    /// Content starting with `{` is treated as inline JSON, anything else as
    /// a file path that must exist.
    async fn resolve_key_source(&self, json_key: &str) -> Result<KeySource> {
        let trimmed = json_key.trim();
        if trimmed.is_empty() {
            return Err(PublishError::argument(
                "サービスアカウントキーを指定してください",
            ));
        }

        if trimmed.starts_with('{') {
            Ok(KeySource::Inline(trimmed.to_string()))
        } else {
            let path = self
                .require_file(trimmed, "サービスアカウントキーファイル")
                .await?;
            Ok(KeySource::File(path))
        }
    }
}
