pub mod api;
pub mod core;
pub mod orchestration;
pub mod security;
pub mod validation;

pub use crate::api::{http_client, AndroidPublisherClient};
pub use crate::core::error::{PublishError, Result};
pub use crate::core::request::{ArtifactKind, PublishRequest, ReleaseNote};
pub use crate::core::traits::{
    AndroidPublisherApi, EditSession, LocalizedText, Track, TrackRelease, UploadedArtifact,
};
pub use crate::orchestration::{PlayPublisher, PublishReport};
pub use crate::security::{Credential, CredentialProvider, KeySource, ServiceAccountKey};
pub use crate::validation::{RawRequest, RequestResolver};
