pub mod credentials;

pub use credentials::{
    Credential, CredentialProvider, KeySource, ServiceAccountKey, ANDROID_PUBLISHER_SCOPE,
};
