//! Error handling for Google Play publishing
//!
//! This module provides the terminal error kinds of a publish run
//! using the thiserror crate for ergonomic error handling.

use thiserror::Error;

/// Main error type for publish operations
///
/// Every kind is terminal: the run aborts at the point of failure and the
/// operator re-runs the whole tool after fixing the cause.
#[derive(Error, Debug)]
pub enum PublishError {
    // Argument / precondition errors
    #[error("引数エラー: {message}")]
    Argument { message: String },

    // Artifact kind errors
    #[error("サポートされていないアーティファクトです（.apk / .aab のみ）: {path}")]
    UnsupportedArtifact { path: String },

    // Security errors
    #[error("認証に失敗しました: {message}")]
    Authentication { message: String },

    // Network / remote API errors
    #[error("ネットワークエラーが発生しました: {message}")]
    Network { message: String },
}

impl PublishError {
    /// Build an argument error from any displayable message
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    /// Build an authentication error from any displayable message
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Build a network error from any displayable message
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Check if this error was raised before any remote call
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Argument { .. } | Self::UnsupportedArtifact { .. }
        )
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Argument { .. } => "ARGUMENT_ERROR",
            Self::UnsupportedArtifact { .. } => "UNSUPPORTED_ARTIFACT",
            Self::Authentication { .. } => "AUTHENTICATION_FAILED",
            Self::Network { .. } => "NETWORK_ERROR",
        }
    }
}

impl From<reqwest::Error> for PublishError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Network {
                message: format!("タイムアウトしました: {}", error),
            }
        } else {
            Self::Network {
                message: error.to_string(),
            }
        }
    }
}

impl From<std::io::Error> for PublishError {
    fn from(error: std::io::Error) -> Self {
        Self::Network {
            message: error.to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PublishError>;
