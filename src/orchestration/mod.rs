//! Orchestration layer for the publish protocol
//!
//! This module drives the fixed sequence of remote calls that makes up one
//! publish run against the Android Publisher API.

pub mod publisher;

// Re-export main types for convenience
pub use publisher::{PlayPublisher, PublishReport};
