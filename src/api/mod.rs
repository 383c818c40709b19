//! Remote client layer for the Android Publisher API

pub mod android_publisher;

pub use android_publisher::{http_client, AndroidPublisherClient};
