pub mod request_resolver;

pub use request_resolver::{RawRequest, RequestResolver};
