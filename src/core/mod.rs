pub mod error;
pub mod request;
pub mod traits;

pub use error::*;
pub use request::*;
pub use traits::*;
