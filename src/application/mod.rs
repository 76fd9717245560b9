//! Application layer: REST clients and endpoint resolution
//!
//! This layer talks to remote services through the I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
