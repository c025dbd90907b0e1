//! # Domain Layer
//!
//! Chat messages, history, archive naming and the error type.
//! This layer is independent of external frameworks and infrastructure.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
