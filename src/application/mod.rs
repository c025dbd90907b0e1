//! # Application Layer
//!
//! Ports and the chat session that coordinates history storage with the
//! completion endpoint.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
