//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Completion (Gemini over HTTP, scripted mock for offline use)
//! - Storage (JSON file for the active history and its archives)
//! - CLI API surface (container, router, controllers, history view)

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
