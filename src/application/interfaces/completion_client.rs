use async_trait::async_trait;

use crate::domain::{CompletionReply, DomainError};

/// Sends a single prompt to a hosted language model.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. [`crate::application::ChatSession`] only sees the reply shape.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<CompletionReply, DomainError>;
}
