use async_trait::async_trait;

use crate::domain::{ArchiveName, DomainError, Message};

/// Persistence for the active chat history and its archives.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Returns an empty history when nothing has been saved yet.
    async fn load(&self) -> Result<Vec<Message>, DomainError>;

    /// Overwrites the stored history with `messages`.
    async fn save(&self, messages: &[Message]) -> Result<(), DomainError>;

    async fn exists(&self) -> Result<bool, DomainError>;

    /// Moves the active history aside under `name` and returns the file name
    /// actually used.
    async fn archive(&self, name: &ArchiveName) -> Result<String, DomainError>;

    /// Removes the active history. `Ok(false)` means there was nothing to remove.
    async fn delete(&self) -> Result<bool, DomainError>;
}
