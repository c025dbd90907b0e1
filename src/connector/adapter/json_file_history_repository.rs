use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::HistoryRepository;
use crate::domain::{ArchiveName, DomainError, Message};

pub const HISTORY_FILE_NAME: &str = "chathistory.json";

/// Upper bound on `_<n>` suffixes tried when archives collide within a second.
const MAX_ARCHIVE_ATTEMPTS: u32 = 100;

/// Stores the active history as a JSON array of `{role, text}` objects in a
/// single file. Archives are renamed siblings of that file.
pub struct JsonFileHistoryRepository {
    dir: PathBuf,
    path: PathBuf,
}

impl JsonFileHistoryRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref().to_path_buf();
        let path = dir.join(HISTORY_FILE_NAME);
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryRepository for JsonFileHistoryRepository {
    async fn load(&self) -> Result<Vec<Message>, DomainError> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No chat history at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        // A literal `null` document is treated like a missing history.
        let messages: Option<Vec<Message>> = serde_json::from_str(&json)?;
        Ok(messages.unwrap_or_default())
    }

    async fn save(&self, messages: &[Message]) -> Result<(), DomainError> {
        fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(messages)?;
        fs::write(&self.path, json).await?;
        debug!("Saved {} messages to {}", messages.len(), self.path.display());
        Ok(())
    }

    async fn exists(&self) -> Result<bool, DomainError> {
        Ok(fs::try_exists(&self.path).await?)
    }

    async fn archive(&self, name: &ArchiveName) -> Result<String, DomainError> {
        if !self.exists().await? {
            return Err(DomainError::not_found(format!(
                "No chat history at {}",
                self.path.display()
            )));
        }

        for attempt in 1..=MAX_ARCHIVE_ATTEMPTS {
            let file_name = name.candidate(attempt);
            let target = self.dir.join(&file_name);
            if fs::try_exists(&target).await? {
                continue;
            }
            fs::rename(&self.path, &target).await?;
            return Ok(file_name);
        }

        Err(DomainError::internal(format!(
            "No free archive name for {}",
            name.file_name()
        )))
    }

    async fn delete(&self) -> Result<bool, DomainError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
