use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::application::{ChatSession, CompletionClient, HistoryRepository};
use crate::domain::{CompletionReply, DomainError};
use crate::{GeminiClient, JsonFileHistoryRepository, MockCompletionClient};

pub struct ContainerConfig {
    pub data_dir: String,
    /// Overrides `GEMINI_MODEL` when set.
    pub model: Option<String>,
    /// Use the scripted offline client instead of the Gemini API.
    pub mock: bool,
    pub timeout: Duration,
}

pub struct Container {
    history_repo: Arc<JsonFileHistoryRepository>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let data_dir = PathBuf::from(&config.data_dir);
        std::fs::create_dir_all(&data_dir)?;

        let history_repo = Arc::new(JsonFileHistoryRepository::new(&data_dir));
        debug!("Using chat history at {}", history_repo.path().display());

        Ok(Self {
            history_repo,
            config,
        })
    }

    pub fn history_repository(&self) -> Arc<dyn HistoryRepository> {
        self.history_repo.clone()
    }

    /// Build the completion client. Fails when the API key is missing.
    pub fn completion_client(&self) -> Result<Arc<dyn CompletionClient>> {
        if self.config.mock {
            debug!("Using mock completion client");
            return Ok(Arc::new(MockCompletionClient::new()));
        }

        let mut client = GeminiClient::from_env()?.with_timeout(self.config.timeout);
        if let Some(model) = self.config.model.as_deref() {
            client = client.with_model(model);
        }
        debug!(
            "Using Gemini model {} at {}",
            client.model(),
            client.endpoint()
        );
        Ok(Arc::new(client))
    }

    /// Session able to submit prompts.
    pub async fn session(&self) -> Result<ChatSession> {
        let client = self.completion_client()?;
        Ok(ChatSession::open(self.history_repository(), client).await)
    }

    /// Session for commands that only touch stored history; no API key needed.
    pub async fn history_session(&self) -> ChatSession {
        ChatSession::open(self.history_repository(), Arc::new(UnconfiguredClient)).await
    }
}

struct UnconfiguredClient;

#[async_trait]
impl CompletionClient for UnconfiguredClient {
    async fn complete(&self, _prompt: &str) -> Result<CompletionReply, DomainError> {
        Err(DomainError::configuration(
            "completions are not available for this command",
        ))
    }
}
