use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::CompletionClient;
use crate::domain::{CompletionReply, DomainError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Text(String),
    Empty,
    Unexpected(String),
    Fail(String),
}

/// Offline [`CompletionClient`] that plays back scripted replies, then echoes.
pub struct MockCompletionClient {
    script: Mutex<VecDeque<MockReply>>,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            ..Self::new()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push_reply(&self, reply: MockReply) {
        self.script.lock().await.push_back(reply);
    }

    /// Prompts received so far, in order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionReply, DomainError> {
        self.prompts.lock().await.push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.script.lock().await.pop_front();
        debug!("Mock completion for {:?}: {:?}", prompt, reply);

        match reply {
            Some(MockReply::Text(text)) => Ok(CompletionReply::Text(text)),
            Some(MockReply::Empty) => Ok(CompletionReply::Empty),
            Some(MockReply::Unexpected(detail)) => Ok(CompletionReply::Unexpected(detail)),
            Some(MockReply::Fail(message)) => Err(DomainError::completion(message)),
            None => Ok(CompletionReply::Text(format!("Echo: {prompt}"))),
        }
    }
}
