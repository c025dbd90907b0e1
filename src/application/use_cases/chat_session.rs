use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::application::{format_response, CompletionClient, HistoryRepository};
use crate::domain::{
    ArchiveName, ChatHistory, CompletionOutcome, CompletionReply, DomainError, Message, Notice,
    EMPTY_RESPONSE_TEXT, ERROR_PREFIX, UNEXPECTED_RESPONSE_TEXT,
};

pub const EMPTY_PROMPT_MESSAGE: &str = "Field cannot be empty";

/// A completion running on a background task.
///
/// The result is delivered back to whoever owns the [`ChatSession`], which
/// then applies it with [`ChatSession::resolve`]. The session is never
/// touched from the background task.
///
/// The session counts as busy for as long as this value is alive. Dropping it
/// without waiting, for example when a caller's timeout fires, frees the
/// session for the next prompt.
pub struct PendingCompletion {
    receiver: oneshot::Receiver<CompletionOutcome>,
    _slot: InFlightSlot,
}

impl PendingCompletion {
    pub async fn wait(self) -> CompletionOutcome {
        self.receiver
            .await
            .unwrap_or_else(|_| Err(DomainError::internal("completion task ended without a result")))
    }
}

/// Releases the session's in-flight ticket on drop, unless the session has
/// already moved on to another ticket.
struct InFlightSlot {
    current: Arc<AtomicU64>,
    ticket: u64,
}

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        let _ = self
            .current
            .compare_exchange(self.ticket, NO_TICKET, Ordering::AcqRel, Ordering::Acquire);
    }
}

const NO_TICKET: u64 = 0;

/// Owns the active chat history and drives every mutation of it.
///
/// Each mutation is followed by a full rewrite of the stored history. Storage
/// failures never abort an operation: they are logged and queued as
/// [`Notice`]s for the presentation layer, and the in-memory copy is kept.
pub struct ChatSession {
    history: ChatHistory,
    repository: Arc<dyn HistoryRepository>,
    client: Arc<dyn CompletionClient>,
    in_flight: Arc<AtomicU64>,
    next_ticket: u64,
    notices: Vec<Notice>,
}

impl ChatSession {
    /// Load the stored history. A failed load starts from an empty history
    /// and queues [`Notice::LoadFailed`].
    pub async fn open(
        repository: Arc<dyn HistoryRepository>,
        client: Arc<dyn CompletionClient>,
    ) -> Self {
        let mut notices = Vec::new();
        let history = match repository.load().await {
            Ok(messages) => {
                debug!("Loaded {} messages from chat history", messages.len());
                ChatHistory::from_messages(messages)
            }
            Err(e) => {
                error!("Error loading chat history: {}", e);
                notices.push(Notice::LoadFailed);
                ChatHistory::new()
            }
        };

        Self {
            history,
            repository,
            client,
            in_flight: Arc::new(AtomicU64::new(NO_TICKET)),
            next_ticket: NO_TICKET,
            notices,
        }
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) != NO_TICKET
    }

    /// Drain the notices queued since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Record the user's prompt and start its completion.
    ///
    /// Rejects blank prompts and, while a previous completion is unresolved,
    /// any prompt at all. Neither rejection changes the history.
    pub async fn submit(&mut self, prompt: &str) -> Result<PendingCompletion, DomainError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(DomainError::invalid_input(EMPTY_PROMPT_MESSAGE));
        }
        if self.is_pending() {
            return Err(DomainError::Busy);
        }

        self.history.push(Message::user(prompt));
        self.persist().await;
        let slot = self.take_slot();

        let (sender, receiver) = oneshot::channel();
        let client = Arc::clone(&self.client);
        let prompt = prompt.to_string();
        tokio::spawn(async move {
            let outcome = client.complete(&prompt).await;
            if sender.send(outcome).is_err() {
                debug!("Completion finished after its receiver was dropped");
            }
        });

        Ok(PendingCompletion {
            receiver,
            _slot: slot,
        })
    }

    fn take_slot(&mut self) -> InFlightSlot {
        self.next_ticket = self.next_ticket.wrapping_add(1).max(1);
        self.in_flight.store(self.next_ticket, Ordering::Release);
        InFlightSlot {
            current: Arc::clone(&self.in_flight),
            ticket: self.next_ticket,
        }
    }

    /// Forget any completion still in flight. Its reply can still be
    /// resolved, but it no longer blocks new prompts.
    fn release_in_flight(&mut self) {
        if self.in_flight.swap(NO_TICKET, Ordering::AcqRel) != NO_TICKET {
            debug!("Releasing an unresolved completion");
        }
    }

    /// Append exactly one model message for `outcome` and persist.
    pub async fn resolve(&mut self, outcome: CompletionOutcome) -> Message {
        let message = match outcome {
            Ok(CompletionReply::Text(text)) => {
                debug!("Model response: {}", text);
                let formatted = format_response(&text);
                if formatted.is_empty() {
                    warn!("Model response was empty after formatting");
                    Message::model(EMPTY_RESPONSE_TEXT)
                } else {
                    Message::model(formatted)
                }
            }
            Ok(CompletionReply::Empty) => {
                error!("Response text is empty");
                Message::model(EMPTY_RESPONSE_TEXT)
            }
            Ok(CompletionReply::Unexpected(detail)) => {
                error!("Unexpected response shape: {}", detail);
                Message::model(UNEXPECTED_RESPONSE_TEXT)
            }
            Err(e) => {
                error!("Error generating content: {}", e);
                Message::model(format!("{ERROR_PREFIX}{e}"))
            }
        };

        self.history.push(message.clone());
        self.persist().await;
        message
    }

    /// Submit `prompt` and wait for its reply.
    pub async fn send(&mut self, prompt: &str) -> Result<Message, DomainError> {
        let pending = self.submit(prompt).await?;
        let outcome = pending.wait().await;
        Ok(self.resolve(outcome).await)
    }

    /// Archive the current chat (when there is one on disk) and start over.
    pub async fn new_chat(&mut self, name: ArchiveName) {
        self.release_in_flight();
        if self.stored_history_exists().await && !self.history.is_empty() {
            match self.repository.archive(&name).await {
                Ok(file_name) => {
                    info!("Current chat archived to {}", file_name);
                    self.notices.push(Notice::Archived(file_name));
                }
                Err(e) => {
                    error!("Could not archive current chat: {}", e);
                    self.notices.push(Notice::ArchiveFailed);
                }
            }
        }

        self.history.clear();
        if let Err(e) = self.repository.delete().await {
            error!("Could not delete old current chat file for new session: {}", e);
        }
        self.notices.push(Notice::NewChatStarted);
    }

    /// Clear the current chat without archiving it.
    pub async fn delete_chat(&mut self) {
        self.release_in_flight();
        self.history.clear();
        let notice = match self.repository.delete().await {
            Ok(true) => {
                info!("Current chat history file deleted");
                Notice::HistoryDeleted
            }
            Ok(false) => Notice::HistoryCleared,
            Err(e) => {
                error!("Could not delete chat history file: {}", e);
                Notice::DeleteFailed
            }
        };
        self.notices.push(notice);
    }

    async fn stored_history_exists(&self) -> bool {
        match self.repository.exists().await {
            Ok(exists) => exists,
            Err(e) => {
                warn!("Could not check for stored chat history: {}", e);
                false
            }
        }
    }

    async fn persist(&mut self) {
        if let Err(e) = self.repository.save(self.history.messages()).await {
            error!("Error saving chat history: {}", e);
            self.notices.push(Notice::SaveFailed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MemoryHistory {
        stored: Mutex<Option<Vec<Message>>>,
        archives: Mutex<Vec<String>>,
        fail_load: bool,
        fail_save: bool,
    }

    #[async_trait]
    impl HistoryRepository for MemoryHistory {
        async fn load(&self) -> Result<Vec<Message>, DomainError> {
            if self.fail_load {
                return Err(DomainError::serialization("malformed"));
            }
            Ok(self.stored.lock().await.clone().unwrap_or_default())
        }

        async fn save(&self, messages: &[Message]) -> Result<(), DomainError> {
            if self.fail_save {
                return Err(DomainError::Io(std::io::Error::other("disk full")));
            }
            *self.stored.lock().await = Some(messages.to_vec());
            Ok(())
        }

        async fn exists(&self) -> Result<bool, DomainError> {
            Ok(self.stored.lock().await.is_some())
        }

        async fn archive(&self, name: &ArchiveName) -> Result<String, DomainError> {
            let mut stored = self.stored.lock().await;
            if stored.take().is_none() {
                return Err(DomainError::not_found("no history"));
            }
            let file_name = name.file_name();
            self.archives.lock().await.push(file_name.clone());
            Ok(file_name)
        }

        async fn delete(&self) -> Result<bool, DomainError> {
            Ok(self.stored.lock().await.take().is_some())
        }
    }

    struct FixedClient(Result<CompletionReply, String>);

    #[async_trait]
    impl CompletionClient for FixedClient {
        async fn complete(&self, _prompt: &str) -> Result<CompletionReply, DomainError> {
            self.0.clone().map_err(DomainError::completion)
        }
    }

    fn text_client(text: &str) -> Arc<dyn CompletionClient> {
        Arc::new(FixedClient(Ok(CompletionReply::Text(text.to_string()))))
    }

    #[tokio::test]
    async fn test_send_appends_user_and_model_messages() {
        let repo = Arc::new(MemoryHistory::default());
        let mut session = ChatSession::open(repo.clone(), text_client("Hi there")).await;

        let reply = session.send("  Hello ").await.unwrap();

        assert_eq!(reply, Message::model("Hi there"));
        assert_eq!(
            session.history().messages(),
            &[Message::user("Hello"), Message::model("Hi there")]
        );
        assert_eq!(repo.stored.lock().await.as_ref().map(|m| m.len()), Some(2));
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_blank_prompt_is_rejected_without_changes() {
        let repo = Arc::new(MemoryHistory::default());
        let mut session = ChatSession::open(repo.clone(), text_client("x")).await;

        let err = session.submit("   ").await.err().unwrap();

        assert!(err.is_invalid_input());
        assert!(session.history().is_empty());
        assert!(repo.stored.lock().await.is_none());
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_busy() {
        let repo = Arc::new(MemoryHistory::default());
        let mut session = ChatSession::open(repo, text_client("reply")).await;

        let pending = session.submit("first").await.unwrap();
        let err = session.submit("second").await.err().unwrap();
        assert!(err.is_busy());
        assert_eq!(session.history().len(), 1);

        let outcome = pending.wait().await;
        session.resolve(outcome).await;
        assert_eq!(session.history().len(), 2);
        assert!(session.submit("third").await.is_ok());
    }

    #[tokio::test]
    async fn test_dropping_pending_completion_frees_session() {
        let repo = Arc::new(MemoryHistory::default());
        let mut session = ChatSession::open(repo, text_client("reply")).await;

        let pending = session.submit("first").await.unwrap();
        assert!(session.is_pending());
        drop(pending);

        assert!(!session.is_pending());
        let reply = session.send("second").await.unwrap();
        assert_eq!(reply.text(), "reply");
    }

    #[tokio::test]
    async fn test_new_chat_and_delete_release_pending() {
        let repo = Arc::new(MemoryHistory::default());
        let mut session = ChatSession::open(repo, text_client("reply")).await;

        let stale = session.submit("first").await.unwrap();
        session.new_chat(ArchiveName::now()).await;
        assert!(!session.is_pending());

        let current = session.submit("second").await.unwrap();
        drop(stale);
        assert!(session.is_pending());
        let err = session.submit("third").await.err().unwrap();
        assert!(err.is_busy());

        session.delete_chat().await;
        assert!(!session.is_pending());
        drop(current);
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_failure_becomes_error_message() {
        let repo = Arc::new(MemoryHistory::default());
        let client = Arc::new(FixedClient(Err("timeout".to_string())));
        let mut session = ChatSession::open(repo, client).await;

        let reply = session.send("Y").await.unwrap();
        assert_eq!(reply.text(), "Error: timeout");
    }

    #[tokio::test]
    async fn test_formatting_to_nothing_uses_placeholder() {
        let repo = Arc::new(MemoryHistory::default());
        let mut session = ChatSession::open(repo, text_client("** **")).await;

        let reply = session.send("X").await.unwrap();
        assert_eq!(reply.text(), EMPTY_RESPONSE_TEXT);
    }

    #[tokio::test]
    async fn test_unexpected_reply_uses_placeholder() {
        let repo = Arc::new(MemoryHistory::default());
        let client = Arc::new(FixedClient(Ok(CompletionReply::Unexpected(
            "SAFETY".to_string(),
        ))));
        let mut session = ChatSession::open(repo, client).await;

        let reply = session.send("Z").await.unwrap();
        assert_eq!(reply.text(), UNEXPECTED_RESPONSE_TEXT);
    }

    #[tokio::test]
    async fn test_load_failure_starts_empty_with_notice() {
        let repo = Arc::new(MemoryHistory {
            fail_load: true,
            ..Default::default()
        });
        let mut session = ChatSession::open(repo, text_client("x")).await;

        assert!(session.history().is_empty());
        assert_eq!(session.take_notices(), vec![Notice::LoadFailed]);
        assert!(session.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_keeps_memory_and_notifies() {
        let repo = Arc::new(MemoryHistory {
            fail_save: true,
            ..Default::default()
        });
        let mut session = ChatSession::open(repo, text_client("ok")).await;

        session.send("hello").await.unwrap();

        assert_eq!(session.history().len(), 2);
        assert_eq!(
            session.take_notices(),
            vec![Notice::SaveFailed, Notice::SaveFailed]
        );
    }

    #[tokio::test]
    async fn test_new_chat_archives_non_empty_history() {
        let repo = Arc::new(MemoryHistory::default());
        let mut session = ChatSession::open(repo.clone(), text_client("ok")).await;
        session.send("hello").await.unwrap();

        session.new_chat(ArchiveName::now()).await;

        assert!(session.history().is_empty());
        assert_eq!(repo.archives.lock().await.len(), 1);
        let notices = session.take_notices();
        assert!(matches!(notices[0], Notice::Archived(_)));
        assert_eq!(notices[1], Notice::NewChatStarted);
    }

    #[tokio::test]
    async fn test_new_chat_on_empty_history_skips_archive() {
        let repo = Arc::new(MemoryHistory::default());
        let mut session = ChatSession::open(repo.clone(), text_client("ok")).await;

        session.new_chat(ArchiveName::now()).await;

        assert!(repo.archives.lock().await.is_empty());
        assert_eq!(session.take_notices(), vec![Notice::NewChatStarted]);
    }

    #[tokio::test]
    async fn test_delete_chat_reports_whether_file_existed() {
        let repo = Arc::new(MemoryHistory::default());
        let mut session = ChatSession::open(repo.clone(), text_client("ok")).await;
        session.send("hello").await.unwrap();

        session.delete_chat().await;
        assert!(session.history().is_empty());
        assert_eq!(session.take_notices(), vec![Notice::HistoryDeleted]);

        session.delete_chat().await;
        assert_eq!(session.take_notices(), vec![Notice::HistoryCleared]);
        assert!(repo.archives.lock().await.is_empty());
    }
}
