pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    format_response, ChatSession, CompletionClient, HistoryRepository, PendingCompletion,
    EMPTY_PROMPT_MESSAGE,
};

pub use cli::Commands;

pub use connector::{
    Container, ContainerConfig, GeminiClient, HistoryView, JsonFileHistoryRepository,
    MockCompletionClient, MockReply, Router, HISTORY_FILE_NAME,
};

pub use domain::{
    ArchiveName, ChatHistory, CompletionOutcome, CompletionReply, DomainError, Message, Notice,
    Role, EMPTY_RESPONSE_TEXT, ERROR_PREFIX, UNEXPECTED_RESPONSE_TEXT,
};
