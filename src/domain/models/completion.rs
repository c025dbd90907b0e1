use crate::domain::DomainError;

pub const EMPTY_RESPONSE_TEXT: &str = "Received an empty response from the model.";
pub const UNEXPECTED_RESPONSE_TEXT: &str = "Received an unexpected response type.";
pub const ERROR_PREFIX: &str = "Error: ";

/// Shape of a successful exchange with the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionReply {
    Text(String),
    /// The response carried no usable text.
    Empty,
    /// The response decoded but did not contain a candidate; holds a detail
    /// for logging, such as a block reason.
    Unexpected(String),
}

impl CompletionReply {
    /// Treats blank text as [`CompletionReply::Empty`].
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            CompletionReply::Empty
        } else {
            CompletionReply::Text(text)
        }
    }
}

/// What the completion task hands back to the session owner.
pub type CompletionOutcome = Result<CompletionReply, DomainError>;
