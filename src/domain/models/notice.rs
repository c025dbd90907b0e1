use std::fmt;

/// Short-lived notification for the user about a storage event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LoadFailed,
    SaveFailed,
    /// Carries the archive file name, which is logged but not displayed.
    Archived(String),
    ArchiveFailed,
    NewChatStarted,
    HistoryDeleted,
    DeleteFailed,
    HistoryCleared,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Notice::LoadFailed => "Could not load chat history.",
            Notice::SaveFailed => "Could not save chat history.",
            Notice::Archived(_) => "Chat archived",
            Notice::ArchiveFailed => "Could not archive chat.",
            Notice::NewChatStarted => "New chat started",
            Notice::HistoryDeleted => "Chat history deleted",
            Notice::DeleteFailed => "Could not delete chat history.",
            Notice::HistoryCleared => "Chat history cleared",
        };
        f.write_str(text)
    }
}
