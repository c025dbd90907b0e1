use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::{ChatHistory, Message, Notice, Role};

pub const EMPTY_STATE_TEXT: &str = "No messages yet. Type a prompt to start chatting.";
const USER_LABEL: &str = "You: ";
const MODEL_LABEL: &str = "Gemini: ";

/// Plain-text rendering of the chat list.
///
/// With a window set, only the newest messages are shown, which keeps the
/// latest exchange on screen the way an auto-scrolling list would.
pub struct HistoryView {
    window: Option<usize>,
}

impl HistoryView {
    /// A zero window shows everything.
    pub fn new(window: Option<usize>) -> Self {
        Self {
            window: window.filter(|n| *n > 0),
        }
    }

    pub fn render(&self, history: &ChatHistory) -> String {
        if history.is_empty() {
            return EMPTY_STATE_TEXT.to_string();
        }

        let visible = match self.window {
            Some(n) => history.tail(n),
            None => history.messages(),
        };

        let mut output = String::new();
        let hidden = history.len() - visible.len();
        if hidden > 0 {
            let noun = if hidden == 1 { "message" } else { "messages" };
            output.push_str(&format!("… {hidden} earlier {noun}\n\n"));
        }

        let blocks: Vec<String> = visible.iter().map(|m| self.render_message(m)).collect();
        output.push_str(&blocks.join("\n\n"));
        output
    }

    /// One message with its author label; continuation lines line up under
    /// the first line of text.
    pub fn render_message(&self, message: &Message) -> String {
        let label = match message.role() {
            Role::User => USER_LABEL,
            Role::Model => MODEL_LABEL,
        };
        let indent = " ".repeat(label.chars().count());

        let mut output = String::from(label);
        for (i, line) in message.text().lines().enumerate() {
            if i > 0 {
                output.push('\n');
                if !line.is_empty() {
                    output.push_str(&indent);
                }
            }
            output.push_str(line);
        }
        output
    }

    pub fn render_notices(&self, notices: &[Notice]) -> String {
        notices
            .iter()
            .map(|n| format!("[{n}]"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Spinner shown on stderr while a completion is pending.
pub fn busy_indicator() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Waiting for Gemini...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_history() -> ChatHistory {
        ChatHistory::from_messages(vec![
            Message::user("Hello"),
            Message::model("Hi there"),
            Message::user("Tell me more"),
            Message::model("Line one\n\nLine two"),
        ])
    }

    #[test]
    fn test_empty_history_shows_empty_state() {
        let view = HistoryView::new(None);
        assert_eq!(view.render(&ChatHistory::new()), EMPTY_STATE_TEXT);
    }

    #[test]
    fn test_multiline_message_is_indented() {
        let view = HistoryView::new(None);
        let rendered = view.render_message(&Message::model("Line one\n\nLine two"));
        assert_eq!(rendered, "Gemini: Line one\n\n        Line two");
    }

    #[test]
    fn test_full_render_lists_oldest_first() {
        let view = HistoryView::new(None);
        let rendered = view.render(&sample_history());
        assert!(rendered.starts_with("You: Hello\n\nGemini: Hi there"));
        assert!(rendered.ends_with("        Line two"));
    }

    #[test]
    fn test_window_shows_newest_with_header() {
        let view = HistoryView::new(Some(2));
        let rendered = view.render(&sample_history());
        assert!(rendered.starts_with("… 2 earlier messages\n\nYou: Tell me more"));
        assert!(!rendered.contains("Hi there"));
    }

    #[test]
    fn test_zero_window_shows_everything() {
        let view = HistoryView::new(Some(0));
        let rendered = view.render(&sample_history());
        assert!(rendered.starts_with("You: Hello"));
        assert!(!rendered.contains("earlier"));
    }

    #[test]
    fn test_notices_are_bracketed() {
        let view = HistoryView::new(None);
        let rendered = view.render_notices(&[Notice::SaveFailed, Notice::NewChatStarted]);
        assert_eq!(rendered, "[Could not save chat history.]\n[New chat started]");
    }
}
