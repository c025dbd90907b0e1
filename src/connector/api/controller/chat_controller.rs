use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{ArchiveName, ChatSession, EMPTY_PROMPT_MESSAGE};

use super::super::{busy_indicator, Container, HistoryView};

/// Messages kept on screen when the session opens or `/history` is used.
const SCREEN_WINDOW: usize = 20;

const HELP_TEXT: &str = "\
Commands:
  /new      archive this chat and start a new one
  /delete   delete this chat without archiving it
  /history  show the recent messages again
  /help     show this help
  /quit     leave (Ctrl-D works too)";

#[derive(Debug, PartialEq, Eq)]
enum ReplInput<'a> {
    Prompt(&'a str),
    NewChat,
    DeleteChat,
    History,
    Help,
    Quit,
    Unknown(&'a str),
}

impl<'a> ReplInput<'a> {
    fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return ReplInput::Prompt(trimmed);
        }
        match trimmed {
            "/new" => ReplInput::NewChat,
            "/delete" => ReplInput::DeleteChat,
            "/history" => ReplInput::History,
            "/help" | "/?" => ReplInput::Help,
            "/quit" | "/exit" => ReplInput::Quit,
            other => ReplInput::Unknown(other),
        }
    }
}

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Interactive loop over stdin. The session lives on this task; each
    /// completion result comes back here before the history is touched.
    pub async fn run(&self) -> Result<String> {
        let mut session = self.container.session().await?;
        let view = HistoryView::new(Some(SCREEN_WINDOW));

        self.print_notices(&view, &mut session);
        println!("{}\n", view.render(session.history()));
        println!("Type /help for commands.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                println!();
                break;
            };

            match ReplInput::parse(&line) {
                ReplInput::Prompt(prompt) => self.exchange(&view, &mut session, prompt).await,
                ReplInput::NewChat => {
                    session.new_chat(ArchiveName::now()).await;
                    self.print_notices(&view, &mut session);
                    println!("{}", view.render(session.history()));
                }
                ReplInput::DeleteChat => {
                    session.delete_chat().await;
                    self.print_notices(&view, &mut session);
                    println!("{}", view.render(session.history()));
                }
                ReplInput::History => println!("{}", view.render(session.history())),
                ReplInput::Help => println!("{HELP_TEXT}"),
                ReplInput::Quit => break,
                ReplInput::Unknown(command) => {
                    println!("Unknown command {command}. Type /help for commands.")
                }
            }
        }

        Ok("Goodbye.".to_string())
    }

    async fn exchange(&self, view: &HistoryView, session: &mut ChatSession, prompt: &str) {
        let pending = match session.submit(prompt).await {
            Ok(pending) => pending,
            Err(e) if e.is_invalid_input() => {
                println!("{EMPTY_PROMPT_MESSAGE}");
                return;
            }
            Err(e) => {
                println!("{e}");
                return;
            }
        };
        self.print_notices(view, session);

        let spinner = busy_indicator();
        let outcome = pending.wait().await;
        spinner.finish_and_clear();

        let reply = session.resolve(outcome).await;
        println!("{}\n", view.render_message(&reply));
        self.print_notices(view, session);
    }

    fn print_notices(&self, view: &HistoryView, session: &mut ChatSession) {
        let notices = session.take_notices();
        if !notices.is_empty() {
            println!("{}", view.render_notices(&notices));
        }
    }
}
