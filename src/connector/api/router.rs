use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{
    AskController, ChatController, DeleteController, HistoryController, NewChatController,
};

pub struct Router<'a> {
    chat_controller: ChatController<'a>,
    ask_controller: AskController<'a>,
    history_controller: HistoryController<'a>,
    new_chat_controller: NewChatController<'a>,
    delete_controller: DeleteController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chat_controller: ChatController::new(container),
            ask_controller: AskController::new(container),
            history_controller: HistoryController::new(container),
            new_chat_controller: NewChatController::new(container),
            delete_controller: DeleteController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chat => self.chat_controller.run().await,
            Commands::Ask { prompt } => self.ask_controller.ask(prompt.join(" ")).await,
            Commands::History { last } => self.history_controller.history(last).await,
            Commands::New => self.new_chat_controller.new_chat().await,
            Commands::Delete => self.delete_controller.delete().await,
        }
    }
}
