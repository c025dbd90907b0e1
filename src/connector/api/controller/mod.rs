pub mod ask_controller;
pub mod chat_controller;
pub mod delete_controller;
pub mod history_controller;
pub mod new_chat_controller;

pub use ask_controller::AskController;
pub use chat_controller::ChatController;
pub use delete_controller::DeleteController;
pub use history_controller::HistoryController;
pub use new_chat_controller::NewChatController;
