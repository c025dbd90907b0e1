mod gemini_client;
mod json_file_history_repository;
mod mock_completion_client;

pub use gemini_client::*;
pub use json_file_history_repository::*;
pub use mock_completion_client::*;
