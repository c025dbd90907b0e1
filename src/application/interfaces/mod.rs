mod completion_client;
mod history_repository;

pub use completion_client::*;
pub use history_repository::*;
