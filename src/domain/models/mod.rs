mod archive_name;
mod chat_history;
mod completion;
mod message;
mod notice;

pub use archive_name::*;
pub use chat_history::*;
pub use completion::*;
pub use message::*;
pub use notice::*;
