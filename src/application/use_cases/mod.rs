mod chat_session;
mod format_response;

pub use chat_session::*;
pub use format_response::*;
