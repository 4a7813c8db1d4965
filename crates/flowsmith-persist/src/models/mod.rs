pub mod message;
pub mod session;

pub use message::{ChatMessage, Sender};
pub use session::{derive_title, ChatSession, DEFAULT_TITLE, TITLE_MAX_CHARS};
