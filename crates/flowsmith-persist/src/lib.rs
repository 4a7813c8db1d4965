pub mod error;
pub mod memory;
pub mod models;
pub mod service;
pub mod store;

pub use error::SessionError;
pub use memory::InMemorySessionStore;
pub use models::{derive_title, ChatMessage, ChatSession, Sender, DEFAULT_TITLE, TITLE_MAX_CHARS};
pub use service::{ChatService, ChatTurn};
pub use store::SessionStore;
