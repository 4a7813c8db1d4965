use crate::error::Result;
use crate::models::{ChatMessage, ChatSession};
use async_trait::async_trait;

/// Storage for chat sessions
///
/// Implementations keep sessions in creation order and track which one is active.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create an empty session and make it the active one
    async fn create(&self) -> Result<ChatSession>;

    async fn get(&self, session_id: &str) -> Result<ChatSession>;

    /// All sessions, oldest first
    async fn list(&self) -> Result<Vec<ChatSession>>;

    /// Replace the session's messages, recompute its title and bump `last_updated`
    async fn append_and_retitle(
        &self,
        session_id: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatSession>;

    /// Append a single message to the session as currently stored
    async fn append_message(&self, session_id: &str, message: ChatMessage) -> Result<ChatSession>;

    /// Remove a session. If it was active, the oldest remaining session
    /// becomes active (or none). Returns the new active id.
    async fn delete(&self, session_id: &str) -> Result<Option<String>>;

    async fn active(&self) -> Result<Option<String>>;

    async fn set_active(&self, session_id: &str) -> Result<()>;
}
