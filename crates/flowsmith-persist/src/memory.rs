use crate::error::{Result, SessionError};
use crate::models::{ChatMessage, ChatSession};
use crate::store::SessionStore;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Inner {
    sessions: Vec<ChatSession>,
    active: Option<String>,
}

impl Inner {
    fn find_mut(&mut self, session_id: &str) -> Result<&mut ChatSession> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| SessionError::UnknownSession(session_id.to_string()))
    }
}

/// Process-local session store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<Inner>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> Result<ChatSession> {
        let session = ChatSession::new();
        let mut inner = self.inner.write().await;
        inner.active = Some(session.id.clone());
        inner.sessions.push(session.clone());
        info!(session_id = %session.id, "Chat session created");
        Ok(session)
    }

    async fn get(&self, session_id: &str) -> Result<ChatSession> {
        self.inner
            .read()
            .await
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownSession(session_id.to_string()))
    }

    async fn list(&self) -> Result<Vec<ChatSession>> {
        Ok(self.inner.read().await.sessions.clone())
    }

    async fn append_and_retitle(
        &self,
        session_id: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatSession> {
        let mut inner = self.inner.write().await;
        let session = inner.find_mut(session_id)?;
        session.replace_messages(messages);
        debug!(
            session_id = %session_id,
            messages = session.messages.len(),
            "Chat session updated"
        );
        Ok(session.clone())
    }

    async fn append_message(
        &self,
        session_id: &str,
        message: ChatMessage,
    ) -> Result<ChatSession> {
        let mut inner = self.inner.write().await;
        let session = inner.find_mut(session_id)?;
        session.push_message(message);
        Ok(session.clone())
    }

    async fn delete(&self, session_id: &str) -> Result<Option<String>> {
        let mut inner = self.inner.write().await;
        let index = inner
            .sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(|| SessionError::UnknownSession(session_id.to_string()))?;
        inner.sessions.remove(index);

        if inner.active.as_deref() == Some(session_id) {
            inner.active = inner.sessions.first().map(|s| s.id.clone());
        }
        info!(session_id = %session_id, "Chat session deleted");
        Ok(inner.active.clone())
    }

    async fn active(&self) -> Result<Option<String>> {
        Ok(self.inner.read().await.active.clone())
    }

    async fn set_active(&self, session_id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.find_mut(session_id)?;
        inner.active = Some(session_id.to_string());
        Ok(())
    }
}
