use crate::error::Result;
use crate::models::{ChatMessage, ChatSession};
use crate::store::SessionStore;
use flowsmith_llm::{Dispatcher, GenerationError, ModelConfig};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one chat turn. A failed generation still produces a turn:
/// the session carries an `Error: ...` reply and `error` holds the cause.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub session: ChatSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<GenerationError>,
}

/// Sends chat turns through the shared dispatcher
#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn SessionStore>,
    dispatcher: Dispatcher,
}

impl ChatService {
    pub fn new(store: Arc<dyn SessionStore>, dispatcher: Dispatcher) -> Self {
        Self { store, dispatcher }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub async fn send_message(
        &self,
        session_id: &str,
        text: &str,
        config: &ModelConfig,
    ) -> Result<ChatTurn> {
        if text.trim().is_empty() {
            return Err(GenerationError::missing_parameter("message").into());
        }

        self.store
            .append_message(session_id, ChatMessage::user(text))
            .await?;

        let (reply, error) = match self.dispatcher.generate(config.request(text)).await {
            Ok(result) => (ChatMessage::ai(result.text), None),
            Err(e) => {
                warn!(session_id = %session_id, kind = %e.kind, "Chat generation failed");
                (ChatMessage::ai(format!("Error: {}", e.message)), Some(e))
            }
        };

        let session = self.store.append_message(session_id, reply).await?;
        info!(
            session_id = %session_id,
            messages = session.messages.len(),
            "Chat turn completed"
        );

        Ok(ChatTurn { session, error })
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
