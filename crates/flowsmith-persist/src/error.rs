use flowsmith_llm::GenerationError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    UnknownSession(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
