use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flowsmith_graph::{ExecutionError, GraphError};
use flowsmith_llm::{GenerationError, GenerationErrorKind};
use flowsmith_persist::SessionError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required parameters")]
    MissingParameters,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// JSON body extractor whose rejections use the API error body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ExecutionError> for ApiError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::Graph(e) => ApiError::Graph(e),
            ExecutionError::Generation(e) => ApiError::Generation(e),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::UnknownSession(_) => ApiError::NotFound(err.to_string()),
            SessionError::Generation(e) => ApiError::Generation(e),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            ApiError::MissingParameters | ApiError::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: self.to_string(),
                    details: None,
                },
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            ApiError::Graph(e) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: e.to_string(),
                    details: None,
                },
            ),
            ApiError::Generation(e) => generation_response(e),
        }
    }
}

fn generation_response(e: GenerationError) -> (StatusCode, ErrorBody) {
    match e.kind {
        GenerationErrorKind::AuthError => (
            StatusCode::UNAUTHORIZED,
            ErrorBody {
                error: "Invalid API key".to_string(),
                details: None,
            },
        ),
        GenerationErrorKind::MissingParameter => (
            StatusCode::BAD_REQUEST,
            ErrorBody {
                error: e.message,
                details: None,
            },
        ),
        kind => {
            tracing::error!(kind = %kind, error = %e.message, "Generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: e.message,
                    details: e.provider_detail,
                },
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
