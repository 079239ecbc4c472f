use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use frag_pipeline::PipelineError;
use thiserror::Error;
use tracing::error;

use crate::dto::ErrorResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    /// A chunk in the request body is not valid base64.
    #[error("chunk {index} is not valid base64: {reason}")]
    Decode { index: usize, reason: String },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("request body too large: {0}")]
    TooLarge(String),

    /// The document exists but is not UTF-8, so it has no text form.
    #[error("document {0} is not valid UTF-8 text")]
    NotText(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("store error: {0}")]
    Store(#[from] frag_store::StoreError),

    #[error("index error: {0}")]
    Index(#[from] frag_index::IndexError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Decode { .. } | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotText(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Pipeline(e) => match e {
                PipelineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                PipelineError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
                e if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Store(frag_store::StoreError::Timeout { .. })
            | Self::Index(frag_index::IndexError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
            if status == StatusCode::GATEWAY_TIMEOUT {
                "backend timeout".to_string()
            } else {
                "internal error".to_string()
            }
        } else {
            self.to_string()
        };
        let body = ErrorResponse {
            status: "error".into(),
            error: message,
        };
        (status, Json(body)).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
