use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use corelog_core::Error as CoreError;

/// Server-facing error type. Wraps the core engine's error so handlers can
/// map it to an HTTP status without the core crate knowing anything about
/// HTTP.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("offset out of range")]
    OffsetOutOfRange,

    #[error("core engine error: {0}")]
    Core(CoreError),
}

impl From<CoreError> for ServerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OffsetOutOfRange => ServerError::OffsetOutOfRange,
            other => ServerError::Core(other),
        }
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::OffsetOutOfRange => {
                (StatusCode::NOT_FOUND, "offset out of range".to_string())
            }
            ServerError::Core(core_err) => {
                error!(error = %core_err, "core engine error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
