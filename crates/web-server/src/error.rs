// In crates/web-server/src/error.rs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Domain(#[from] core_types::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to bind server address: {0}")]
    ServerBindError(std::io::Error),

    #[error("Server error: {0}")]
    ServerError(std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Domain(core_types::Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Error::Domain(core_types::Error::InsufficientData { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::Domain(core_types::Error::DataUnavailable { .. }) => StatusCode::BAD_GATEWAY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::ServerBindError(_) | Error::ServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
