//! Mapping of pipeline failures onto HTTP responses.

use apr_core::{models::ValidationError, ports::FetchError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

/// Message returned for every failure that is not the caller's fault.
const INTERNAL_MESSAGE: &str = "unable to retrieve payments";

/// Body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse {
    /// Always `"error"`
    pub result: String,
    /// What went wrong
    pub message: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            result: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Anything that can abort a report request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request parameters were rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The aggregation store failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched rows could not be encoded
    #[error("unable to render report: {0}")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
    pub(crate) fn render(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Render(err.into())
    }

    fn code(&self) -> Option<u16> {
        match self {
            Self::Validation(err) => Some(err.code),
            Self::Fetch(err) => err.code(),
            Self::Render(_) => None,
        }
    }

    /// The status and body returned to the caller.
    ///
    /// Codes starting with `4` are surfaced with their message; everything
    /// else becomes a 500 with a generic message.
    pub fn status_and_body(&self) -> (StatusCode, ErrorResponse) {
        let client_status = self
            .code()
            .filter(|code| code.to_string().starts_with('4'))
            .and_then(|code| StatusCode::from_u16(code).ok());

        match client_status {
            Some(status) => (status, ErrorResponse::new(self.to_string())),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(INTERNAL_MESSAGE),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            event!(Level::ERROR, err = ?self);
        } else {
            event!(Level::INFO, code = status.as_u16(), err = self.to_string());
        }
        (status, Json(body)).into_response()
    }
}

impl aide::OperationOutput for ApiError {
    type Inner = Self;
}
