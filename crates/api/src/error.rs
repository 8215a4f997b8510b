//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Workflow errors map onto
//! client statuses; storage and catalog failures are captured to Sentry and
//! reported without detail.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kirana_prebill::{CatalogError, PrebillError};
use thiserror::Error;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Pre-bill workflow rejected the operation or failed to persist.
    #[error(transparent)]
    Prebill(#[from] PrebillError),

    /// Catalog lookup outside the workflow failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Request body could not be parsed.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Prebill(PrebillError::InvalidOperation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Prebill(PrebillError::OperationBlocked { .. }) => StatusCode::CONFLICT,
            Self::Prebill(PrebillError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Prebill(PrebillError::Storage(_) | PrebillError::Catalog(_))
            | Self::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
