//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; every error reaches the client as
//! `{"error": "<message>"}`.
//!
//! | Error class | Status |
//! |-------------|--------|
//! | Missing/malformed field | 400 |
//! | Unknown project | 404 |
//! | Duplicate vote or email | 409 |
//! | Store not initialized | 503 |
//! | Any other storage failure | 500 |

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{ProjectError, RegistrationError, VoteError};

/// Message shown when the backing tables do not exist yet.
pub const SETUP_REQUIRED_MESSAGE: &str =
    "Database not initialized. Please run the setup script first.";

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Vote was rejected or could not be stored.
    #[error("Vote error: {0}")]
    Vote(#[from] VoteError),

    /// Coupon registration was rejected or could not be stored.
    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// Project creation was rejected or could not be stored.
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Status and client-facing message for a repository failure.
fn repository_response(err: &RepositoryError) -> (StatusCode, String) {
    match err {
        RepositoryError::Uninitialized(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            SETUP_REQUIRED_MESSAGE.to_string(),
        ),
        RepositoryError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
        RepositoryError::Conflict(_) => (StatusCode::CONFLICT, "Already exists".to_string()),
        RepositoryError::Database(_)
        | RepositoryError::DataCorruption(_)
        | RepositoryError::Unsupported(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_MESSAGE.to_string(),
        ),
    }
}

impl AppError {
    /// Status code and client-facing message.
    ///
    /// Internal error details are never exposed to clients.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Database(err)
            | Self::Vote(VoteError::Repository(err))
            | Self::Registration(RegistrationError::Repository(err))
            | Self::Project(ProjectError::Repository(err)) => repository_response(err),
            Self::Vote(err) => {
                let status = match err {
                    VoteError::MissingProjectId => StatusCode::BAD_REQUEST,
                    VoteError::ProjectNotFound => StatusCode::NOT_FOUND,
                    VoteError::DuplicateVote => StatusCode::CONFLICT,
                    VoteError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            Self::Registration(err) => {
                let status = match err {
                    RegistrationError::MissingEmail | RegistrationError::InvalidEmail(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    RegistrationError::AlreadyRegistered => StatusCode::CONFLICT,
                    RegistrationError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            Self::Project(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                status = status.as_u16(),
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
