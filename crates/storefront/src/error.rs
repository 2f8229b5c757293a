//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! No error here is fatal to the process: every variant maps to an HTTP
//! response and the service stays interactive.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::services::AuthError;
use crate::storage::PersistenceError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog API operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Login operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Persisted state could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client (e.g. missing login fields).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_)
                | Self::Internal(_)
                | Self::Catalog(
                    CatalogError::Http(_) | CatalogError::Status(_) | CatalogError::Parse(_)
                )
                | Self::Auth(AuthError::Http(_) | AuthError::Status(_) | AuthError::Parse(_))
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Catalog(err) => match err {
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::Http(_) | CatalogError::Status(_) | CatalogError::Parse(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::Http(_) | AuthError::Status(_) | AuthError::Parse(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal details are not exposed; bad
    /// credentials get a specific message so the UI can surface it inline.
    fn message(&self) -> String {
        match self {
            Self::Persistence(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Catalog(err) => match err {
                CatalogError::NotFound(id) => format!("Product {id} not found"),
                _ => "Catalog service error".to_string(),
            },
            Self::Auth(err) => match err {
                AuthError::UserNotFound => {
                    "User not found. Please check your username or email.".to_string()
                }
                AuthError::InvalidCredentials => "Invalid password. Please try again.".to_string(),
                _ => "Login failed. Please check your connection and try again.".to_string(),
            },
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let body = Json(json!({ "error": self.message() }));

        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
