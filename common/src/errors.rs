//! Error taxonomy shared by all components.
//!
//! Errors surface through handlers as a `{code, message}` JSON body with an
//! appropriate HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Convenience result alias used across the workspace.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The identity provider refused or failed the token request.
    #[error("token acquisition failed: {0}")]
    TokenAcquisition(String),

    /// Opening the database connection failed (refusal, auth rejection,
    /// network fault).
    #[error("database connection failed: {0}")]
    DatabaseConnection(String),

    /// Executing the statement or reading the result failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(String),
}

impl AppError {
    /// Machine-readable error code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::TokenAcquisition(_) => "TOKEN_ACQUISITION_FAILED",
            AppError::DatabaseConnection(_) => "DATABASE_CONNECTION_FAILED",
            AppError::DatabaseQuery(_) => "DATABASE_QUERY_FAILED",
        }
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// JSON body returned for uncaught errors.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error code for client handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(code = self.code(), error = %self, "request failed");
        let body = ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            AppError::TokenAcquisition("denied".into()).code(),
            "TOKEN_ACQUISITION_FAILED"
        );
        assert_eq!(
            AppError::DatabaseQuery("bad column".into()).code(),
            "DATABASE_QUERY_FAILED"
        );
    }

    #[test]
    fn display_includes_cause() {
        let err = AppError::DatabaseConnection("timed out".into());
        assert_eq!(err.to_string(), "database connection failed: timed out");
    }
}
