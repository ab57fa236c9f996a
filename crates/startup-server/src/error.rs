//! Service error type and its HTTP mapping

use crate::storage::db::{is_foreign_key_violation, is_unique_violation};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use startup_types::ValidationError;
use thiserror::Error;

/// Stable, machine-readable error codes returned in every error body
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNKNOWN_COMPANY: &str = "UNKNOWN_COMPANY";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Referenced id is absent. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Field constraint violated or body malformed. HTTP 400.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Product points at a company that does not exist. HTTP 400.
    #[error("{0}")]
    UnknownCompany(String),

    /// Company name already taken. HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// Storage backend failure. HTTP 500.
    #[error("Storage error: {0}")]
    Storage(sqlx::Error),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn company_not_found(id: i64) -> Self {
        ServiceError::NotFound(format!("Company with id {} not found", id))
    }

    pub fn product_not_found(id: i64) -> Self {
        ServiceError::NotFound(format!("Product with id {} not found", id))
    }

    pub fn company_exists(name: &str) -> Self {
        ServiceError::Conflict(format!("Company with name '{}' already exists", name))
    }

    pub fn unknown_company(id: i64) -> Self {
        ServiceError::UnknownCompany(format!("Company with id {} does not exist", id))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::UnknownCompany(_) => error_code::UNKNOWN_COMPANY,
            ServiceError::Conflict(_) => error_code::ALREADY_EXISTS,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::UnknownCompany(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation(&e) {
            ServiceError::Conflict("Company name already exists".to_string())
        } else if is_foreign_key_violation(&e) {
            ServiceError::UnknownCompany("Referenced company does not exist".to_string())
        } else {
            ServiceError::Storage(e)
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures are logged in full but never echoed to clients
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "code": self.error_code(),
            "message": message,
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(ServiceError::company_not_found(1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServiceError::from(ValidationError::Empty { field: "name" }).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServiceError::unknown_company(1).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::company_exists("Acme").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ServiceError::Storage(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = ServiceError::from(ValidationError::Empty { field: "tagline" });
        assert_eq!(err.to_string(), "tagline must not be empty");
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_non_constraint_storage_error() {
        let err = ServiceError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ServiceError::Storage(_)));
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[tokio::test]
    async fn test_storage_error_body_is_generic() {
        let resp = ServiceError::Storage(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "STORAGE_ERROR");
        assert_eq!(body["message"], "Internal server error");
    }
}
