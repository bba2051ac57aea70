use crate::{models::product::ValidationError, services::product_service::CatalogError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Error returned from handlers. The message is static; details stay in the
/// logs.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: &'static str) -> Self {
        Self {
            status,
            message: msg,
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// Map a repository error, logging it. `failure` is the message used when
    /// the store itself failed.
    pub fn from_catalog(err: CatalogError, failure: &'static str) -> Self {
        match err {
            CatalogError::InvalidId(id) => {
                tracing::debug!("rejecting malformed product id `{}`", id);
                Self::bad_request("Invalid product id")
            }
            CatalogError::NotFound(id) => {
                tracing::debug!("product `{}` not found", id);
                Self::not_found("Product not found")
            }
            CatalogError::Sqlx(err) => {
                tracing::error!("{}: {}", failure, err);
                Self::internal(failure)
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        tracing::debug!("validation failed: {}", err);
        AppError::bad_request(err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_map_to_statuses() {
        let e = AppError::from_catalog(CatalogError::InvalidId("x".into()), "Failed");
        assert_eq!(e.status, StatusCode::BAD_REQUEST);

        let e = AppError::from_catalog(CatalogError::NotFound("x".into()), "Failed");
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.message, "Product not found");

        let e = AppError::from_catalog(CatalogError::Sqlx(sqlx::Error::PoolTimedOut), "Failed");
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.message, "Failed");
    }

    #[test]
    fn validation_message_is_passed_through() {
        let e: AppError = ValidationError("images must contain at least one url").into();
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.message, "images must contain at least one url");
    }
}
