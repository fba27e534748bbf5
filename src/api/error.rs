//! Conversion of errors into JSON HTTP responses.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Errors returned by HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request itself is malformed
    #[error("{0}")]
    BadRequest(String),

    /// The route exists but not for this HTTP method
    #[error("Only {0} method is allowed.")]
    MethodNotAllowed(&'static str),

    /// A failure from the business layer
    #[error(transparent)]
    Core(#[from] Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Core(Error::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Core(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, %status, "Request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::from(Error::NotFound {
            entity: "Product",
            id: 3,
        });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Product 3 does not exist");

        let invalid = ApiError::from(Error::validation("Budget must be a non-negative integer."));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let stock = ApiError::from(Error::InsufficientStock {
            available: 1,
            requested: 2,
        });
        assert_eq!(stock.status(), StatusCode::BAD_REQUEST);

        let config = ApiError::from(Error::Config {
            message: "broken".to_string(),
        });
        assert_eq!(config.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let method = ApiError::MethodNotAllowed("POST");
        assert_eq!(method.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(method.to_string(), "Only POST method is allowed.");
    }
}
