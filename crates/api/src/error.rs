//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{CartError, OrderError};
use inventory::InventoryError;
use services::ServiceError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Error from the application services.
    Service(ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Service(err) => service_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn service_error_to_response(err: ServiceError) -> (StatusCode, String) {
    let status = match &err {
        ServiceError::CartNotFound { .. } | ServiceError::OrderNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        ServiceError::Cart(CartError::ItemNotFound { .. }) => StatusCode::NOT_FOUND,
        ServiceError::Cart(CartError::InvalidQuantity { .. }) | ServiceError::EmptyCart { .. } => {
            StatusCode::BAD_REQUEST
        }
        ServiceError::Inventory(InventoryError::ProductNotFound { .. }) => StatusCode::NOT_FOUND,
        ServiceError::Inventory(InventoryError::InsufficientStock { .. }) => StatusCode::CONFLICT,
        ServiceError::Order(OrderError::InvalidStateTransition { .. }) => StatusCode::CONFLICT,
        ServiceError::Store(_) => {
            tracing::error!(error = %err, "storage failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, err.to_string())
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}
