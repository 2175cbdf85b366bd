use crate::storage::StoreError;
use crate::transport::http::types::ApiResponse;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

pub fn ok<T: Serialize>(data: T) -> Response {
    respond(StatusCode::OK, data)
}

pub fn created<T: Serialize>(data: T) -> Response {
    respond(StatusCode::CREATED, data)
}

fn respond<T: Serialize>(status: StatusCode, data: T) -> Response {
    match serde_json::to_value(data) {
        Ok(value) => (
            status,
            Json(ApiResponse {
                success: true,
                data: Some(value),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode response: {}", e),
        ),
    }
}

pub fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }),
    )
        .into_response()
}

/// Bad query string, reported in the same envelope as every other failure.
pub fn invalid_query(err: QueryRejection, expected: &str) -> Response {
    failure(
        StatusCode::BAD_REQUEST,
        format!("Invalid query: {} (expected: {})", err.body_text(), expected),
    )
}

pub fn status_for(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Conflict(_) => StatusCode::CONFLICT,
        StoreError::Validation(_) => StatusCode::BAD_REQUEST,
        StoreError::InsufficientStock { .. } => StatusCode::CONFLICT,
        StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn store_error(err: StoreError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        error!(error = ?err, "request failed");
        return failure(status, "Internal storage error");
    }
    failure(status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(status_for(&StoreError::not_found("product", 1)), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&StoreError::Conflict("sku".into())), StatusCode::CONFLICT);
        assert_eq!(status_for(&StoreError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&StoreError::InsufficientStock {
                product_id: 1,
                available: 0,
                requested: 2
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&StoreError::Database(sqlx::Error::PoolTimedOut)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
