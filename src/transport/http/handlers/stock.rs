use crate::domain::model::MovementKind;
use crate::transport::http::handlers::common::{created, failure, ok, store_error};
use crate::transport::http::types::{json_422, ApiResponse, AppState, MovementRequest, PeriodQuery};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

const MOVEMENT_SHAPE: &str = r#"{"quantity": 1, "counterparty"?: "..."}"#;

async fn list(state: AppState, product_id: i64, kind: MovementKind) -> Response {
    match state.service.list_movements(product_id, kind).await {
        Ok(movements) => ok(movements),
        Err(e) => store_error(e),
    }
}

async fn record(
    state: AppState,
    product_id: i64,
    kind: MovementKind,
    request: Result<Json<MovementRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, MOVEMENT_SHAPE).into_response(),
    };
    match state
        .service
        .record_movement(product_id, kind, request.quantity, request.counterparty.as_deref())
        .await
    {
        Ok(movement) => created(movement),
        Err(e) => store_error(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/entries",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Stock entries for the product, oldest first", body = ApiResponse),
        (status = 404, description = "No such product", body = ApiResponse)
    )
)]
pub async fn list_entries_handler(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    list(state, id, MovementKind::Entry).await
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/entries",
    params(("id" = i64, Path, description = "Product id")),
    request_body = MovementRequest,
    responses(
        (status = 201, description = "Entry recorded; quantity increased", body = ApiResponse),
        (status = 400, description = "Non-positive quantity", body = ApiResponse),
        (status = 404, description = "No such product", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn record_entry_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<MovementRequest>, JsonRejection>,
) -> impl IntoResponse {
    record(state, id, MovementKind::Entry, request).await
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/exits",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Stock exits for the product, oldest first", body = ApiResponse),
        (status = 404, description = "No such product", body = ApiResponse)
    )
)]
pub async fn list_exits_handler(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    list(state, id, MovementKind::Exit).await
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/exits",
    params(("id" = i64, Path, description = "Product id")),
    request_body = MovementRequest,
    responses(
        (status = 201, description = "Exit recorded; quantity decreased", body = ApiResponse),
        (status = 400, description = "Non-positive quantity", body = ApiResponse),
        (status = 404, description = "No such product", body = ApiResponse),
        (status = 409, description = "Insufficient stock", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn record_exit_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<MovementRequest>, JsonRejection>,
) -> impl IntoResponse {
    record(state, id, MovementKind::Exit, request).await
}

#[utoipa::path(
    get,
    path = "/api/stock/entries",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Entries recorded in the period", body = ApiResponse),
        (status = 400, description = "Missing or malformed period", body = ApiResponse)
    )
)]
pub async fn entries_by_period_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(period) = match query {
        Ok(q) => q,
        Err(e) => {
            return failure(
                StatusCode::BAD_REQUEST,
                format!("Invalid period: {} (expected: ?start=<RFC 3339>&end=<RFC 3339>)", e),
            )
        }
    };
    match state.service.entries_between(period.start, period.end).await {
        Ok(entries) => ok(entries),
        Err(e) => store_error(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/stock/movements/{id}",
    params(("id" = i64, Path, description = "Movement id")),
    responses(
        (status = 200, description = "Ledger row removed (quantity unchanged)", body = ApiResponse),
        (status = 404, description = "No such movement", body = ApiResponse)
    )
)]
pub async fn delete_movement_handler(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.service.delete_movement(id).await {
        Ok(()) => ok(serde_json::json!({ "deleted": id })),
        Err(e) => store_error(e),
    }
}
