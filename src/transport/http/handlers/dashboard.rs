use crate::transport::http::handlers::common::{invalid_query, ok, store_error};
use crate::transport::http::types::{ApiResponse, AppState, DashboardQuery};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/api/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Stats, low-stock alerts and recent products", body = ApiResponse),
        (status = 400, description = "Invalid query string", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn dashboard_handler(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return invalid_query(e, "?recent=<count>"),
    };
    match state.service.dashboard(query.recent).await {
        Ok(view) => ok(view),
        Err(e) => store_error(e),
    }
}
