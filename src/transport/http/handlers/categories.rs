use crate::domain::model::NewCategory;
use crate::transport::http::handlers::common::{created, invalid_query, ok, store_error};
use crate::transport::http::types::{json_422, AffectedProducts, ApiResponse, AppState, SearchQuery};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

const CATEGORY_SHAPE: &str = r#"{"name": "...", "description"?: "..."}"#;
const SEARCH_SHAPE: &str = "?q=<text>";

#[utoipa::path(
    get,
    path = "/api/categories",
    params(SearchQuery),
    responses(
        (status = 200, description = "Category rollups with product counts", body = ApiResponse),
        (status = 400, description = "Invalid query string", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_categories_handler(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return invalid_query(e, SEARCH_SHAPE),
    };
    match state.service.categories(query.q.as_deref().unwrap_or("")).await {
        Ok(rollups) => ok(rollups),
        Err(e) => store_error(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = NewCategory,
    responses(
        (status = 201, description = "Category created", body = ApiResponse),
        (status = 400, description = "Blank name", body = ApiResponse),
        (status = 409, description = "Category already exists", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn create_category_handler(
    State(state): State<AppState>,
    request: Result<Json<NewCategory>, JsonRejection>,
) -> impl IntoResponse {
    let Json(input) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, CATEGORY_SHAPE).into_response(),
    };
    match state.service.create_category(input).await {
        Ok(record) => created(record),
        Err(e) => store_error(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/categories/{name}",
    params(
        ("name" = String, Path, description = "Exact category name"),
        SearchQuery
    ),
    responses(
        (status = 200, description = "Category stats and its products", body = ApiResponse),
        (status = 404, description = "No such category", body = ApiResponse)
    )
)]
pub async fn category_detail_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return invalid_query(e, SEARCH_SHAPE),
    };
    match state
        .service
        .category_detail(&name, query.q.as_deref().unwrap_or(""))
        .await
    {
        Ok(detail) => ok(detail),
        Err(e) => store_error(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/categories/{name}",
    params(("name" = String, Path, description = "Current category name")),
    request_body = NewCategory,
    responses(
        (status = 200, description = "Category renamed; products moved", body = ApiResponse),
        (status = 400, description = "Blank name", body = ApiResponse),
        (status = 404, description = "No such category", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn rename_category_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Result<Json<NewCategory>, JsonRejection>,
) -> impl IntoResponse {
    let Json(target) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, CATEGORY_SHAPE).into_response(),
    };
    match state.service.rename_category(&name, target).await {
        Ok(moved) => ok(AffectedProducts { products: moved }),
        Err(e) => store_error(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/categories/{name}",
    params(("name" = String, Path, description = "Category name")),
    responses(
        (status = 200, description = "Category removed; products unassigned", body = ApiResponse),
        (status = 404, description = "No such category", body = ApiResponse)
    )
)]
pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.service.delete_category(&name).await {
        Ok(unassigned) => ok(AffectedProducts { products: unassigned }),
        Err(e) => store_error(e),
    }
}
