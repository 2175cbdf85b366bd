use crate::domain::inventory::{ProductFilter, StockSelector};
use crate::domain::model::{NewProduct, ProductUpdate};
use crate::transport::http::handlers::common::{created, invalid_query, ok, store_error};
use crate::transport::http::types::{json_422, ApiResponse, AppState, ProductQuery, SetQuantityRequest};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

const NEW_PRODUCT_SHAPE: &str =
    r#"{"name": "...", "sku": "...", "price": 0.0, "quantity"?: 0, "description"?: "...", "category"?: "..."}"#;
const PRODUCT_UPDATE_SHAPE: &str =
    r#"{"name"?: "...", "sku"?: "...", "price"?: 0.0, "quantity"?: 0, "description"?: "...", "category"?: "..." | null}"#;

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Matching products with their stock level", body = ApiResponse),
        (status = 400, description = "Invalid query string", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_products_handler(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return invalid_query(e, "?q=<text>&category=<name>&stock=<level>"),
    };
    let filter = ProductFilter::new()
        .query(query.q.unwrap_or_default())
        .category(query.category.unwrap_or_default())
        .stock(query.stock.as_deref().and_then(StockSelector::parse));

    match state.service.list_products(filter).await {
        Ok(products) => ok(products),
        Err(e) => store_error(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = ApiResponse),
        (status = 400, description = "Invalid product", body = ApiResponse),
        (status = 409, description = "Duplicate SKU", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    request: Result<Json<NewProduct>, JsonRejection>,
) -> impl IntoResponse {
    let Json(input) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, NEW_PRODUCT_SHAPE).into_response(),
    };
    match state.service.create_product(input).await {
        Ok(product) => created(product),
        Err(e) => store_error(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ApiResponse),
        (status = 404, description = "No such product", body = ApiResponse)
    )
)]
pub async fn get_product_handler(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.service.get_product(id).await {
        Ok(product) => ok(product),
        Err(e) => store_error(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/products/by-sku/{sku}",
    params(("sku" = String, Path, description = "Stock keeping unit")),
    responses(
        (status = 200, description = "Product", body = ApiResponse),
        (status = 404, description = "No product with this SKU", body = ApiResponse)
    )
)]
pub async fn get_product_by_sku_handler(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> impl IntoResponse {
    match state.service.find_by_sku(&sku).await {
        Ok(product) => ok(product),
        Err(e) => store_error(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse),
        (status = 400, description = "Invalid update", body = ApiResponse),
        (status = 404, description = "No such product", body = ApiResponse),
        (status = 409, description = "Duplicate SKU", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<ProductUpdate>, JsonRejection>,
) -> impl IntoResponse {
    let Json(update) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, PRODUCT_UPDATE_SHAPE).into_response(),
    };
    match state.service.update_product(id, update).await {
        Ok(product) => ok(product),
        Err(e) => store_error(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse),
        (status = 404, description = "No such product", body = ApiResponse)
    )
)]
pub async fn delete_product_handler(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match state.service.delete_product(id).await {
        Ok(()) => ok(serde_json::json!({ "deleted": id })),
        Err(e) => store_error(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/quantity",
    params(("id" = i64, Path, description = "Product id")),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Quantity replaced", body = ApiResponse),
        (status = 400, description = "Negative or out-of-range quantity", body = ApiResponse),
        (status = 404, description = "No such product", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn set_quantity_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<SetQuantityRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, r#"{"quantity": 0}"#).into_response(),
    };
    match state.service.set_quantity(id, request.quantity).await {
        Ok(product) => ok(product),
        Err(e) => store_error(e),
    }
}
