use crate::app::{CategoryDetail, DashboardView};
use crate::domain::inventory::{
    CategoryRollup, CategoryStats, ClassifiedProduct, DashboardStat, StockLevel,
};
use crate::domain::model::{
    CategoryId, CategoryRecord, CategoryRef, MovementKind, NewCategory, NewProduct, Product,
    ProductUpdate, StockMovement,
};
use crate::transport::http::handlers::{categories, dashboard, health, products, stock};
use crate::transport::http::types::{
    AffectedProducts, ApiResponse, AppState, MovementRequest, SetQuantityRequest,
};
use axum::routing::{delete, get, put};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        dashboard::dashboard_handler,
        products::list_products_handler,
        products::create_product_handler,
        products::get_product_handler,
        products::get_product_by_sku_handler,
        products::update_product_handler,
        products::delete_product_handler,
        products::set_quantity_handler,
        stock::list_entries_handler,
        stock::record_entry_handler,
        stock::list_exits_handler,
        stock::record_exit_handler,
        stock::entries_by_period_handler,
        stock::delete_movement_handler,
        categories::list_categories_handler,
        categories::create_category_handler,
        categories::category_detail_handler,
        categories::rename_category_handler,
        categories::delete_category_handler
    ),
    components(schemas(
        ApiResponse,
        Product,
        CategoryRef,
        CategoryId,
        CategoryRecord,
        NewProduct,
        ProductUpdate,
        NewCategory,
        StockLevel,
        ClassifiedProduct,
        DashboardStat,
        DashboardView,
        CategoryRollup,
        CategoryStats,
        CategoryDetail,
        MovementKind,
        StockMovement,
        MovementRequest,
        SetQuantityRequest,
        AffectedProducts
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/dashboard", get(dashboard::dashboard_handler))
        .route(
            "/api/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route("/api/products/by-sku/:sku", get(products::get_product_by_sku_handler))
        .route(
            "/api/products/:id",
            get(products::get_product_handler)
                .put(products::update_product_handler)
                .delete(products::delete_product_handler),
        )
        .route("/api/products/:id/quantity", put(products::set_quantity_handler))
        .route(
            "/api/products/:id/entries",
            get(stock::list_entries_handler).post(stock::record_entry_handler),
        )
        .route(
            "/api/products/:id/exits",
            get(stock::list_exits_handler).post(stock::record_exit_handler),
        )
        .route("/api/stock/entries", get(stock::entries_by_period_handler))
        .route("/api/stock/movements/:id", delete(stock::delete_movement_handler))
        .route(
            "/api/categories",
            get(categories::list_categories_handler).post(categories::create_category_handler),
        )
        .route(
            "/api/categories/:name",
            get(categories::category_detail_handler)
                .put(categories::rename_category_handler)
                .delete(categories::delete_category_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
