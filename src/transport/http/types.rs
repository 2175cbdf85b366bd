use crate::app::InventoryService;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InventoryService>,
}

impl AppState {
    pub fn new(service: InventoryService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Case-insensitive search over name, SKU and description.
    #[serde(default)]
    pub q: Option<String>,
    /// Exact category name.
    #[serde(default)]
    pub category: Option<String>,
    /// One of `out`, `low`, `medium`, `high`. Unknown values match nothing.
    #[serde(default)]
    pub stock: Option<String>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// How many recent products to return.
    #[serde(default)]
    pub recent: Option<usize>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    /// RFC 3339 start, inclusive.
    pub start: DateTime<Utc>,
    /// RFC 3339 end, inclusive.
    pub end: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct MovementRequest {
    pub quantity: i64,
    /// Supplier for entries, destination for exits.
    #[serde(default)]
    pub counterparty: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct AffectedProducts {
    pub products: u64,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(format!("Invalid JSON body: {} (expected: {})", err, expected)),
        }),
    )
}
