pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::InventoryService;
pub use domain::inventory::{
    aggregate, aggregate_by_category, classify, filter_products, StockLevel, StockThresholds,
};
pub use domain::model::{CategoryRef, Product};
pub use infra::config::AppConfig;
pub use storage::{InventoryStore, MemoryInventoryStore, PgInventoryStore, StoreError};
