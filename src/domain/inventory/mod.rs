//! Inventory aggregation engine.
//!
//! Pure functions over an already-loaded product snapshot: stock
//! classification, dashboard statistics, category rollups and filtering.
//! None of them perform I/O or keep state between calls.

pub mod category;
pub mod classifier;
pub mod dashboard;
pub mod filter;

pub use category::{
    aggregate_by_category, category_stats, default_description, merge_catalog,
    products_in_category, slugify, CategoryRollup, CategoryStats,
};
pub use classifier::{
    classify, classify_all, ClassifiedProduct, InvalidThresholds, StockItem, StockLevel,
    StockThresholds, DEFAULT_LOW_STOCK_BELOW, DEFAULT_MEDIUM_STOCK_BELOW,
};
pub use dashboard::{aggregate, aggregate_with, low_stock_alerts, recent_products, DashboardStat};
pub use filter::{filter, filter_categories, filter_products, ProductFilter, StockSelector};
