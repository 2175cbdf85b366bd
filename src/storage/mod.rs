//! Inventory persistence.
//!
//! [`InventoryStore`] is the only way products, categories and stock movements
//! are created or changed. Each implementation resolves its own category model
//! into [`crate::domain::model::CategoryRef`] when loading rows.

pub mod error;
pub mod memory;
pub mod postgres;

use crate::domain::model::{
    CategoryRecord, MovementKind, NewCategory, NewProduct, Product, ProductUpdate, StockMovement,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use error::{StoreError, StoreResult};
pub use memory::MemoryInventoryStore;
pub use postgres::PgInventoryStore;

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Cheap reachability check.
    async fn ping(&self) -> StoreResult<()>;

    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>>;

    async fn find_by_sku(&self, sku: &str) -> StoreResult<Option<Product>>;

    /// Inserts a validated, normalized product. Duplicate SKUs are a `Conflict`.
    async fn create_product(&self, input: &NewProduct) -> StoreResult<Product>;

    async fn update_product(&self, id: i64, update: &ProductUpdate) -> StoreResult<Product>;

    async fn delete_product(&self, id: i64) -> StoreResult<()>;

    /// Overwrites the quantity on hand.
    async fn set_quantity(&self, id: i64, quantity: i64) -> StoreResult<Product>;

    async fn list_categories(&self) -> StoreResult<Vec<CategoryRecord>>;

    async fn create_category(&self, input: &NewCategory) -> StoreResult<CategoryRecord>;

    /// Moves every product of `from` to `to`. Returns the number of products moved.
    async fn rename_category(&self, from: &str, to: &NewCategory) -> StoreResult<u64>;

    /// Removes the category; its products become uncategorized.
    /// Returns the number of products unassigned.
    async fn delete_category(&self, name: &str) -> StoreResult<u64>;

    /// Applies the movement to the product quantity and appends it to the
    /// ledger in one step. Exits that would go below zero fail with
    /// `InsufficientStock` and change nothing.
    async fn record_movement(
        &self,
        product_id: i64,
        kind: MovementKind,
        quantity: i64,
        counterparty: Option<&str>,
    ) -> StoreResult<StockMovement>;

    /// Ledger rows for a product, oldest first.
    async fn list_movements(&self, product_id: i64, kind: MovementKind) -> StoreResult<Vec<StockMovement>>;

    /// Entries recorded within `[start, end]`, oldest first.
    async fn list_entries_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<StockMovement>>;

    /// Removes a ledger row. The product quantity is not rewound.
    async fn delete_movement(&self, id: i64) -> StoreResult<()>;
}
