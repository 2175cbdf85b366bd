//! The inventory service.
//!
//! Sits between the HTTP handlers and an [`InventoryStore`]:
//! 1.  Validates and normalizes write payloads before they reach the store.
//! 2.  Loads one product snapshot per read and derives every view from it
//!     with the pure functions in [`crate::domain::inventory`].

use crate::domain::inventory::{
    aggregate_by_category, aggregate_with, category_stats, classify_all, filter,
    filter_categories, low_stock_alerts, merge_catalog, products_in_category, recent_products,
    CategoryRollup, CategoryStats, ClassifiedProduct, DashboardStat, ProductFilter,
    StockThresholds,
};
use crate::domain::model::{
    CategoryRecord, MovementKind, NewCategory, NewProduct, Product, ProductUpdate, StockMovement,
    ValidatePayload,
};
use crate::infra::config::{AppConfig, StoreBackend};
use crate::storage::{
    InventoryStore, MemoryInventoryStore, PgInventoryStore, StoreError, StoreResult,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

/// Everything the dashboard page shows, derived from one snapshot.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardView {
    pub stats: DashboardStat,
    pub low_stock: Vec<ClassifiedProduct>,
    pub recent: Vec<Product>,
}

/// One category with its products and header numbers.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryDetail {
    pub name: String,
    pub stats: CategoryStats,
    pub products: Vec<ClassifiedProduct>,
}

pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
    thresholds: StockThresholds,
    recent_limit: usize,
}

impl InventoryService {
    pub fn new(store: Arc<dyn InventoryStore>, thresholds: StockThresholds, recent_limit: usize) -> Self {
        Self {
            store,
            thresholds,
            recent_limit,
        }
    }

    /// Opens the configured backend and wraps it in a service.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn InventoryStore> = match config.backend {
            StoreBackend::Postgres => {
                let url = config.require_database_url()?;
                Arc::new(PgInventoryStore::connect(url, config.db_max_connections).await?)
            }
            StoreBackend::Memory if config.seed_demo_data => Arc::new(MemoryInventoryStore::with_demo_data()),
            StoreBackend::Memory => Arc::new(MemoryInventoryStore::new()),
        };
        info!(
            backend = store.backend_name(),
            low_below = config.thresholds.low_below(),
            medium_below = config.thresholds.medium_below(),
            "inventory store ready"
        );
        Ok(Self::new(store, config.thresholds, config.recent_products_limit))
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.store.ping().await
    }

    /// Loads the full product list once. All derived views start here.
    pub async fn snapshot(&self) -> StoreResult<Vec<Product>> {
        let products = self.store.list_products().await?;
        debug!(count = products.len(), backend = self.backend_name(), "snapshot loaded");
        Ok(products)
    }

    pub async fn dashboard(&self, recent: Option<usize>) -> StoreResult<DashboardView> {
        let products = self.snapshot().await?;
        Ok(DashboardView {
            stats: aggregate_with(&products, &self.thresholds),
            low_stock: low_stock_alerts(&products, &self.thresholds),
            recent: recent_products(&products, recent.unwrap_or(self.recent_limit)),
        })
    }

    /// Filtered products with their stock level. The service's thresholds
    /// replace whatever the caller put in `filter`.
    pub async fn list_products(&self, product_filter: ProductFilter) -> StoreResult<Vec<ClassifiedProduct>> {
        let products = self.snapshot().await?;
        let product_filter = product_filter.thresholds(self.thresholds);
        let matched = filter(&products, &product_filter);
        Ok(classify_all(&matched, &self.thresholds))
    }

    pub async fn get_product(&self, id: i64) -> StoreResult<ClassifiedProduct> {
        let product = self
            .store
            .get_product(id)
            .await?
            .ok_or_else(|| StoreError::not_found("product", id))?;
        Ok(ClassifiedProduct::new(product, &self.thresholds))
    }

    pub async fn find_by_sku(&self, sku: &str) -> StoreResult<ClassifiedProduct> {
        let product = self
            .store
            .find_by_sku(sku.trim())
            .await?
            .ok_or_else(|| StoreError::not_found("product", sku))?;
        Ok(ClassifiedProduct::new(product, &self.thresholds))
    }

    pub async fn create_product(&self, input: NewProduct) -> StoreResult<ClassifiedProduct> {
        let input = validated(input.normalized())?;
        let product = self.store.create_product(&input).await?;
        info!(product_id = product.id, sku = %product.sku, "product created");
        Ok(ClassifiedProduct::new(product, &self.thresholds))
    }

    pub async fn update_product(&self, id: i64, update: ProductUpdate) -> StoreResult<ClassifiedProduct> {
        let update = validated(update.normalized())?;
        let product = self.store.update_product(id, &update).await?;
        info!(product_id = id, "product updated");
        Ok(ClassifiedProduct::new(product, &self.thresholds))
    }

    pub async fn delete_product(&self, id: i64) -> StoreResult<()> {
        self.store.delete_product(id).await?;
        info!(product_id = id, "product deleted");
        Ok(())
    }

    pub async fn set_quantity(&self, id: i64, quantity: i64) -> StoreResult<ClassifiedProduct> {
        crate::domain::model::product::validate_quantity(quantity).map_err(StoreError::Validation)?;
        let product = self.store.set_quantity(id, quantity).await?;
        info!(product_id = id, quantity, "quantity set");
        Ok(ClassifiedProduct::new(product, &self.thresholds))
    }

    /// Category rollups from the current snapshot, followed by catalog
    /// categories with no products, filtered by a name search.
    pub async fn categories(&self, query: &str) -> StoreResult<Vec<CategoryRollup>> {
        let products = self.snapshot().await?;
        let catalog = self.store.list_categories().await?;
        let rollups = merge_catalog(aggregate_by_category(&products), &catalog);
        Ok(filter_categories(&rollups, query))
    }

    /// Products of one category, optionally narrowed by a free-text query.
    /// The stats always cover the whole category.
    pub async fn category_detail(&self, name: &str, query: &str) -> StoreResult<CategoryDetail> {
        let products = self.snapshot().await?;
        let members = products_in_category(&products, name);
        if members.is_empty() {
            let catalog = self.store.list_categories().await?;
            if !catalog.iter().any(|c| c.name == name) {
                return Err(StoreError::not_found("category", name));
            }
        }
        let stats = category_stats(&members);
        let visible = filter(&members, &ProductFilter::new().query(query));
        Ok(CategoryDetail {
            name: name.to_string(),
            stats,
            products: classify_all(&visible, &self.thresholds),
        })
    }

    pub async fn create_category(&self, input: NewCategory) -> StoreResult<CategoryRecord> {
        let input = validated(input.normalized())?;
        let record = self.store.create_category(&input).await?;
        info!(category = %record.name, "category created");
        Ok(record)
    }

    pub async fn rename_category(&self, from: &str, to: NewCategory) -> StoreResult<u64> {
        let to = validated(to.normalized())?;
        let moved = self.store.rename_category(from, &to).await?;
        info!(from, to = %to.name, count = moved, "category renamed");
        Ok(moved)
    }

    pub async fn delete_category(&self, name: &str) -> StoreResult<u64> {
        let unassigned = self.store.delete_category(name).await?;
        info!(category = name, count = unassigned, "category deleted");
        Ok(unassigned)
    }

    pub async fn record_movement(
        &self,
        product_id: i64,
        kind: MovementKind,
        quantity: i64,
        counterparty: Option<&str>,
    ) -> StoreResult<StockMovement> {
        if quantity <= 0 {
            return Err(StoreError::Validation(format!(
                "Movement quantity must be positive, got {}",
                quantity
            )));
        }
        crate::domain::model::product::validate_quantity(quantity).map_err(StoreError::Validation)?;
        let counterparty = counterparty.map(str::trim).filter(|c| !c.is_empty());
        match self
            .store
            .record_movement(product_id, kind, quantity, counterparty)
            .await
        {
            Ok(movement) => {
                info!(product_id, kind = %kind, quantity, movement_id = movement.id, "stock movement recorded");
                Ok(movement)
            }
            Err(err @ StoreError::InsufficientStock { .. }) => {
                warn!(product_id, quantity, error = %err, "stock exit rejected");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn list_movements(&self, product_id: i64, kind: MovementKind) -> StoreResult<Vec<StockMovement>> {
        if self.store.get_product(product_id).await?.is_none() {
            return Err(StoreError::not_found("product", product_id));
        }
        self.store.list_movements(product_id, kind).await
    }

    pub async fn entries_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> StoreResult<Vec<StockMovement>> {
        if start > end {
            return Err(StoreError::Validation(format!(
                "start ({}) must not be after end ({})",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        self.store.list_entries_between(start, end).await
    }

    pub async fn delete_movement(&self, id: i64) -> StoreResult<()> {
        self.store.delete_movement(id).await?;
        info!(movement_id = id, "stock movement deleted");
        Ok(())
    }
}

fn validated<T: ValidatePayload>(payload: T) -> StoreResult<T> {
    payload.validate().map_err(StoreError::Validation)?;
    Ok(payload)
}
