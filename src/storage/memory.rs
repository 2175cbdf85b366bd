//! In-process inventory store.
//!
//! Categories are plain labels on the product ([`CategoryRef::Named`]) plus a
//! small catalog of known names, so a category can exist before any product
//! uses it.

use super::{InventoryStore, StoreError, StoreResult};
use crate::domain::inventory::slugify;
use crate::domain::model::demo::{demo_categories, demo_products};
use crate::domain::model::product::validate_quantity;
use crate::domain::model::{
    CategoryId, CategoryRecord, CategoryRef, MovementKind, NewCategory, NewProduct, Product,
    ProductUpdate, StockMovement,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    products: Vec<Product>,
    categories: Vec<CategoryRecord>,
    movements: Vec<StockMovement>,
    next_product_id: i64,
    next_movement_id: i64,
}

impl Tables {
    fn product_mut(&mut self, id: i64) -> StoreResult<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("product", id))
    }

    fn ensure_sku_free(&self, sku: &str, except: Option<i64>) -> StoreResult<()> {
        if self
            .products
            .iter()
            .any(|p| p.sku == sku && Some(p.id) != except)
        {
            return Err(StoreError::Conflict(format!("sku '{}' already exists", sku)));
        }
        Ok(())
    }

    fn ensure_category(&mut self, name: &str) {
        if !self.categories.iter().any(|c| c.name == name) {
            self.categories.push(CategoryRecord {
                id: CategoryId::Slug(slugify(name)),
                name: name.to_string(),
                description: None,
            });
        }
    }

    fn insert_category(&mut self, input: &NewCategory) -> StoreResult<CategoryRecord> {
        if self.categories.iter().any(|c| c.name == input.name) {
            return Err(StoreError::Conflict(format!(
                "category '{}' already exists",
                input.name
            )));
        }
        let record = CategoryRecord {
            id: CategoryId::Slug(slugify(&input.name)),
            name: input.name.clone(),
            description: input.description.clone(),
        };
        self.categories.push(record.clone());
        Ok(record)
    }

    fn insert_product(&mut self, input: &NewProduct) -> StoreResult<Product> {
        self.ensure_sku_free(&input.sku, None)?;
        if let Some(name) = input.category.as_deref() {
            self.ensure_category(name);
        }
        self.next_product_id += 1;
        let product = Product {
            id: self.next_product_id,
            name: input.name.clone(),
            sku: input.sku.clone(),
            description: input.description.clone(),
            price: input.price,
            quantity: input.quantity.unwrap_or(0),
            category: input.category.clone().map(CategoryRef::Named),
            created_at: Some(Utc::now()),
        };
        self.products.push(product.clone());
        Ok(product)
    }

    fn relabel(&mut self, from: &str, to: Option<&str>) -> u64 {
        let mut touched = 0;
        for product in self.products.iter_mut() {
            if product.category_name() == Some(from) {
                product.category = to.map(|name| CategoryRef::Named(name.to_string()));
                touched += 1;
            }
        }
        touched
    }

    fn knows_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
            || self.products.iter().any(|p| p.category_name() == Some(name))
    }
}

/// Inventory store kept entirely in memory. Used for demos and tests.
#[derive(Default)]
pub struct MemoryInventoryStore {
    tables: RwLock<Tables>,
}

impl MemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with the demo catalogue.
    pub fn with_demo_data() -> Self {
        let mut tables = Tables::default();
        for category in demo_categories() {
            // Demo names are distinct.
            let _ = tables.insert_category(&category);
        }
        for product in demo_products() {
            let _ = tables.insert_product(&product);
        }
        Self {
            tables: RwLock::new(tables),
        }
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.tables.read().await.products.clone())
    }

    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_sku(&self, sku: &str) -> StoreResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.sku == sku).cloned())
    }

    async fn create_product(&self, input: &NewProduct) -> StoreResult<Product> {
        self.tables.write().await.insert_product(input)
    }

    async fn update_product(&self, id: i64, update: &ProductUpdate) -> StoreResult<Product> {
        let mut tables = self.tables.write().await;
        tables.product_mut(id)?;
        if let Some(sku) = update.sku.as_deref() {
            tables.ensure_sku_free(sku, Some(id))?;
        }
        if let Some(Some(name)) = &update.category {
            tables.ensure_category(name);
        }

        let product = tables.product_mut(id)?;
        if let Some(name) = &update.name {
            product.name = name.clone();
        }
        if let Some(sku) = &update.sku {
            product.sku = sku.clone();
        }
        if let Some(description) = &update.description {
            product.description = description.clone();
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(quantity) = update.quantity {
            product.quantity = quantity;
        }
        if let Some(category) = &update.category {
            product.category = category.clone().map(CategoryRef::Named);
        }
        Ok(product.clone())
    }

    async fn delete_product(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        if tables.products.len() == before {
            return Err(StoreError::not_found("product", id));
        }
        tables.movements.retain(|m| m.product_id != id);
        Ok(())
    }

    async fn set_quantity(&self, id: i64, quantity: i64) -> StoreResult<Product> {
        let mut tables = self.tables.write().await;
        let product = tables.product_mut(id)?;
        product.quantity = quantity;
        Ok(product.clone())
    }

    async fn list_categories(&self) -> StoreResult<Vec<CategoryRecord>> {
        Ok(self.tables.read().await.categories.clone())
    }

    async fn create_category(&self, input: &NewCategory) -> StoreResult<CategoryRecord> {
        self.tables.write().await.insert_category(input)
    }

    async fn rename_category(&self, from: &str, to: &NewCategory) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        if !tables.knows_category(from) {
            return Err(StoreError::not_found("category", from));
        }
        let moved = tables.relabel(from, Some(&to.name));

        let old_description = tables
            .categories
            .iter()
            .find(|c| c.name == from)
            .and_then(|c| c.description.clone());
        tables.categories.retain(|c| c.name != from);
        match tables.categories.iter_mut().find(|c| c.name == to.name) {
            Some(existing) => {
                if to.description.is_some() {
                    existing.description = to.description.clone();
                }
            }
            None => tables.categories.push(CategoryRecord {
                id: CategoryId::Slug(slugify(&to.name)),
                name: to.name.clone(),
                description: to.description.clone().or(old_description),
            }),
        }
        Ok(moved)
    }

    async fn delete_category(&self, name: &str) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        if !tables.knows_category(name) {
            return Err(StoreError::not_found("category", name));
        }
        tables.categories.retain(|c| c.name != name);
        Ok(tables.relabel(name, None))
    }

    async fn record_movement(
        &self,
        product_id: i64,
        kind: MovementKind,
        quantity: i64,
        counterparty: Option<&str>,
    ) -> StoreResult<StockMovement> {
        let mut tables = self.tables.write().await;
        let product = tables.product_mut(product_id)?;
        let next = product.quantity + kind.signed(quantity);
        if next < 0 {
            return Err(StoreError::InsufficientStock {
                product_id,
                available: product.quantity,
                requested: quantity,
            });
        }
        validate_quantity(next).map_err(StoreError::Validation)?;
        product.quantity = next;

        tables.next_movement_id += 1;
        let movement = StockMovement {
            id: tables.next_movement_id,
            product_id,
            kind,
            quantity,
            counterparty: counterparty.map(str::to_string),
            recorded_at: Utc::now(),
        };
        tables.movements.push(movement.clone());
        Ok(movement)
    }

    async fn list_movements(&self, product_id: i64, kind: MovementKind) -> StoreResult<Vec<StockMovement>> {
        let tables = self.tables.read().await;
        Ok(tables
            .movements
            .iter()
            .filter(|m| m.product_id == product_id && m.kind == kind)
            .cloned()
            .collect())
    }

    async fn list_entries_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<StockMovement>> {
        let tables = self.tables.read().await;
        Ok(tables
            .movements
            .iter()
            .filter(|m| m.kind == MovementKind::Entry && m.recorded_at >= start && m.recorded_at <= end)
            .cloned()
            .collect())
    }

    async fn delete_movement(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.movements.len();
        tables.movements.retain(|m| m.id != id);
        if tables.movements.len() == before {
            return Err(StoreError::not_found("stock movement", id));
        }
        Ok(())
    }
}
