//! PostgreSQL-backed inventory store.
//!
//! Categories live in their own table and products reference them by id, so
//! rows load as [`CategoryRef::Referenced`].

use super::{InventoryStore, StoreError, StoreResult};
use crate::domain::model::{
    CategoryId, CategoryRecord, CategoryRef, MovementKind, NewCategory, NewProduct, Product,
    ProductUpdate, StockMovement,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{debug, info};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS categories (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        sku TEXT NOT NULL UNIQUE,
        description TEXT,
        price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
        quantity INTEGER DEFAULT 0,
        category_id BIGINT REFERENCES categories(id) ON DELETE SET NULL,
        created_at TIMESTAMPTZ DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS stock_movements (
        id BIGSERIAL PRIMARY KEY,
        product_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        kind TEXT NOT NULL CHECK (kind IN ('entry', 'exit')),
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        counterparty TEXT,
        recorded_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS stock_movements_product_idx ON stock_movements (product_id, kind)",
];

const PRODUCT_SELECT: &str = "SELECT p.id, p.name, p.sku, p.description, p.price, p.quantity, p.created_at,
        c.id AS category_id, c.name AS category_name, c.description AS category_description
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id";

const MOVEMENT_COLUMNS: &str = "id, product_id, kind, quantity, counterparty, recorded_at";

/// Inventory store over a `sqlx` connection pool.
#[derive(Clone)]
pub struct PgInventoryStore {
    pool: PgPool,
}

impl PgInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and makes sure the schema exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the inventory tables if they are missing. Safe to call repeatedly.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("inventory schema ready");
        Ok(())
    }

    /// Names of the inventory tables currently present in the `public` schema.
    pub async fn existing_tables(&self) -> StoreResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT table_name::text AS table_name FROM information_schema.tables
             WHERE table_schema = 'public'
               AND table_name IN ('categories', 'products', 'stock_movements')
             ORDER BY table_name",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|r| r.try_get::<String, _>("table_name").map_err(StoreError::from))
            .collect()
    }

    async fn fetch_product(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> StoreResult<Option<Product>> {
        let sql = format!("{} WHERE p.id = $1", PRODUCT_SELECT);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&mut **tx).await?;
        row.as_ref().map(product_from_row).transpose()
    }

    /// Finds or creates the category row for `name` and returns its id.
    async fn resolve_category(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> StoreResult<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;
        Ok(id)
    }

    async fn category_id_by_name(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> StoreResult<Option<i64>> {
        let id = sqlx::query_scalar("SELECT id FROM categories WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(id)
    }
}

fn product_from_row(row: &PgRow) -> StoreResult<Product> {
    let category_id: Option<i64> = row.try_get("category_id")?;
    let category = match category_id {
        Some(id) => Some(CategoryRef::Referenced {
            id,
            name: row.try_get("category_name")?,
            description: row.try_get("category_description")?,
        }),
        None => None,
    };
    let quantity: Option<i32> = row.try_get("quantity")?;
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        sku: row.try_get("sku")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        quantity: quantity.map(i64::from).unwrap_or(0),
        category,
        created_at: row.try_get("created_at")?,
    })
}

fn movement_from_row(row: &PgRow) -> StoreResult<StockMovement> {
    let kind: String = row.try_get("kind")?;
    let quantity: i32 = row.try_get("quantity")?;
    Ok(StockMovement {
        id: row.try_get("id")?,
        product_id: row.try_get("product_id")?,
        kind: kind.parse().map_err(StoreError::Validation)?,
        quantity: i64::from(quantity),
        counterparty: row.try_get("counterparty")?,
        recorded_at: row.try_get("recorded_at")?,
    })
}

fn to_i32(value: i64, field: &str) -> StoreResult<i32> {
    i32::try_from(value).map_err(|_| StoreError::Validation(format!("{} out of range: {}", field, value)))
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let sql = format!("{} ORDER BY p.id", PRODUCT_SELECT);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(product_from_row).collect()
    }

    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        let sql = format!("{} WHERE p.id = $1", PRODUCT_SELECT);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn find_by_sku(&self, sku: &str) -> StoreResult<Option<Product>> {
        let sql = format!("{} WHERE p.sku = $1", PRODUCT_SELECT);
        let row = sqlx::query(&sql).bind(sku).fetch_optional(&self.pool).await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn create_product(&self, input: &NewProduct) -> StoreResult<Product> {
        let mut tx = self.pool.begin().await?;
        let category_id = match input.category.as_deref() {
            Some(name) => Some(Self::resolve_category(&mut tx, name).await?),
            None => None,
        };
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO products (name, sku, description, price, quantity, category_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.sku)
        .bind(&input.description)
        .bind(input.price)
        .bind(to_i32(input.quantity.unwrap_or(0), "quantity")?)
        .bind(category_id)
        .fetch_one(&mut *tx)
        .await?;
        let product = Self::fetch_product(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::not_found("product", id))?;
        tx.commit().await?;
        debug!(product_id = id, sku = %product.sku, "product inserted");
        Ok(product)
    }

    async fn update_product(&self, id: i64, update: &ProductUpdate) -> StoreResult<Product> {
        let mut tx = self.pool.begin().await?;
        let current = Self::fetch_product(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::not_found("product", id))?;

        let category_id = match &update.category {
            None => match &current.category {
                Some(CategoryRef::Referenced { id, .. }) => Some(*id),
                _ => None,
            },
            Some(None) => None,
            Some(Some(name)) => Some(Self::resolve_category(&mut tx, name).await?),
        };
        let description = match &update.description {
            None => current.description.clone(),
            Some(d) => d.clone(),
        };

        sqlx::query(
            "UPDATE products
             SET name = $2, sku = $3, description = $4, price = $5, quantity = $6, category_id = $7
             WHERE id = $1",
        )
        .bind(id)
        .bind(update.name.as_deref().unwrap_or(&current.name))
        .bind(update.sku.as_deref().unwrap_or(&current.sku))
        .bind(description)
        .bind(update.price.unwrap_or(current.price))
        .bind(to_i32(update.quantity.unwrap_or(current.quantity), "quantity")?)
        .bind(category_id)
        .execute(&mut *tx)
        .await?;

        let product = Self::fetch_product(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::not_found("product", id))?;
        tx.commit().await?;
        Ok(product)
    }

    async fn delete_product(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("product", id));
        }
        Ok(())
    }

    async fn set_quantity(&self, id: i64, quantity: i64) -> StoreResult<Product> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("UPDATE products SET quantity = $2 WHERE id = $1")
            .bind(id)
            .bind(to_i32(quantity, "quantity")?)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("product", id));
        }
        let product = Self::fetch_product(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::not_found("product", id))?;
        tx.commit().await?;
        Ok(product)
    }

    async fn list_categories(&self) -> StoreResult<Vec<CategoryRecord>> {
        let rows = sqlx::query("SELECT id, name, description FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| -> StoreResult<CategoryRecord> {
                Ok(CategoryRecord {
                    id: CategoryId::Id(r.try_get("id")?),
                    name: r.try_get("name")?,
                    description: r.try_get("description")?,
                })
            })
            .collect()
    }

    async fn create_category(&self, input: &NewCategory) -> StoreResult<CategoryRecord> {
        let row = sqlx::query(
            "INSERT INTO categories (name, description) VALUES ($1, $2)
             RETURNING id, name, description",
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(CategoryRecord {
            id: CategoryId::Id(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        })
    }

    async fn rename_category(&self, from: &str, to: &NewCategory) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        let old_id = Self::category_id_by_name(&mut tx, from)
            .await?
            .ok_or_else(|| StoreError::not_found("category", from))?;

        let moved = match Self::category_id_by_name(&mut tx, &to.name).await? {
            Some(target_id) if target_id != old_id => {
                let moved = sqlx::query("UPDATE products SET category_id = $2 WHERE category_id = $1")
                    .bind(old_id)
                    .bind(target_id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
                if to.description.is_some() {
                    sqlx::query("UPDATE categories SET description = $2 WHERE id = $1")
                        .bind(target_id)
                        .bind(&to.description)
                        .execute(&mut *tx)
                        .await?;
                }
                sqlx::query("DELETE FROM categories WHERE id = $1")
                    .bind(old_id)
                    .execute(&mut *tx)
                    .await?;
                moved
            }
            _ => {
                sqlx::query(
                    "UPDATE categories SET name = $2, description = COALESCE($3, description) WHERE id = $1",
                )
                .bind(old_id)
                .bind(&to.name)
                .bind(&to.description)
                .execute(&mut *tx)
                .await?;
                let count: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = $1")
                        .bind(old_id)
                        .fetch_one(&mut *tx)
                        .await?;
                count as u64
            }
        };
        tx.commit().await?;
        Ok(moved)
    }

    async fn delete_category(&self, name: &str) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        let id = Self::category_id_by_name(&mut tx, name)
            .await?
            .ok_or_else(|| StoreError::not_found("category", name))?;
        let unassigned = sqlx::query("UPDATE products SET category_id = NULL WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(unassigned)
    }

    async fn record_movement(
        &self,
        product_id: i64,
        kind: MovementKind,
        quantity: i64,
        counterparty: Option<&str>,
    ) -> StoreResult<StockMovement> {
        let mut tx = self.pool.begin().await?;
        let current: Option<Option<i32>> =
            sqlx::query_scalar("SELECT quantity FROM products WHERE id = $1 FOR UPDATE")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;
        let available = match current {
            Some(q) => q.map(i64::from).unwrap_or(0),
            None => return Err(StoreError::not_found("product", product_id)),
        };
        let next = available + kind.signed(quantity);
        if next < 0 {
            return Err(StoreError::InsufficientStock {
                product_id,
                available,
                requested: quantity,
            });
        }

        sqlx::query("UPDATE products SET quantity = $2 WHERE id = $1")
            .bind(product_id)
            .bind(to_i32(next, "quantity")?)
            .execute(&mut *tx)
            .await?;
        let sql = format!(
            "INSERT INTO stock_movements (product_id, kind, quantity, counterparty)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            MOVEMENT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(product_id)
            .bind(kind.as_str())
            .bind(to_i32(quantity, "quantity")?)
            .bind(counterparty)
            .fetch_one(&mut *tx)
            .await?;
        let movement = movement_from_row(&row)?;
        tx.commit().await?;
        Ok(movement)
    }

    async fn list_movements(&self, product_id: i64, kind: MovementKind) -> StoreResult<Vec<StockMovement>> {
        let sql = format!(
            "SELECT {} FROM stock_movements WHERE product_id = $1 AND kind = $2 ORDER BY recorded_at, id",
            MOVEMENT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(product_id)
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(movement_from_row).collect()
    }

    async fn list_entries_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<StockMovement>> {
        let sql = format!(
            "SELECT {} FROM stock_movements
             WHERE kind = 'entry' AND recorded_at BETWEEN $1 AND $2
             ORDER BY recorded_at, id",
            MOVEMENT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(movement_from_row).collect()
    }

    async fn delete_movement(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM stock_movements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("stock movement", id));
        }
        Ok(())
    }
}
