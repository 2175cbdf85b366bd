use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by an [`super::InventoryStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("insufficient stock for product {product_id}: {available} available, {requested} requested")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::Conflict(db.message().to_string());
            }
            if db.is_check_violation() {
                return StoreError::Validation(db.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}
