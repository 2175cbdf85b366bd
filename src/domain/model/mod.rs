//! Domain model definitions for inventory records.
//!
//! Products, categories and stock movements are owned by the store; everything
//! here is a plain value that the aggregation engine and the HTTP layer read.

pub mod demo;
pub mod movement;
pub mod product;

pub use movement::{MovementKind, StockMovement};
pub use product::{
    CategoryId, CategoryRecord, CategoryRef, NewCategory, NewProduct, Product, ProductUpdate,
};

/// Contract for write payloads that must be checked before they reach a store.
///
/// `InventoryService` runs this on every write before handing the payload to
/// a store.
pub trait ValidatePayload {
    /// Returns Ok(()) if valid, Err(String) with error message if invalid.
    fn validate(&self) -> Result<(), String>;
}
