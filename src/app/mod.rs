pub mod inventory_service;

pub use inventory_service::{CategoryDetail, DashboardView, InventoryService};
