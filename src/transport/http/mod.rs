pub mod router;
pub mod types;
pub mod handlers {
    pub mod categories;
    pub mod common;
    pub mod dashboard;
    pub mod health;
    pub mod products;
    pub mod stock;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
