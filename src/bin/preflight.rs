use stock_manager::infra::config;
use stock_manager::infra::logging;
use stock_manager::storage::{InventoryStore, PgInventoryStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--create-schema]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL\n\
         Optional:\n\
           DB_MAX_CONNECTIONS (default 5)\n"
    );
    std::process::exit(2);
}

const EXPECTED_TABLES: &[&str] = &["categories", "products", "stock_movements"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let create_schema = args.iter().any(|a| a == "--create-schema");

    let database_url = config::database_url()?;
    let max_connections = std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(config::DEFAULT_DB_MAX_CONNECTIONS);

    println!("> Preflight:");
    println!("  DB_MAX_CONNECTIONS={}", max_connections);

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot connect to DATABASE_URL: {}", e))?;
    let store = PgInventoryStore::new(pool);

    store.ping().await?;
    let version: String = sqlx::query_scalar("SELECT version()")
        .fetch_one(store.pool())
        .await?;
    println!("  Postgres: {}", version);

    if create_schema {
        store.ensure_schema().await?;
        println!("  Schema ensured.");
    }

    let present = store.existing_tables().await?;
    let missing: Vec<&str> = EXPECTED_TABLES
        .iter()
        .copied()
        .filter(|t| !present.iter().any(|p| p == t))
        .collect();

    if missing.is_empty() {
        let products = store.list_products().await?;
        let categories = store.list_categories().await?;
        println!(
            "  Tables present. {} products, {} categories.",
            products.len(),
            categories.len()
        );
        println!("> Preflight OK.");
        Ok(())
    } else {
        eprintln!("  Missing tables: {}", missing.join(", "));
        eprintln!("  Re-run with --create-schema, or start the server once (it creates them).");
        std::process::exit(1);
    }
}
