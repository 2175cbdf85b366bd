//! Postgres store against a real database.
//!
//! Skipped unless `DATABASE_URL` is set. Uses SKUs and category names with a
//! per-run suffix so it can share a database with other data.

use std::env;
use stock_manager::domain::model::{CategoryRef, MovementKind, NewCategory, NewProduct, ProductUpdate};
use stock_manager::storage::{InventoryStore, PgInventoryStore, StoreError};

fn run_suffix() -> String {
    format!("{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_postgres_store_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping Postgres store test");
        return Ok(());
    };

    let store = PgInventoryStore::connect(&url, 2).await?;
    store.ping().await?;
    // Idempotent.
    store.ensure_schema().await?;

    let suffix = run_suffix();
    let category = format!("Tools {}", suffix);
    let sku = format!("PG-{}", suffix);

    let created = store
        .create_product(&NewProduct {
            name: "Cordless Drill".to_string(),
            sku: sku.clone(),
            description: None,
            price: 89.9,
            quantity: Some(4),
            category: Some(category.clone()),
        })
        .await?;
    assert_eq!(created.quantity, 4);
    assert!(created.created_at.is_some());
    match &created.category {
        Some(CategoryRef::Referenced { name, .. }) => assert_eq!(name, &category),
        other => panic!("expected a referenced category, got {:?}", other),
    }

    let duplicate = store
        .create_product(&NewProduct {
            name: "Other".to_string(),
            sku: sku.clone(),
            description: None,
            price: 1.0,
            quantity: None,
            category: None,
        })
        .await;
    assert!(matches!(duplicate, Err(StoreError::Conflict(_))));

    let entry = store
        .record_movement(created.id, MovementKind::Entry, 6, Some("Acme"))
        .await?;
    assert_eq!(entry.kind, MovementKind::Entry);
    let exit = store
        .record_movement(created.id, MovementKind::Exit, 11, None)
        .await;
    assert!(matches!(exit, Err(StoreError::InsufficientStock { available: 10, .. })));
    let reloaded = store.get_product(created.id).await?.expect("product exists");
    assert_eq!(reloaded.quantity, 10);

    let updated = store
        .update_product(
            created.id,
            &ProductUpdate {
                price: Some(79.9),
                ..ProductUpdate::default()
            },
        )
        .await?;
    assert_eq!(updated.price, 79.9);
    assert_eq!(updated.category.as_ref().map(|c| c.name()), Some(category.as_str()));

    let renamed = format!("Power Tools {}", suffix);
    let moved = store
        .rename_category(
            &category,
            &NewCategory {
                name: renamed.clone(),
                description: Some("Drills and saws".to_string()),
            },
        )
        .await?;
    assert_eq!(moved, 1);
    assert_eq!(store.delete_category(&renamed).await?, 1);
    let orphan = store.find_by_sku(&sku).await?.expect("product exists");
    assert!(orphan.category.is_none());

    store.delete_movement(entry.id).await?;
    store.delete_product(created.id).await?;
    assert!(matches!(
        store.delete_product(created.id).await,
        Err(StoreError::NotFound { .. })
    ));
    Ok(())
}
