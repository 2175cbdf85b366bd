// src/performance_test.rs
// Times the aggregation engine over a large synthetic product snapshot.
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;

use stock_manager::domain::inventory::{
    aggregate_by_category, aggregate_with, filter, low_stock_alerts, ProductFilter, StockSelector,
    StockThresholds,
};
use stock_manager::domain::model::{CategoryRef, Product};

const CATEGORIES: &[&str] = &["Electronics", "Furniture", "Accessories", "Garden", "Office Supplies"];

fn synthetic_products(count: usize) -> Vec<Product> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| Product {
            id: i as i64 + 1,
            name: format!("Product {}", i),
            sku: format!("SKU-{:06}", i),
            description: if rng.gen_bool(0.5) {
                Some(format!("Synthetic item number {}", i))
            } else {
                None
            },
            price: rng.gen_range(0.5..2_000.0),
            quantity: rng.gen_range(0..120),
            category: if rng.gen_bool(0.9) {
                CATEGORIES
                    .choose(&mut rng)
                    .map(|c| CategoryRef::Named(c.to_string()))
            } else {
                None
            },
            created_at: Some(chrono::Utc::now() - chrono::Duration::seconds(rng.gen_range(0..86_400))),
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    let num_items: usize = std::env::args()
        .nth(1)
        .map(|v| v.parse())
        .transpose()?
        .unwrap_or(100_000);
    println!("--- Aggregation benchmark: {} products ---", num_items);

    let products = synthetic_products(num_items);
    let thresholds = StockThresholds::default();

    let start = Instant::now();
    let stats = aggregate_with(&products, &thresholds);
    let aggregate_time = start.elapsed();

    let start = Instant::now();
    let rollups = aggregate_by_category(&products);
    let category_time = start.elapsed();

    let start = Instant::now();
    let alerts = low_stock_alerts(&products, &thresholds);
    let alerts_time = start.elapsed();

    let start = Instant::now();
    let f = ProductFilter::new()
        .query("item 1")
        .category("Electronics")
        .stock(StockSelector::parse("medium"));
    let matched = filter(&products, &f);
    let filter_time = start.elapsed();

    println!("\n--- Results ---");
    println!(
        "Dashboard: {} products, {} low, {} out, total value {:.2}",
        stats.total_products, stats.low_stock_products, stats.out_of_stock_products, stats.total_value
    );
    println!("Categories: {}", rollups.len());
    println!("Low-stock alerts: {}", alerts.len());
    println!("Filter matches: {}", matched.len());
    println!();
    println!("aggregate:             {:>8.3} ms", aggregate_time.as_secs_f64() * 1e3);
    println!("aggregate_by_category: {:>8.3} ms", category_time.as_secs_f64() * 1e3);
    println!("low_stock_alerts:      {:>8.3} ms", alerts_time.as_secs_f64() * 1e3);
    println!("filter:                {:>8.3} ms", filter_time.as_secs_f64() * 1e3);
    Ok(())
}
