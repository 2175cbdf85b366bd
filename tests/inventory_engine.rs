//! Aggregation engine behaviour over whole snapshots:
//! the reference scenarios first, then generated properties.

use proptest::prelude::*;
use stock_manager::domain::inventory::{
    aggregate, aggregate_by_category, category_stats, classify, filter, filter_products,
    low_stock_alerts, ProductFilter, StockLevel, StockThresholds,
};
use stock_manager::domain::model::{CategoryRef, Product};

fn product(id: i64, name: &str, sku: &str, quantity: i64, price: f64, category: Option<&str>) -> Product {
    Product {
        id,
        name: name.to_string(),
        sku: sku.to_string(),
        description: None,
        price,
        quantity,
        category: category.map(|c| CategoryRef::Named(c.to_string())),
        created_at: None,
    }
}

fn headphones_and_keyboard() -> Vec<Product> {
    vec![
        product(1, "Wireless Headphones", "EL-WH-001", 45, 199.99, Some("Electronics")),
        product(2, "Mechanical Keyboard", "EL-KB-003", 0, 129.99, Some("Electronics")),
    ]
}

#[test]
fn dashboard_totals_for_two_electronics() {
    let stat = aggregate(&headphones_and_keyboard());
    assert_eq!(stat.total_products, 2);
    assert_eq!(stat.low_stock_products, 0);
    assert_eq!(stat.out_of_stock_products, 1);
    assert!((stat.total_value - 8999.55).abs() < 1e-6);
}

#[test]
fn band_edges() {
    assert_eq!(classify(7), StockLevel::Low);
    assert_eq!(classify(49), StockLevel::Medium);
    assert_eq!(classify(50), StockLevel::High);
    assert_eq!(classify(0), StockLevel::Out);
}

#[test]
fn uncategorized_products_are_left_out_of_rollups() {
    let mut products = Vec::new();
    for i in 0..3 {
        products.push(product(i, "e", &format!("E-{}", i), 1, 1.0, Some("Electronics")));
    }
    for i in 3..5 {
        products.push(product(i, "f", &format!("F-{}", i), 1, 1.0, Some("Furniture")));
    }
    products.push(product(5, "u", "U-5", 1, 1.0, None));

    let rollups = aggregate_by_category(&products);
    assert_eq!(rollups.len(), 2);
    assert_eq!((rollups[0].name.as_str(), rollups[0].product_count), ("Electronics", 3));
    assert_eq!((rollups[1].name.as_str(), rollups[1].product_count), ("Furniture", 2));
}

#[test]
fn query_matches_keyboard_only() {
    let matched = filter_products(&headphones_and_keyboard(), "key", Some(""), None);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Mechanical Keyboard");
}

#[test]
fn empty_snapshot_gives_zeros() {
    let stat = aggregate::<Product>(&[]);
    assert_eq!(stat.total_products, 0);
    assert_eq!(stat.low_stock_products, 0);
    assert_eq!(stat.out_of_stock_products, 0);
    assert_eq!(stat.total_value, 0.0);
    assert!(aggregate_by_category(&[]).is_empty());
}

#[test]
fn lowered_threshold_changes_low_count() {
    let products = vec![
        product(1, "a", "A", 3, 1.0, None),
        product(2, "b", "B", 7, 1.0, None),
    ];
    let strict = StockThresholds::new(5, 50).unwrap();
    assert_eq!(low_stock_alerts(&products, &strict).len(), 1);
    assert_eq!(low_stock_alerts(&products, &StockThresholds::default()).len(), 2);
}

fn arb_product() -> impl Strategy<Value = Product> {
    (
        0i64..10_000,
        "[a-zA-Z ]{0,12}",
        0i64..500,
        0.0f64..1_000.0,
        prop::option::of(prop::sample::select(vec!["Electronics", "Furniture", "Accessories", ""])),
    )
        .prop_map(|(id, name, quantity, price, category)| Product {
            id,
            sku: format!("SKU-{}", id),
            name,
            description: None,
            price,
            quantity,
            category: category.map(|c| CategoryRef::Named(c.to_string())),
            created_at: None,
        })
}

proptest! {
    #[test]
    fn classify_is_monotonic(a in -100i64..1_000, b in -100i64..1_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(lo) <= classify(hi));
        prop_assert_eq!(classify(lo), classify(lo));
    }

    #[test]
    fn total_value_is_sum_of_price_times_quantity(products in prop::collection::vec(arb_product(), 0..40)) {
        let expected: f64 = products.iter().map(|p| p.price * p.quantity as f64).sum();
        let stat = aggregate(&products);
        prop_assert!((stat.total_value - expected).abs() <= 1e-6 * expected.max(1.0));
        prop_assert!((category_stats(&products).total_value - stat.total_value).abs() <= 1e-6 * expected.max(1.0));
    }

    #[test]
    fn rollup_counts_cover_categorized_products(products in prop::collection::vec(arb_product(), 0..40)) {
        let categorized = products.iter().filter(|p| p.category_name().is_some()).count();
        let counted: usize = aggregate_by_category(&products).iter().map(|r| r.product_count).sum();
        prop_assert_eq!(counted, categorized);
    }

    #[test]
    fn empty_filter_is_identity(products in prop::collection::vec(arb_product(), 0..40)) {
        prop_assert_eq!(filter(&products, &ProductFilter::new()), products.clone());
        prop_assert_eq!(filter_products(&products, "", None, None), products);
    }

    #[test]
    fn alerts_are_exactly_low_and_out(products in prop::collection::vec(arb_product(), 0..40)) {
        let thresholds = StockThresholds::default();
        let alerts = low_stock_alerts(&products, &thresholds);
        let expected = products.iter().filter(|p| p.quantity < thresholds.low_below()).count();
        prop_assert_eq!(alerts.len(), expected);
        prop_assert!(alerts.windows(2).all(|w| w[0].product.quantity <= w[1].product.quantity));
    }
}
