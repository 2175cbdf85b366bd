//! Dashboard statistics and the lists shown next to them.

use super::classifier::{ClassifiedProduct, StockItem, StockLevel, StockThresholds};
use crate::domain::model::Product;
use serde::Serialize;
use std::cmp::Ordering;
use utoipa::ToSchema;

/// Summary numbers for the dashboard header.
///
/// `total_value` is unrounded; formatting to cents is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStat {
    pub total_products: usize,
    pub low_stock_products: usize,
    pub out_of_stock_products: usize,
    pub total_value: f64,
}

/// Aggregates with the default stock bands.
pub fn aggregate<I: StockItem>(items: &[I]) -> DashboardStat {
    aggregate_with(items, &StockThresholds::default())
}

/// Single pass over `items`. Empty input yields all zeros.
pub fn aggregate_with<I: StockItem>(items: &[I], thresholds: &StockThresholds) -> DashboardStat {
    let mut stat = DashboardStat {
        total_products: items.len(),
        ..DashboardStat::default()
    };
    for item in items {
        match item.stock_level(thresholds) {
            StockLevel::Low => stat.low_stock_products += 1,
            StockLevel::Out => stat.out_of_stock_products += 1,
            StockLevel::Medium | StockLevel::High => {}
        }
        stat.total_value += item.stock_value();
    }
    stat
}

/// Products classified `low` or `out`, emptiest first.
pub fn low_stock_alerts(products: &[Product], thresholds: &StockThresholds) -> Vec<ClassifiedProduct> {
    let mut alerts: Vec<ClassifiedProduct> = products
        .iter()
        .filter(|p| p.stock_level(thresholds).needs_attention())
        .cloned()
        .map(|p| ClassifiedProduct::new(p, thresholds))
        .collect();
    // stable: equal quantities keep input order
    alerts.sort_by_key(|c| c.product.quantity);
    alerts
}

/// Newest products first. Rows without a timestamp go last; ties fall back
/// to the higher id.
pub fn recent_products(products: &[Product], limit: usize) -> Vec<Product> {
    let mut sorted: Vec<Product> = products.to_vec();
    sorted.sort_by(|a, b| match (&a.created_at, &b.created_at) {
        (Some(x), Some(y)) => y.cmp(x).then_with(|| b.id.cmp(&a.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.id.cmp(&a.id),
    });
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn product(id: i64, quantity: i64, price: f64) -> Product {
        Product {
            id,
            name: format!("p{}", id),
            sku: format!("SKU-{}", id),
            description: None,
            price,
            quantity,
            category: None,
            created_at: None,
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        let stat = aggregate::<Product>(&[]);
        assert_eq!(stat, DashboardStat::default());
    }

    #[test]
    fn counts_low_and_out() {
        let products = vec![
            product(1, 0, 1.0),
            product(2, 3, 1.0),
            product(3, 9, 1.0),
            product(4, 10, 1.0),
            product(5, 80, 1.0),
        ];
        let stat = aggregate(&products);
        assert_eq!(stat.total_products, 5);
        assert_eq!(stat.low_stock_products, 2);
        assert_eq!(stat.out_of_stock_products, 1);
        assert!((stat.total_value - 102.0).abs() < 1e-9);
    }

    #[test]
    fn precomputed_level_is_trusted() {
        let t = StockThresholds::default();
        let mut item = ClassifiedProduct::new(product(1, 30, 2.0), &t);
        item.stock_level = StockLevel::Low;
        let stat = aggregate(&[item]);
        assert_eq!(stat.low_stock_products, 1);
        assert!((stat.total_value - 60.0).abs() < 1e-9);
    }

    #[test]
    fn thresholds_change_counts() {
        let products = vec![product(1, 5, 1.0), product(2, 7, 1.0)];
        let t = StockThresholds::new(6, 50).unwrap();
        assert_eq!(aggregate_with(&products, &t).low_stock_products, 1);
        assert_eq!(aggregate(&products).low_stock_products, 2);
    }

    #[test]
    fn alerts_sorted_by_quantity() {
        let products = vec![
            product(1, 8, 1.0),
            product(2, 60, 1.0),
            product(3, 0, 1.0),
            product(4, 8, 1.0),
        ];
        let alerts = low_stock_alerts(&products, &StockThresholds::default());
        let ids: Vec<i64> = alerts.iter().map(|a| a.product.id).collect();
        assert_eq!(ids, vec![3, 1, 4]);
        assert_eq!(alerts[0].stock_level, StockLevel::Out);
    }

    #[test]
    fn recent_orders_by_created_at() {
        let mut a = product(1, 1, 1.0);
        a.created_at = Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        let mut b = product(2, 1, 1.0);
        b.created_at = Some(Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap());
        let c = product(3, 1, 1.0);
        let recent = recent_products(&[a, b, c], 2);
        let ids: Vec<i64> = recent.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
