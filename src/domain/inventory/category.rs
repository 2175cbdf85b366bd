//! Category rollups derived from the product list.
//!
//! Counts are recomputed from whatever snapshot is passed in; nothing here is
//! cached or stored.

use super::classifier::StockItem;
use crate::domain::model::{CategoryId, CategoryRecord, CategoryRef, Product};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// One category with its current product count.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryRollup {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub product_count: usize,
}

/// Header numbers for a single category's detail view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, ToSchema)]
pub struct CategoryStats {
    pub total_products: usize,
    pub total_units: i64,
    pub total_value: f64,
}

/// Lowercases the trimmed name and collapses each whitespace run into one `-`.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// `"Collection of 1 product"`, `"Collection of 3 products"`.
pub fn default_description(count: usize) -> String {
    let noun = if count == 1 { "product" } else { "products" };
    format!("Collection of {} {}", count, noun)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Name(String),
    Id(i64),
}

struct Group {
    id: CategoryId,
    name: String,
    description: Option<String>,
    count: usize,
}

/// Groups products by category in first-seen order.
///
/// Uncategorized products (no category, or a blank name) belong to no group.
/// Name-based categories group on the exact name and get a slug id;
/// referenced categories group on their entity id.
pub fn aggregate_by_category(products: &[Product]) -> Vec<CategoryRollup> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for product in products {
        let Some(category) = product.category.as_ref() else {
            continue;
        };
        if category.name().trim().is_empty() {
            continue;
        }
        let key = match category {
            CategoryRef::Named(name) => GroupKey::Name(name.clone()),
            CategoryRef::Referenced { id, .. } => GroupKey::Id(*id),
        };
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(new_group(category));
            groups.len() - 1
        });
        groups[slot].count += 1;
    }

    groups
        .into_iter()
        .map(|g| CategoryRollup {
            description: g
                .description
                .unwrap_or_else(|| default_description(g.count)),
            id: g.id,
            name: g.name,
            product_count: g.count,
        })
        .collect()
}

fn new_group(category: &CategoryRef) -> Group {
    match category {
        CategoryRef::Named(name) => Group {
            id: CategoryId::Slug(slugify(name)),
            name: name.clone(),
            description: None,
            count: 0,
        },
        CategoryRef::Referenced {
            id,
            name,
            description,
        } => Group {
            id: CategoryId::Id(*id),
            name: name.clone(),
            description: description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(str::to_string),
            count: 0,
        },
    }
}

/// Appends catalog categories that no product currently uses, with a zero
/// count. Categories already present in `rollups` (by name) are left alone.
pub fn merge_catalog(mut rollups: Vec<CategoryRollup>, catalog: &[CategoryRecord]) -> Vec<CategoryRollup> {
    for record in catalog {
        if rollups.iter().any(|r| r.name == record.name) {
            continue;
        }
        rollups.push(CategoryRollup {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| default_description(0)),
            product_count: 0,
        });
    }
    rollups
}

/// Products whose category name equals `name` exactly, in input order.
pub fn products_in_category(products: &[Product], name: &str) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.category_name() == Some(name))
        .cloned()
        .collect()
}

pub fn category_stats(products: &[Product]) -> CategoryStats {
    products.iter().fold(CategoryStats::default(), |mut acc, p| {
        acc.total_products += 1;
        acc.total_units += p.quantity.max(0);
        acc.total_value += p.stock_value();
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: i64, category: Option<&str>) -> Product {
        Product {
            id,
            name: format!("p{}", id),
            sku: format!("SKU-{}", id),
            description: None,
            price: 2.5,
            quantity: 4,
            category: category.map(|c| CategoryRef::Named(c.to_string())),
            created_at: None,
        }
    }

    fn referenced(id: i64, cat_id: i64, cat_name: &str, description: Option<&str>) -> Product {
        Product {
            category: Some(CategoryRef::Referenced {
                id: cat_id,
                name: cat_name.to_string(),
                description: description.map(str::to_string),
            }),
            ..named(id, None)
        }
    }

    #[test]
    fn slug_rules() {
        assert_eq!(slugify("Home Office"), "home-office");
        assert_eq!(slugify("  Garden \t  Tools  "), "garden-tools");
        assert_eq!(slugify("Electronics"), "electronics");
    }

    #[test]
    fn description_pluralizes() {
        assert_eq!(default_description(1), "Collection of 1 product");
        assert_eq!(default_description(2), "Collection of 2 products");
        assert_eq!(default_description(0), "Collection of 0 products");
    }

    #[test]
    fn groups_in_first_seen_order() {
        let products = vec![
            named(1, Some("Furniture")),
            named(2, Some("Electronics")),
            named(3, None),
            named(4, Some("Furniture")),
            named(5, Some("")),
        ];
        let rollups = aggregate_by_category(&products);
        assert_eq!(rollups.len(), 2);
        assert_eq!(rollups[0].name, "Furniture");
        assert_eq!(rollups[0].product_count, 2);
        assert_eq!(rollups[0].id, CategoryId::Slug("furniture".to_string()));
        assert_eq!(rollups[0].description, "Collection of 2 products");
        assert_eq!(rollups[1].name, "Electronics");
        assert_eq!(rollups[1].description, "Collection of 1 product");
    }

    #[test]
    fn referenced_categories_keep_their_id_and_description() {
        let products = vec![
            referenced(1, 7, "Tools", Some("Hand and power tools")),
            referenced(2, 7, "Tools", Some("Hand and power tools")),
            referenced(3, 9, "Paint", None),
        ];
        let rollups = aggregate_by_category(&products);
        assert_eq!(rollups[0].id, CategoryId::Id(7));
        assert_eq!(rollups[0].product_count, 2);
        assert_eq!(rollups[0].description, "Hand and power tools");
        assert_eq!(rollups[1].description, "Collection of 1 product");
    }

    #[test]
    fn catalog_adds_unused_categories() {
        let rollups = aggregate_by_category(&[named(1, Some("Furniture"))]);
        let catalog = vec![
            CategoryRecord {
                id: CategoryId::Slug("furniture".into()),
                name: "Furniture".into(),
                description: None,
            },
            CategoryRecord {
                id: CategoryId::Slug("garden".into()),
                name: "Garden".into(),
                description: Some("Outdoor".into()),
            },
        ];
        let merged = merge_catalog(rollups, &catalog);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].name, "Garden");
        assert_eq!(merged[1].product_count, 0);
        assert_eq!(merged[1].description, "Outdoor");
    }

    #[test]
    fn stats_sum_units_and_value() {
        let products = products_in_category(
            &[named(1, Some("A")), named(2, Some("B")), named(3, Some("A"))],
            "A",
        );
        let stats = category_stats(&products);
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_units, 8);
        assert!((stats.total_value - 20.0).abs() < 1e-9);
    }

    #[test]
    fn category_match_is_case_sensitive() {
        let products = vec![named(1, Some("Tools"))];
        assert!(products_in_category(&products, "tools").is_empty());
    }
}
