//! Free-text and facet filtering over a product snapshot.

use super::category::CategoryRollup;
use super::classifier::{StockItem, StockLevel, StockThresholds};
use crate::domain::model::Product;

/// Requested stock facet.
///
/// An unrecognized value from the caller is kept as `Unrecognized` so it
/// filters everything out instead of being silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockSelector {
    Level(StockLevel),
    Unrecognized,
}

impl StockSelector {
    /// Parses a raw query value. Blank input means "no stock filter".
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(match raw.parse::<StockLevel>() {
            Ok(level) => StockSelector::Level(level),
            Err(_) => StockSelector::Unrecognized,
        })
    }
}

impl From<StockLevel> for StockSelector {
    fn from(level: StockLevel) -> Self {
        StockSelector::Level(level)
    }
}

/// All predicates are ANDed; empty/unset ones pass everything.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub query: String,
    pub category: String,
    pub stock: Option<StockSelector>,
    pub thresholds: StockThresholds,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn stock(mut self, stock: Option<StockSelector>) -> Self {
        self.stock = stock;
        self
    }

    pub fn thresholds(mut self, thresholds: StockThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.category.is_empty() && self.stock.is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.matches_query(product) && self.matches_category(product) && self.matches_stock(product)
    }

    fn matches_query(&self, product: &Product) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        [
            product.name.as_str(),
            product.sku.as_str(),
            product.description_or_empty(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_category(&self, product: &Product) -> bool {
        self.category.is_empty() || product.category_name() == Some(self.category.as_str())
    }

    fn matches_stock(&self, product: &Product) -> bool {
        match self.stock {
            None => true,
            Some(StockSelector::Level(level)) => product.stock_level(&self.thresholds) == level,
            Some(StockSelector::Unrecognized) => false,
        }
    }
}

/// Stable filter: the result is a subsequence of `products`.
pub fn filter(products: &[Product], filter: &ProductFilter) -> Vec<Product> {
    if filter.is_empty() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect()
}

/// Positional form with the default stock bands.
pub fn filter_products(
    products: &[Product],
    query: &str,
    category: Option<&str>,
    stock: Option<StockLevel>,
) -> Vec<Product> {
    let f = ProductFilter::new()
        .query(query)
        .category(category.unwrap_or_default())
        .stock(stock.map(StockSelector::from));
    filter(products, &f)
}

/// Case-insensitive name search over category rollups.
pub fn filter_categories(rollups: &[CategoryRollup], query: &str) -> Vec<CategoryRollup> {
    let needle = query.to_lowercase();
    rollups
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
