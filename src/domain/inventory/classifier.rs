//! Stock level classification.
//!
//! Every place that needs a stock label goes through [`StockThresholds::classify`];
//! nothing else in the crate compares quantities against band edges.

use crate::domain::model::Product;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Quantities strictly below this (and above zero) are `low`.
pub const DEFAULT_LOW_STOCK_BELOW: i64 = 10;
/// Quantities strictly below this (and at or above the low edge) are `medium`.
pub const DEFAULT_MEDIUM_STOCK_BELOW: i64 = 50;

/// Derived stock classification. Ordered from least to most stocked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Out,
    Low,
    Medium,
    High,
}

impl StockLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockLevel::Out => "out",
            StockLevel::Low => "low",
            StockLevel::Medium => "medium",
            StockLevel::High => "high",
        }
    }

    /// Human-facing badge text.
    pub fn label(&self) -> &'static str {
        match self {
            StockLevel::Out => "Out of Stock",
            StockLevel::Low => "Low Stock",
            StockLevel::Medium => "In Stock",
            StockLevel::High => "Well Stocked",
        }
    }

    /// Whether the level should show up in low-stock alerts.
    pub fn needs_attention(&self) -> bool {
        matches!(self, StockLevel::Out | StockLevel::Low)
    }
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "out" => Ok(StockLevel::Out),
            "low" => Ok(StockLevel::Low),
            "medium" => Ok(StockLevel::Medium),
            "high" => Ok(StockLevel::High),
            other => Err(format!("unknown stock level '{}'", other)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid stock thresholds: low={low_below}, medium={medium_below} (need 1 <= low <= medium)")]
pub struct InvalidThresholds {
    pub low_below: i64,
    pub medium_below: i64,
}

/// Band edges for [`StockLevel`].
///
/// Defaults to 10/50. The low edge is configurable because older views used
/// a `<= 5` cut-off for "low stock"; see `LOW_STOCK_THRESHOLD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StockThresholds {
    low_below: i64,
    medium_below: i64,
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            low_below: DEFAULT_LOW_STOCK_BELOW,
            medium_below: DEFAULT_MEDIUM_STOCK_BELOW,
        }
    }
}

impl StockThresholds {
    pub fn new(low_below: i64, medium_below: i64) -> Result<Self, InvalidThresholds> {
        if low_below < 1 || medium_below < low_below {
            return Err(InvalidThresholds {
                low_below,
                medium_below,
            });
        }
        Ok(Self {
            low_below,
            medium_below,
        })
    }

    pub fn low_below(&self) -> i64 {
        self.low_below
    }

    pub fn medium_below(&self) -> i64 {
        self.medium_below
    }

    /// Maps a quantity to its band. Non-positive quantities are `Out`.
    pub fn classify(&self, quantity: i64) -> StockLevel {
        if quantity <= 0 {
            StockLevel::Out
        } else if quantity < self.low_below {
            StockLevel::Low
        } else if quantity < self.medium_below {
            StockLevel::Medium
        } else {
            StockLevel::High
        }
    }
}

/// Classifies with the default 10/50 bands.
pub fn classify(quantity: i64) -> StockLevel {
    StockThresholds::default().classify(quantity)
}

/// Anything the aggregators can count and value.
///
/// Plain products are classified on demand; items that already carry a level
/// (see [`ClassifiedProduct`]) report it directly.
pub trait StockItem {
    fn price(&self) -> f64;

    fn quantity(&self) -> i64;

    fn stock_level(&self, thresholds: &StockThresholds) -> StockLevel {
        thresholds.classify(self.quantity())
    }

    fn stock_value(&self) -> f64 {
        self.price() * self.quantity().max(0) as f64
    }
}

impl StockItem for Product {
    fn price(&self) -> f64 {
        self.price
    }

    fn quantity(&self) -> i64 {
        self.quantity
    }
}

/// A product paired with its level, as handed to presentation code.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClassifiedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub stock_level: StockLevel,
    /// Badge text for `stock_level`.
    pub stock_label: &'static str,
}

impl ClassifiedProduct {
    pub fn new(product: Product, thresholds: &StockThresholds) -> Self {
        let stock_level = product.stock_level(thresholds);
        Self {
            product,
            stock_level,
            stock_label: stock_level.label(),
        }
    }
}

impl StockItem for ClassifiedProduct {
    fn price(&self) -> f64 {
        self.product.price
    }

    fn quantity(&self) -> i64 {
        self.product.quantity
    }

    fn stock_level(&self, _thresholds: &StockThresholds) -> StockLevel {
        self.stock_level
    }
}

pub fn classify_all(products: &[Product], thresholds: &StockThresholds) -> Vec<ClassifiedProduct> {
    products
        .iter()
        .cloned()
        .map(|p| ClassifiedProduct::new(p, thresholds))
        .collect()
}
