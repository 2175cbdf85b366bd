use super::ValidatePayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// A sellable inventory item as loaded from the store.
///
/// The engine only reads products; creation and mutation go through
/// [`crate::storage::InventoryStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    /// Units on hand. Missing or `null` values load as zero.
    #[serde(default, deserialize_with = "deserialize_null_as_zero")]
    pub quantity: i64,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The category label, if the product carries a non-blank one.
    pub fn category_name(&self) -> Option<&str> {
        self.category
            .as_ref()
            .map(CategoryRef::name)
            .filter(|name| !name.trim().is_empty())
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// How a product points at its category.
///
/// Two data models exist upstream: a flat text label on the product, and a
/// foreign key into a categories table. Stores resolve rows into one of these
/// variants so the engine never has to know which model produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryRef {
    /// Category-by-name: the label is the identity.
    Named(String),
    /// Category-by-reference: a first-class category entity.
    Referenced {
        id: i64,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl CategoryRef {
    pub fn name(&self) -> &str {
        match self {
            CategoryRef::Named(name) => name,
            CategoryRef::Referenced { name, .. } => name,
        }
    }
}

/// Stable identifier of a category: the entity id when categories are
/// first-class, otherwise a slug derived from the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryId {
    Id(i64),
    Slug(String),
}

/// A category as known to the store's catalog, independent of product counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewCategory {
    /// Trims the name and drops a blank description.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: non_blank(self.description.as_deref()),
        }
    }
}

impl ValidatePayload for NewCategory {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Category name is required".to_string());
        }
        Ok(())
    }
}

/// Payload for creating a product. The category is always given by name;
/// stores resolve it to their own category model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewProduct {
    /// Trims text fields and turns blank optionals into `None`.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            sku: self.sku.trim().to_string(),
            description: non_blank(self.description.as_deref()),
            price: self.price,
            quantity: Some(self.quantity.unwrap_or(0)),
            category: non_blank(self.category.as_deref()),
        }
    }
}

impl ValidatePayload for NewProduct {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Product must have a name".to_string());
        }
        if self.sku.trim().is_empty() {
            return Err("Product must have a sku".to_string());
        }
        validate_price(self.price)?;
        validate_quantity(self.quantity.unwrap_or(0))
    }
}

/// Partial update of a product. Absent fields are left untouched.
///
/// `category` distinguishes "absent" (`None`) from an explicit `null`
/// (`Some(None)`), which clears the product's category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
}

impl ProductUpdate {
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.as_deref().map(|s| s.trim().to_string()),
            sku: self.sku.as_deref().map(|s| s.trim().to_string()),
            description: self.description.as_ref().map(|d| non_blank(d.as_deref())),
            price: self.price,
            quantity: self.quantity,
            category: self.category.as_ref().map(|c| non_blank(c.as_deref())),
        }
    }
}

impl ValidatePayload for ProductUpdate {
    fn validate(&self) -> Result<(), String> {
        if matches!(self.name.as_deref(), Some(n) if n.trim().is_empty()) {
            return Err("Product name cannot be empty".to_string());
        }
        if matches!(self.sku.as_deref(), Some(s) if s.trim().is_empty()) {
            return Err("Product sku cannot be empty".to_string());
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_price(price: f64) -> Result<(), String> {
    if !price.is_finite() || price < 0.0 {
        return Err(format!("Product price must be a non-negative number, got {}", price));
    }
    Ok(())
}

pub(crate) fn validate_quantity(quantity: i64) -> Result<(), String> {
    if quantity < 0 {
        return Err(format!("Product quantity cannot be negative, got {}", quantity));
    }
    if quantity > i32::MAX as i64 {
        return Err(format!("Product quantity out of range: {}", quantity));
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn deserialize_null_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(|q| q.unwrap_or(0))
}

/// Maps a present field (including `null`) to `Some`, so that
/// `#[serde(default)]` leaves only truly absent fields as `None`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_ref_accepts_both_models() {
        let named: CategoryRef = serde_json::from_value(json!("Electronics")).unwrap();
        assert_eq!(named, CategoryRef::Named("Electronics".to_string()));

        let referenced: CategoryRef =
            serde_json::from_value(json!({ "id": 3, "name": "Furniture" })).unwrap();
        assert_eq!(referenced.name(), "Furniture");
        assert!(matches!(referenced, CategoryRef::Referenced { id: 3, .. }));
    }

    #[test]
    fn missing_quantity_loads_as_zero() {
        let product: Product = serde_json::from_value(json!({
            "id": 1, "name": "Desk", "sku": "FU-1", "price": 10.0
        }))
        .unwrap();
        assert_eq!(product.quantity, 0);
        assert_eq!(product.description_or_empty(), "");
        assert!(product.category_name().is_none());
    }

    #[test]
    fn null_quantity_loads_as_zero() {
        let product: Product = serde_json::from_value(json!({
            "id": 1, "name": "Desk", "sku": "FU-1", "price": 10.0, "quantity": null
        }))
        .unwrap();
        assert_eq!(product.quantity, 0);

        let stocked: Product = serde_json::from_value(json!({
            "id": 2, "name": "Lamp", "sku": "FU-2", "price": 5.0, "quantity": 12
        }))
        .unwrap();
        assert_eq!(stocked.quantity, 12);
    }

    #[test]
    fn blank_category_is_not_a_category() {
        let product: Product = serde_json::from_value(json!({
            "id": 1, "name": "Desk", "sku": "FU-1", "price": 10.0, "category": "  "
        }))
        .unwrap();
        assert!(product.category_name().is_none());
    }

    #[test]
    fn new_product_validation() {
        let mut p = NewProduct {
            name: "Desk".into(),
            sku: "FU-1".into(),
            description: None,
            price: 10.0,
            quantity: None,
            category: Some("".into()),
        };
        assert!(p.validate().is_ok());
        assert_eq!(p.normalized().quantity, Some(0));
        assert_eq!(p.normalized().category, None);

        p.price = -1.0;
        assert!(p.validate().is_err());
        p.price = f64::NAN;
        assert!(p.validate().is_err());
        p.price = 1.0;
        p.sku = "   ".into();
        assert!(p.validate().is_err());
        p.sku = "FU-1".into();
        p.quantity = Some(-3);
        assert!(p.validate().is_err());
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let absent: ProductUpdate = serde_json::from_value(json!({ "price": 5.0 })).unwrap();
        assert_eq!(absent.category, None);

        let cleared: ProductUpdate = serde_json::from_value(json!({ "category": null })).unwrap();
        assert_eq!(cleared.category, Some(None));

        let set: ProductUpdate =
            serde_json::from_value(json!({ "category": "Furniture" })).unwrap();
        assert_eq!(set.category, Some(Some("Furniture".to_string())));
    }
}
