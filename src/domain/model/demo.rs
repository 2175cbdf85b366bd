//! Demo catalogue used to seed the in-memory store.

use super::{NewCategory, NewProduct};

fn product(
    name: &str,
    sku: &str,
    description: &str,
    category: &str,
    price: f64,
    quantity: i64,
) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        sku: sku.to_string(),
        description: Some(description.to_string()),
        price,
        quantity: Some(quantity),
        category: Some(category.to_string()),
    }
}

pub fn demo_categories() -> Vec<NewCategory> {
    [
        ("Electronics", "Electronic devices and gadgets"),
        ("Furniture", "Office and home furniture"),
        ("Accessories", "Various accessories and add-ons"),
    ]
    .into_iter()
    .map(|(name, description)| NewCategory {
        name: name.to_string(),
        description: Some(description.to_string()),
    })
    .collect()
}

pub fn demo_products() -> Vec<NewProduct> {
    vec![
        product(
            "Wireless Headphones",
            "EL-WH-001",
            "Premium noise cancelling wireless headphones with long battery life",
            "Electronics",
            199.99,
            45,
        ),
        product(
            "Smart Watch",
            "EL-SW-002",
            "Fitness and health tracking smartwatch with heart rate monitor",
            "Electronics",
            249.99,
            18,
        ),
        product(
            "Ergonomic Chair",
            "FU-OC-001",
            "Adjustable office chair with lumbar support",
            "Furniture",
            189.99,
            7,
        ),
        product(
            "Mechanical Keyboard",
            "EL-KB-003",
            "Mechanical gaming keyboard with RGB lighting",
            "Electronics",
            129.99,
            0,
        ),
        product(
            "Standing Desk",
            "FU-SD-002",
            "Adjustable height standing desk for home office",
            "Furniture",
            349.99,
            12,
        ),
        product(
            "Laptop Backpack",
            "AC-BP-001",
            "Waterproof laptop backpack with USB charging port",
            "Accessories",
            59.99,
            32,
        ),
        product(
            "Wireless Mouse",
            "EL-WM-004",
            "Ergonomic wireless mouse with adjustable DPI",
            "Electronics",
            39.99,
            8,
        ),
        product(
            "External SSD",
            "EL-SSD-005",
            "1TB portable external solid state drive",
            "Electronics",
            159.99,
            15,
        ),
    ]
}
