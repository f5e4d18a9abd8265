use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sift_core::{CustomFilter, CustomHandlers, FieldMap, Predicate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProductCategory {
    Food,
    Electronics,
    Clothing,
    Furniture,
}

pub const CATEGORY_VARIANTS: &[&str] = &["Food", "Electronics", "Clothing", "Furniture"];

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductCategory::Food => write!(f, "Food"),
            ProductCategory::Electronics => write!(f, "Electronics"),
            ProductCategory::Clothing => write!(f, "Clothing"),
            ProductCategory::Furniture => write!(f, "Furniture"),
        }
    }
}

impl FromStr for ProductCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(ProductCategory::Food),
            "electronics" => Ok(ProductCategory::Electronics),
            "clothing" => Ok(ProductCategory::Clothing),
            "furniture" => Ok(ProductCategory::Furniture),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: ProductCategory,
    pub is_available: bool,
    pub created_at: NaiveDateTime,
    pub tags: Vec<String>,
}

fn product(
    id: i64,
    name: &str,
    price: f64,
    category: ProductCategory,
    is_available: bool,
    created: (i32, u32, u32),
    tags: &[&str],
) -> Product {
    let (y, m, d) = created;
    Product {
        id,
        name: name.to_string(),
        price,
        category,
        is_available,
        created_at: NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid demo date"),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// The built-in demo catalog.
pub fn products() -> Vec<Product> {
    use ProductCategory::*;
    vec![
        product(1, "Apple", 1.99, Food, true, (2024, 1, 5), &["fruit", "fresh"]),
        product(2, "Laptop", 999.99, Electronics, true, (2024, 2, 10), &["tech"]),
        product(3, "T-Shirt", 19.99, Clothing, false, (2024, 3, 15), &["apparel"]),
        product(4, "Desk", 120.00, Furniture, true, (2024, 4, 1), &["office"]),
        product(5, "Banana", 0.99, Food, true, (2024, 5, 20), &["fruit"]),
        product(6, "Headphones", 49.99, Electronics, true, (2024, 6, 30), &["tech", "audio"]),
        product(7, "Jeans", 39.99, Clothing, true, (2024, 7, 4), &["apparel", "denim"]),
        product(8, "Orange", 2.49, Food, true, (2024, 8, 12), &["fruit", "citrus"]),
    ]
}

/// Which product fields queries may touch, and how.
pub fn field_map() -> FieldMap<Product> {
    FieldMap::builder()
        .integer("Id", |p: &Product| p.id)
        .filterable()
        .sortable()
        .text("Name", |p: &Product| p.name.clone())
        .filterable()
        .sortable()
        .decimal("Price", |p: &Product| p.price)
        .filterable()
        .sortable()
        .enumeration("Category", CATEGORY_VARIANTS, |p: &Product| {
            p.category.to_string()
        })
        .filterable()
        .sortable()
        .boolean("IsAvailable", |p: &Product| p.is_available)
        .filterable()
        .sortable()
        .date_time("CreatedAt", |p: &Product| p.created_at)
        .filterable()
        .sortable()
        .key("Tags")
        .custom_filter("tag-filter")
        .build()
        .expect("demo field map is valid")
}

/// Tag filtering sidesteps the built-in operator semantics: a product
/// matches when any of its tags contains the literal.
struct TagFilter;

impl CustomFilter<Product> for TagFilter {
    fn build_predicate(&self, _operator: &str, value: &str) -> Predicate<Product> {
        let needle = value.to_string();
        Box::new(move |p: &Product| p.tags.iter().any(|tag| tag.contains(&needle)))
    }
}

pub fn handlers() -> CustomHandlers<Product> {
    CustomHandlers::new().with_filter("tag-filter", TagFilter)
}
