#![allow(dead_code)]

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use sift_core::{CustomFilter, CustomSort, FieldMap, Predicate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductCategory {
    Food,
    Electronics,
    Clothing,
    Furniture,
}

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

pub const CATEGORY_VARIANTS: &[&str] = &["Food", "Electronics", "Clothing", "Furniture"];

#[derive(Debug, Clone)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: ProductCategory,
    pub is_available: bool,
    pub created_at: NaiveDateTime,
    pub rating: Option<f64>,
    pub tags: Vec<String>,
}

fn product(
    id: i64,
    name: &str,
    price: f64,
    category: ProductCategory,
    is_available: bool,
    created: (i32, u32, u32),
    rating: Option<f64>,
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
            .expect("valid fixture date"),
        rating,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// The 8-product catalog used across the filtering and sorting tests.
pub fn catalog() -> Vec<Product> {
    use ProductCategory::*;
    vec![
        product(1, "Apple", 1.99, Food, true, (2024, 1, 5), Some(4.5), &["fruit", "fresh"]),
        product(2, "Laptop", 999.99, Electronics, true, (2024, 2, 10), Some(4.8), &["tech"]),
        product(3, "T-Shirt", 19.99, Clothing, false, (2024, 3, 15), None, &["apparel"]),
        product(4, "Desk", 120.00, Furniture, true, (2024, 4, 1), Some(4.0), &["office"]),
        product(5, "Banana", 0.99, Food, true, (2024, 5, 20), Some(4.2), &["fruit"]),
        product(6, "Headphones", 49.99, Electronics, true, (2024, 6, 30), Some(3.9), &["tech", "audio"]),
        product(7, "Jeans", 39.99, Clothing, true, (2024, 7, 4), None, &["apparel", "denim"]),
        product(8, "Orange", 2.49, Food, true, (2024, 8, 12), Some(4.6), &["fruit", "citrus"]),
    ]
}

/// The product field map. `IsAvailable` is deliberately left unmapped;
/// `Tags` is a synthetic key served by the `tag-filter` handler.
pub fn product_map() -> FieldMap<Product> {
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
        .date_time("CreatedAt", |p: &Product| p.created_at)
        .filterable()
        .sortable()
        .float_opt("Rating", |p: &Product| p.rating)
        .filterable()
        .sortable()
        .key("Tags")
        .custom_filter("tag-filter")
        .build()
        .expect("product field map is valid")
}

/// Matches products whose tag list contains the literal, ignoring the
/// operator the way the original example's tag filter does.
pub struct TagFilter;

impl CustomFilter<Product> for TagFilter {
    fn build_predicate(&self, _operator: &str, value: &str) -> Predicate<Product> {
        let needle = value.to_string();
        Box::new(move |p: &Product| p.tags.iter().any(|tag| tag.contains(&needle)))
    }
}

/// Orders by name, whatever key it is registered under.
pub struct NameSort;

impl CustomSort<Product> for NameSort {
    fn compare(&self, left: &Product, right: &Product) -> std::cmp::Ordering {
        left.name.cmp(&right.name)
    }
}

pub fn names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}
