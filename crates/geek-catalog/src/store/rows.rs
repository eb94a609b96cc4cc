//! Row shapes as stored, and their conversion to records.

use chrono::{DateTime, Utc};
use geek_db::Value;
use serde::Deserialize;

use crate::error::CatalogError;
use crate::ids::{CategoryId, ProductId};
use crate::model::{Category, Product};
use crate::price::Price;

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryRow {
    id: String,
    name: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<CategoryRow> for Category {
    type Error = CatalogError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Category {
            created_at: timestamp(row.created_at, &row.id)?,
            updated_at: timestamp(row.updated_at, &row.id)?,
            id: CategoryId::new(row.id),
            name: row.name,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductRow {
    id: String,
    name: String,
    price_cents: i64,
    description: String,
    image_url: String,
    category_id: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = CatalogError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            created_at: timestamp(row.created_at, &row.id)?,
            updated_at: timestamp(row.updated_at, &row.id)?,
            id: ProductId::new(row.id),
            name: row.name,
            price: Price::from_cents(row.price_cents),
            description: row.description,
            image_url: row.image_url,
            category_id: CategoryId::new(row.category_id),
        })
    }
}

fn timestamp(millis: i64, id: &str) -> Result<DateTime<Utc>, CatalogError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| CatalogError::CorruptRecord(format!("{id}: timestamp {millis} out of range")))
}

/// Parameters in `categories` column order.
pub(crate) fn category_params(category: &Category) -> Vec<Value> {
    vec![
        Value::from(&category.id),
        Value::from(category.name.as_str()),
        Value::from(category.created_at.timestamp_millis()),
        Value::from(category.updated_at.timestamp_millis()),
    ]
}

/// Parameters in `products` column order.
pub(crate) fn product_params(product: &Product) -> Vec<Value> {
    vec![
        Value::from(&product.id),
        Value::from(product.name.as_str()),
        Value::from(product.price.cents()),
        Value::from(product.description.as_str()),
        Value::from(product.image_url.as_str()),
        Value::from(&product.category_id),
        Value::from(product.created_at.timestamp_millis()),
        Value::from(product.updated_at.timestamp_millis()),
    ]
}

pub(crate) const INSERT_CATEGORY: &str =
    "INSERT INTO categories (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)";

pub(crate) const INSERT_PRODUCT: &str = "INSERT INTO products \
     (id, name, price_cents, description, image_url, category_id, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row_conversion() {
        let row = ProductRow {
            id: "p1".into(),
            name: "Caneca".into(),
            price_cents: 2990,
            description: "Cerâmica".into(),
            image_url: "https://img".into(),
            category_id: "c1".into(),
            created_at: 1_000,
            updated_at: 2_000,
        };
        let product = Product::try_from(row).unwrap();
        assert_eq!(product.price.cents(), 2990);
        assert_eq!(product.updated_at.timestamp_millis(), 2_000);
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let row = CategoryRow {
            id: "c1".into(),
            name: "Consoles".into(),
            created_at: i64::MAX,
            updated_at: 0,
        };
        assert!(matches!(
            Category::try_from(row),
            Err(CatalogError::CorruptRecord(_))
        ));
    }

    #[test]
    fn test_params_follow_column_order() {
        let now = DateTime::from_timestamp_millis(42).unwrap();
        let category = Category::new("Diversos", now);
        let params = category_params(&category);
        assert_eq!(params[1], Value::from("Diversos"));
        assert_eq!(params[3], Value::Integer(42));
    }
}
