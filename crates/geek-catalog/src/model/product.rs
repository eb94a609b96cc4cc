//! Catalog products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CategoryId, ProductId};
use crate::price::Price;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    /// Public URL of the hosted image.
    pub image_url: String,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        price: Price,
        description: impl Into<String>,
        image_url: impl Into<String>,
        category_id: CategoryId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ProductId::generate(),
            name: name.into(),
            price,
            description: description.into(),
            image_url: image_url.into(),
            category_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a set of changes, returning the product as it will be stored.
    ///
    /// `updated_at` moves even when `changes` is empty.
    pub fn with_changes(&self, changes: ProductChanges, now: DateTime<Utc>) -> Product {
        let mut next = self.clone();
        if let Some(name) = changes.name {
            next.name = name;
        }
        if let Some(price) = changes.price {
            next.price = price;
        }
        if let Some(description) = changes.description {
            next.description = description;
        }
        if let Some(image_url) = changes.image_url {
            next.image_url = image_url;
        }
        if let Some(category_id) = changes.category_id {
            next.category_id = category_id;
        }
        next.updated_at = now;
        next
    }
}

/// Resolved field changes for an existing product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
}
