//! Categories group products on the storefront.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::CategoryId;
use crate::model::Product;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: CategoryId::generate(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, name: impl Into<String>, now: DateTime<Utc>) {
        self.name = name.into();
        self.updated_at = now;
    }
}

/// A category together with its products, newest change first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithProducts {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
}

impl CategoryWithProducts {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let now = Utc::now();
        let category = Category::new("Consoles", now);
        let json = serde_json::to_value(CategoryWithProducts {
            category: category.clone(),
            products: vec![],
        })
        .unwrap();

        assert_eq!(json["id"], category.id.as_str());
        assert_eq!(json["name"], "Consoles");
        assert!(json["createdAt"].is_string());
        assert_eq!(json["products"], serde_json::json!([]));
    }

    #[test]
    fn test_rename_touches_updated_at() {
        let created = DateTime::from_timestamp_millis(1_000).unwrap();
        let later = DateTime::from_timestamp_millis(2_000).unwrap();
        let mut category = Category::new("Diversos", created);
        category.rename("Colecionáveis", later);
        assert_eq!(category.name, "Colecionáveis");
        assert_eq!(category.created_at, created);
        assert_eq!(category.updated_at, later);
    }
}
