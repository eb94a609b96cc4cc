//! Starter catalog data.
//!
//! Seeds describe categories by name with their products nested below.
//! They can be applied to a live store or rendered as a SQL script for
//! `spin up --sqlite @seed.sql`.

use chrono::{DateTime, Duration, Utc};
use geek_db::Value;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::model::{Category, Product};
use crate::price::Price;
use crate::store::{
    category_params, product_params, CatalogStore, INSERT_CATEGORY, INSERT_PRODUCT,
};

const LOREM: &str = "Lorem ipsum dolor sit amet consectetur adipisicing elit. In ex quos soluta \
culpa minima sint dignissimos dicta, pariatur sed deleniti saepe quod earum assumenda architecto \
officiis, voluptates laborum voluptas molestias.";

const IMAGE_BASE: &str = "https://res.cloudinary.com/alura-geek/image/upload/v1/alura-geek";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCatalog {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    /// Decimal reais.
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub image_url: String,
}

/// Records ready to be inserted, categories first.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRecords {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

impl SeedCatalog {
    /// The storefront's starter catalog.
    pub fn builtin() -> Self {
        let category = |name: &str, products: &[(&str, f64, &str)]| SeedCategory {
            name: name.to_string(),
            products: products
                .iter()
                .map(|(name, price, image)| SeedProduct {
                    name: name.to_string(),
                    price: *price,
                    description: None,
                    image_url: format!("{IMAGE_BASE}/{image}.png"),
                })
                .collect(),
        };

        Self {
            categories: vec![
                category(
                    "Star Wars",
                    &[
                        ("Caneca Darth Vader", 59.9, "caneca-darth-vader"),
                        ("Action figure Boba Fett", 199.9, "boba-fett"),
                        ("Sabre de luz Jedi", 249.9, "sabre-de-luz"),
                        ("Camiseta Stormtrooper", 79.9, "camiseta-stormtrooper"),
                        ("Chaveiro Millennium Falcon", 24.9, "chaveiro-falcon"),
                        ("Luminária Estrela da Morte", 149.9, "luminaria-estrela-da-morte"),
                    ],
                ),
                category(
                    "Consoles",
                    &[
                        ("Xbox Series S", 3499.0, "xbox-series-s"),
                        ("PlayStation 5", 4499.0, "playstation-5"),
                        ("Nintendo Switch", 2299.0, "nintendo-switch"),
                        ("Controle Xbox sem fio", 449.9, "controle-xbox"),
                        ("Controle DualSense", 499.9, "controle-dualsense"),
                        ("Mega Drive Mini", 599.9, "mega-drive-mini"),
                    ],
                ),
                category(
                    "Diversos",
                    &[
                        ("Caneca Mario Bros", 49.9, "caneca-mario"),
                        ("Pelúcia Pikachu", 89.9, "pelucia-pikachu"),
                        ("Cubo mágico", 29.9, "cubo-magico"),
                        ("Mousepad gamer", 69.9, "mousepad-gamer"),
                        ("Boné Zelda", 59.9, "bone-zelda"),
                        ("Quadro retrô 8 bits", 119.9, "quadro-8-bits"),
                    ],
                ),
            ],
        }
    }

    /// Turn the seed into records.
    ///
    /// Names must be unique and prices positive. Timestamps step one
    /// millisecond per record from `now`, so listings keep seed order
    /// reversed (the last product is the most recent).
    pub fn into_records(self, now: DateTime<Utc>) -> Result<SeedRecords, CatalogError> {
        let mut categories = Vec::with_capacity(self.categories.len());
        let mut products = Vec::new();
        let mut tick = 0_i64;
        let mut next_time = || {
            tick += 1;
            now + Duration::milliseconds(tick)
        };

        for seed in self.categories {
            let name = seed.name.trim().to_string();
            if categories.iter().any(|c: &Category| c.name == name) {
                return Err(CatalogError::DuplicateCategory(name));
            }
            let category = Category::new(name, next_time());

            for item in seed.products {
                let name = item.name.trim().to_string();
                if products.iter().any(|p: &Product| p.name == name) {
                    return Err(CatalogError::DuplicateProduct(name));
                }
                let price = Price::from_decimal(item.price).ok_or_else(|| {
                    CatalogError::CorruptRecord(format!("{name}: invalid price {}", item.price))
                })?;
                products.push(Product::new(
                    name,
                    price,
                    item.description.unwrap_or_else(|| LOREM.to_string()),
                    item.image_url,
                    category.id.clone(),
                    next_time(),
                ));
            }
            categories.push(category);
        }

        Ok(SeedRecords {
            categories,
            products,
        })
    }
}

impl SeedRecords {
    /// Render the records as `INSERT` statements.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();
        for category in &self.categories {
            sql.push_str(&render(INSERT_CATEGORY, &category_params(category)));
        }
        for product in &self.products {
            sql.push_str(&render(INSERT_PRODUCT, &product_params(product)));
        }
        sql
    }
}

/// Substitute literals for the `?` placeholders of a statement.
fn render(statement: &str, params: &[Value]) -> String {
    let mut values = params.iter().peekable();
    let mut out = String::with_capacity(statement.len() + 64);
    for ch in statement.chars() {
        match (ch, values.peek()) {
            ('?', Some(value)) => {
                out.push_str(&value.to_sql_literal());
                values.next();
            }
            _ => out.push(ch),
        }
    }
    out.push_str(";\n");
    out
}

impl CatalogStore {
    /// Insert seed records. Fails on the first conflicting name.
    pub async fn seed(&self, records: &SeedRecords) -> Result<(), CatalogError> {
        for category in &records.categories {
            self.insert_category(category).await?;
        }
        for product in &records.products {
            self.insert_product(product).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geek_db::SqliteDb;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn test_builtin_records() {
        let records = SeedCatalog::builtin().into_records(now()).unwrap();
        let names: Vec<&str> = records.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Star Wars", "Consoles", "Diversos"]);
        assert_eq!(records.products.len(), 18);
        assert!(records.products.iter().all(|p| p.description.starts_with("Lorem ipsum")));
    }

    #[test]
    fn test_duplicate_product_rejected() {
        let seed = SeedCatalog {
            categories: vec![SeedCategory {
                name: "Diversos".into(),
                products: vec![
                    SeedProduct {
                        name: "Cubo".into(),
                        price: 1.0,
                        description: None,
                        image_url: "u".into(),
                    };
                    2
                ],
            }],
        };
        assert!(matches!(
            seed.into_records(now()),
            Err(CatalogError::DuplicateProduct(_))
        ));
    }

    #[test]
    fn test_invalid_price_rejected() {
        let seed = SeedCatalog {
            categories: vec![SeedCategory {
                name: "Diversos".into(),
                products: vec![SeedProduct {
                    name: "Grátis".into(),
                    price: 0.0,
                    description: None,
                    image_url: "u".into(),
                }],
            }],
        };
        assert!(seed.into_records(now()).is_err());
    }

    #[test]
    fn test_render_sql() {
        let rendered = render(
            "INSERT INTO t (a, b) VALUES (?, ?)",
            &[Value::from("D'Artagnan"), Value::Integer(3)],
        );
        assert_eq!(rendered, "INSERT INTO t (a, b) VALUES ('D''Artagnan', 3);\n");
    }

    #[test]
    fn test_to_sql_statement_count() {
        let records = SeedCatalog::builtin().into_records(now()).unwrap();
        let sql = records.to_sql();
        assert_eq!(sql.matches("INSERT INTO categories").count(), 3);
        assert_eq!(sql.matches("INSERT INTO products").count(), 18);
        assert!(!sql.contains('?'));
    }

    #[tokio::test]
    async fn test_seed_store() {
        let store = CatalogStore::new(SqliteDb::in_memory().await.unwrap());
        store.migrate().await.unwrap();
        let records = SeedCatalog::builtin().into_records(now()).unwrap();
        store.seed(&records).await.unwrap();

        let listed = store.list_categories_with_products().await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed.iter().all(|c| c.products.len() == 6));
        assert_eq!(listed[2].products[0].name, "Quadro retrô 8 bits");
    }
}
