//! Catalog persistence over any [`Executor`].

mod rows;
mod schema;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use geek_db::{params, DbError, Executor, Value};

use crate::error::CatalogError;
use crate::ids::{CategoryId, ProductId};
use crate::model::{Category, CategoryWithProducts, Product};
use crate::search::{ProductQuery, PRODUCT_COLUMNS};
use rows::{CategoryRow, ProductRow};

pub use schema::SCHEMA;
pub(crate) use rows::{category_params, product_params, INSERT_CATEGORY, INSERT_PRODUCT};

const CATEGORY_COLUMNS: &str = "id, name, created_at, updated_at";

/// Reads and writes catalog records.
pub struct CatalogStore {
    db: Box<dyn Executor>,
}

impl CatalogStore {
    pub fn new(db: impl Executor + 'static) -> Self {
        Self { db: Box::new(db) }
    }

    /// Create missing tables and indexes.
    pub async fn migrate(&self) -> Result<(), CatalogError> {
        self.db.execute_batch(SCHEMA).await?;
        Ok(())
    }

    // Products

    pub async fn find_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        let (sql, values) = query.build_sql();
        let params: Vec<Value> = values.into_iter().map(Value::from).collect();
        self.query_products(&sql, &params).await
    }

    /// Every product, most recently changed first.
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.find_products(&ProductQuery::new()).await
    }

    /// Products whose name or category name contains `text`.
    pub async fn search_products(&self, text: &str) -> Result<Vec<Product>, CatalogError> {
        self.find_products(&ProductQuery::new().with_text(text)).await
    }

    pub async fn products_in_category(&self, id: &CategoryId) -> Result<Vec<Product>, CatalogError> {
        self.find_products(&ProductQuery::new().in_category(id.clone()))
            .await
    }

    pub async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = ? LIMIT 1"
        );
        Ok(self.query_products(&sql, params![id]).await?.into_iter().next())
    }

    pub async fn require_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.get_product(id)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))
    }

    pub async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, CatalogError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.name = ? LIMIT 1"
        );
        Ok(self.query_products(&sql, params![name]).await?.into_iter().next())
    }

    pub async fn insert_product(&self, product: &Product) -> Result<(), CatalogError> {
        self.db
            .execute(INSERT_PRODUCT, &product_params(product))
            .await
            .map_err(|e| product_write_error(e, product))?;
        Ok(())
    }

    /// Overwrite every column of an existing product.
    pub async fn update_product(&self, product: &Product) -> Result<(), CatalogError> {
        let changed = self
            .db
            .execute(
                "UPDATE products SET name = ?, price_cents = ?, description = ?, image_url = ?, \
                 category_id = ?, updated_at = ? WHERE id = ?",
                params![
                    product.name.as_str(),
                    product.price.cents(),
                    product.description.as_str(),
                    product.image_url.as_str(),
                    &product.category_id,
                    product.updated_at.timestamp_millis(),
                    &product.id,
                ],
            )
            .await
            .map_err(|e| product_write_error(e, product))?;
        if changed == 0 {
            return Err(CatalogError::ProductNotFound(product.id.to_string()));
        }
        Ok(())
    }

    /// Delete a product and return it as it was.
    pub async fn delete_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let product = self.require_product(id).await?;
        let deleted = self
            .db
            .execute("DELETE FROM products WHERE id = ?", params![id])
            .await?;
        if deleted == 0 {
            return Err(CatalogError::ProductNotFound(id.to_string()));
        }
        Ok(product)
    }

    /// Delete products in one statement, so either all of them go or none do.
    pub async fn delete_products(&self, ids: &[ProductId]) -> Result<u64, CatalogError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("DELETE FROM products WHERE id IN ({placeholders})");
        let params: Vec<Value> = ids.iter().map(Value::from).collect();
        Ok(self.db.execute(&sql, &params).await?)
    }

    /// Reassign products to a category in one statement.
    pub async fn move_products(
        &self,
        ids: &[ProductId],
        category_id: &CategoryId,
        now: DateTime<Utc>,
    ) -> Result<u64, CatalogError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "UPDATE products SET category_id = ?, updated_at = ? WHERE id IN ({placeholders})"
        );
        let mut params = vec![Value::from(category_id), Value::from(now.timestamp_millis())];
        params.extend(ids.iter().map(Value::from));

        self.db.execute(&sql, &params).await.map_err(|e| {
            if e.is_constraint_violation() {
                CatalogError::CategoryNotFound(category_id.to_string())
            } else {
                CatalogError::Database(e)
            }
        })
    }

    // Categories

    /// Every category in creation order.
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at, rowid");
        self.query_categories(&sql, &[]).await
    }

    /// Every category with its products, in two queries.
    pub async fn list_categories_with_products(
        &self,
    ) -> Result<Vec<CategoryWithProducts>, CatalogError> {
        let categories = self.list_categories().await?;
        let mut by_category: HashMap<CategoryId, Vec<Product>> = HashMap::new();
        for product in self.list_products().await? {
            by_category
                .entry(product.category_id.clone())
                .or_default()
                .push(product);
        }
        Ok(categories
            .into_iter()
            .map(|category| CategoryWithProducts {
                products: by_category.remove(&category.id).unwrap_or_default(),
                category,
            })
            .collect())
    }

    pub async fn get_category(&self, id: &CategoryId) -> Result<Option<Category>, CatalogError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ? LIMIT 1");
        Ok(self.query_categories(&sql, params![id]).await?.into_iter().next())
    }

    pub async fn require_category(&self, id: &CategoryId) -> Result<Category, CatalogError> {
        self.get_category(id)
            .await?
            .ok_or_else(|| CatalogError::CategoryNotFound(id.to_string()))
    }

    pub async fn get_category_with_products(
        &self,
        id: &CategoryId,
    ) -> Result<Option<CategoryWithProducts>, CatalogError> {
        let Some(category) = self.get_category(id).await? else {
            return Ok(None);
        };
        let products = self.products_in_category(id).await?;
        Ok(Some(CategoryWithProducts { category, products }))
    }

    pub async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, CatalogError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE name = ? LIMIT 1");
        Ok(self.query_categories(&sql, params![name]).await?.into_iter().next())
    }

    pub async fn insert_category(&self, category: &Category) -> Result<(), CatalogError> {
        self.db
            .execute(INSERT_CATEGORY, &category_params(category))
            .await
            .map_err(|e| category_write_error(e, category))?;
        Ok(())
    }

    pub async fn update_category(&self, category: &Category) -> Result<(), CatalogError> {
        let changed = self
            .db
            .execute(
                "UPDATE categories SET name = ?, updated_at = ? WHERE id = ?",
                params![
                    category.name.as_str(),
                    category.updated_at.timestamp_millis(),
                    &category.id,
                ],
            )
            .await
            .map_err(|e| category_write_error(e, category))?;
        if changed == 0 {
            return Err(CatalogError::CategoryNotFound(category.id.to_string()));
        }
        Ok(())
    }

    /// Delete an empty category and return it as it was.
    pub async fn delete_category(&self, id: &CategoryId) -> Result<Category, CatalogError> {
        let category = self.require_category(id).await?;
        let products = self.count_products_in_category(id).await?;
        if products > 0 {
            return Err(CatalogError::CategoryInUse {
                id: id.to_string(),
                products,
            });
        }
        self.db
            .execute("DELETE FROM categories WHERE id = ?", params![id])
            .await
            .map_err(|e| {
                // A product may have been added since the count.
                if e.is_constraint_violation() {
                    CatalogError::CategoryInUse {
                        id: id.to_string(),
                        products: 1,
                    }
                } else {
                    CatalogError::Database(e)
                }
            })?;
        Ok(category)
    }

    pub async fn count_products_in_category(&self, id: &CategoryId) -> Result<i64, CatalogError> {
        let result = self
            .db
            .query(
                "SELECT COUNT(*) AS total FROM products WHERE category_id = ?",
                params![id],
            )
            .await?;
        Ok(result
            .first()
            .and_then(|row| row.get("total"))
            .and_then(Value::as_integer)
            .unwrap_or(0))
    }

    async fn query_products(&self, sql: &str, params: &[Value]) -> Result<Vec<Product>, CatalogError> {
        let rows: Vec<ProductRow> = self.db.query(sql, params).await?.deserialize_all()?;
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn query_categories(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<Category>, CatalogError> {
        let rows: Vec<CategoryRow> = self.db.query(sql, params).await?.deserialize_all()?;
        rows.into_iter().map(Category::try_from).collect()
    }
}

fn product_write_error(e: DbError, product: &Product) -> CatalogError {
    match &e {
        DbError::ConstraintViolation(message) if message.contains("products.name") => {
            CatalogError::DuplicateProduct(product.name.clone())
        }
        DbError::ConstraintViolation(message) if message.contains("FOREIGN KEY") => {
            CatalogError::CategoryNotFound(product.category_id.to_string())
        }
        _ => CatalogError::Database(e),
    }
}

fn category_write_error(e: DbError, category: &Category) -> CatalogError {
    match &e {
        DbError::ConstraintViolation(message) if message.contains("categories.name") => {
            CatalogError::DuplicateCategory(category.name.clone())
        }
        _ => CatalogError::Database(e),
    }
}
