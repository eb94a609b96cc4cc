//! Catalog error types.

use geek_db::DbError;
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("A product named {0:?} already exists")]
    DuplicateProduct(String),

    #[error("A category named {0:?} already exists")]
    DuplicateCategory(String),

    /// The category still owns products and cannot be removed.
    #[error("Category {id} still has {products} product(s)")]
    CategoryInUse { id: String, products: i64 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A stored row could not be turned back into a record.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::ProductNotFound(_) | CatalogError::CategoryNotFound(_)
        )
    }
}
