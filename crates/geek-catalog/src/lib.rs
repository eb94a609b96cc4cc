//! Catalog domain for the AluraGeek storefront.
//!
//! - **Model**: [`Category`], [`Product`] and their [`Price`] in reais
//! - **Validation**: request body gates and typed admin requests
//! - **Search**: the [`ProductQuery`] builder behind listings and search
//! - **Store**: [`CatalogStore`], SQL persistence over any `geek_db::Executor`
//! - **Seed**: the starter catalog
//!
//! # Example
//!
//! ```rust,ignore
//! use geek_catalog::prelude::*;
//!
//! let store = CatalogStore::new(db);
//! let consoles = store.find_category_by_name("Consoles").await?;
//! let results = store.search_products("caneca").await?;
//! ```

pub mod error;
pub mod ids;
pub mod model;
pub mod price;
pub mod search;
pub mod seed;
pub mod store;
pub mod validation;

pub use error::CatalogError;
pub use ids::{CategoryId, ProductId};
pub use model::{Category, CategoryWithProducts, Product, ProductChanges};
pub use price::Price;
pub use search::{Filter, ProductQuery};
pub use seed::{SeedCatalog, SeedRecords};
pub use store::{CatalogStore, SCHEMA};

pub mod prelude {
    pub use crate::error::CatalogError;
    pub use crate::ids::{CategoryId, ProductId};
    pub use crate::model::{Category, CategoryWithProducts, Product, ProductChanges};
    pub use crate::price::Price;
    pub use crate::search::ProductQuery;
    pub use crate::store::CatalogStore;
    pub use crate::validation::{
        CategoryCreate, CategoryUpdate, ProductCreate, ProductMove, ProductRemoval, ProductUpdate,
        ValidationError,
    };
}
