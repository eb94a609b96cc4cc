//! Catalog records.

mod category;
mod product;

pub use category::{Category, CategoryWithProducts};
pub use product::{Product, ProductChanges};
