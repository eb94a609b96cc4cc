//! Product search and listing queries.

mod filter;
mod query;

pub use filter::{escape_like, Filter};
pub use query::ProductQuery;

pub(crate) use query::PRODUCT_COLUMNS;
