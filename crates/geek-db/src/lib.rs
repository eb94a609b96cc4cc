//! SQLite access layer for the AluraGeek catalog.
//!
//! Inside the Spin component statements go through the host SQLite
//! interface ([`SpinDb`]); on native targets the same [`Executor`] trait is
//! implemented on top of sqlx ([`SqliteDb`]), which is what the test suites
//! and the local tooling run against.
//!
//! # Example
//!
//! ```rust,ignore
//! use geek_db::{params, Executor};
//!
//! let db = geek_db::SpinDb::open_default()?;
//! db.execute(
//!     "UPDATE products SET price_cents = ? WHERE id = ?",
//!     params![19990, product_id.as_str()],
//! )
//! .await?;
//! ```

mod error;
mod executor;
mod types;

#[cfg(target_arch = "wasm32")]
mod spin;
#[cfg(not(target_arch = "wasm32"))]
mod sqlite;

pub use error::DbError;
pub use executor::{split_statements, Executor};
pub use types::{QueryResult, Row, Value};

#[cfg(target_arch = "wasm32")]
pub use spin::SpinDb;
#[cfg(not(target_arch = "wasm32"))]
pub use sqlite::SqliteDb;

/// Enables `REFERENCES` enforcement on a connection.
pub const FOREIGN_KEYS_ON: &str = "PRAGMA foreign_keys = ON";

pub mod prelude {
    pub use crate::{params, DbError, Executor, QueryResult, Row, Value};
}

/// Create a parameter list for SQL statements.
///
/// ```rust,ignore
/// let params = params!["Xbox Series S", 349900_i64];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        &[]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}
