//! Key-value caching layer for the AluraGeek catalog.
//!
//! [`Cache`] adds JSON serialization and expiring entries on top of any
//! [`KvStore`]: the Spin key-value store inside the component, or
//! [`MemoryStore`] everywhere else.
//!
//! ```rust,ignore
//! use geek_cache::{cache_key, Cache, SpinStore};
//! use std::sync::Arc;
//!
//! let cache = Cache::new(Arc::new(SpinStore::open_default()?));
//! cache.set_expiring(&cache_key!("page", "/"), &home, chrono::Duration::hours(1))?;
//! ```

mod cache;
mod error;
mod store;

#[cfg(target_arch = "wasm32")]
mod spin;

pub use cache::Cache;
pub use error::CacheError;
pub use store::{KvStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use spin::SpinStore;

pub mod prelude {
    pub use crate::{cache_key, Cache, CacheError, KvStore};
}
