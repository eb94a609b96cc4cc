//! Typed JSON cache over a [`KvStore`].

use crate::{CacheError, KvStore};
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

/// Cache with automatic JSON serialization.
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KvStore>,
}

/// Envelope written by [`Cache::set_expiring`].
#[derive(Debug, Serialize, Deserialize)]
struct Expiring<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

impl Cache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Get a value, `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes)
    }

    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// All keys starting with `prefix`.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        Ok(self
            .store
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }

    /// Store a value that [`get_fresh`](Self::get_fresh) stops returning
    /// once `ttl` has elapsed.
    pub fn set_expiring<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<DateTime<Utc>, CacheError> {
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or(CacheError::ExpiryOutOfRange(ttl.num_seconds()))?;
        self.set(key, &Expiring { value, expires_at })?;
        Ok(expires_at)
    }

    /// Read a value written by [`set_expiring`](Self::set_expiring).
    ///
    /// Expired entries are deleted and reported as absent.
    pub fn get_fresh<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let Some(entry) = self.get::<Expiring<T>>(key)? else {
            return Ok(None);
        };
        if entry.expires_at <= Utc::now() {
            self.delete(key)?;
            return Ok(None);
        }
        Ok(Some(entry.value))
    }
}

/// Build a namespaced cache key.
///
/// ```rust,ignore
/// let key = cache_key!("page", "/category/42");
/// assert_eq!(key, "page:/category/42");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
