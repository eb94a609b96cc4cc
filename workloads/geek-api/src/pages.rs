//! Cached page data and revalidation.
//!
//! Page endpoints keep their JSON under `page:<path>` where `path` is the
//! storefront path the data renders (`/`, `/category/<id>`,
//! `/product/<id>`). Mutations revalidate by deleting those entries.

use std::collections::BTreeMap;

use chrono::Duration;
use geek_cache::{cache_key, Cache, CacheError};
use geek_catalog::{CategoryId, ProductId};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const HOME_PATH: &str = "/";

pub fn product_path(id: &ProductId) -> String {
    format!("/product/{id}")
}

pub fn category_path(id: &CategoryId) -> String {
    format!("/category/{id}")
}

#[derive(Clone)]
pub struct PageCache {
    cache: Cache,
    ttl: Duration,
}

impl PageCache {
    pub fn new(cache: Cache, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn cached<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, CacheError> {
        self.cache.get_fresh(&cache_key!("page", path))
    }

    pub fn store<T: Serialize>(&self, path: &str, data: &T) -> Result<(), CacheError> {
        self.cache
            .set_expiring(&cache_key!("page", path), data, self.ttl)?;
        Ok(())
    }

    /// Drop the cached data for `path`. Reports whether the store accepted
    /// the delete; a path with nothing cached counts as revalidated.
    pub fn revalidate(&self, path: &str) -> bool {
        self.cache.delete(&cache_key!("page", path)).is_ok()
    }

    /// Revalidate several paths, keyed by path in the result.
    pub fn revalidate_all<I>(&self, paths: I) -> BTreeMap<String, bool>
    where
        I: IntoIterator<Item = String>,
    {
        paths
            .into_iter()
            .map(|path| {
                let ok = self.revalidate(&path);
                (path, ok)
            })
            .collect()
    }
}

/// Outcome of revalidating the pages one entity appears on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Revalidated {
    pub home: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<bool>,
}

impl Revalidated {
    pub fn all_ok(&self) -> bool {
        self.home && self.product.unwrap_or(true) && self.category.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geek_cache::MemoryStore;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn pages() -> PageCache {
        PageCache::new(Cache::new(Arc::new(MemoryStore::new())), Duration::hours(1))
    }

    #[test]
    fn test_store_and_revalidate() {
        let pages = pages();
        pages.store(HOME_PATH, &json!({"categories": []})).unwrap();
        assert!(pages.cached::<Value>(HOME_PATH).unwrap().is_some());

        assert!(pages.revalidate(HOME_PATH));
        assert!(pages.cached::<Value>(HOME_PATH).unwrap().is_none());
        assert!(pages.revalidate(HOME_PATH));
    }

    #[test]
    fn test_expired_page_is_a_miss() {
        let pages = PageCache::new(
            Cache::new(Arc::new(MemoryStore::new())),
            Duration::seconds(-1),
        );
        pages.store("/category/1", &json!({})).unwrap();
        assert!(pages.cached::<Value>("/category/1").unwrap().is_none());
    }

    #[test]
    fn test_paths() {
        let id = ProductId::new("8f14e45f-ceea-467f-a0e6-9b1d2c3a4b5c");
        assert_eq!(product_path(&id), "/product/8f14e45f-ceea-467f-a0e6-9b1d2c3a4b5c");
        assert_eq!(category_path(&CategoryId::new("c1")), "/category/c1");
    }

    #[test]
    fn test_revalidate_all_keys_by_path() {
        let result = pages().revalidate_all(vec!["/".to_string(), "/category/c1".to_string()]);
        assert_eq!(result.len(), 2);
        assert!(result.values().all(|ok| *ok));
    }

    #[test]
    fn test_revalidated_serialization() {
        let revalidated = Revalidated {
            home: true,
            product: None,
            category: Some(false),
        };
        assert_eq!(
            serde_json::to_value(&revalidated).unwrap(),
            json!({"home": true, "category": false})
        );
        assert!(!revalidated.all_ok());
    }
}
