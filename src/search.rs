//! Cache-aside read paths for search and autocomplete.
//!
//! Both paths run the same state machine: compute a canonical key, consult
//! the cache, and on a miss translate the request, query the index, and
//! populate the cache before returning. The cache is advisory — a cache
//! fault degrades the path to always-miss, never to an error. An index
//! fault on the miss path propagates and is never cached; an empty result
//! list, by contrast, is a perfectly cacheable answer.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::error::CatalogError;
use crate::models::{Item, SearchQuery};
use crate::query;
use crate::store::{Cache, SearchIndex};

/// Canonical cache key for a search request.
///
/// Serializes the query as JSON: struct fields keep declaration order and
/// absent values appear explicitly as null, so two logically identical
/// queries always collide and present-vs-absent never aliases. The two
/// read paths use distinct key prefixes so they cannot collide in a shared
/// cache namespace.
pub fn search_cache_key(query: &SearchQuery) -> String {
    let encoded = serde_json::to_string(query).expect("SearchQuery serializes to JSON");
    format!("search:v1:{}", encoded)
}

/// Canonical cache key for an autocomplete fragment: the raw text.
pub fn autocomplete_cache_key(text: &str) -> String {
    format!("ac:v1:{}", text)
}

/// Search the catalog through the cache.
pub async fn search_items(
    cache: &dyn Cache,
    index: &dyn SearchIndex,
    query: &SearchQuery,
    ttl: Duration,
) -> Result<Vec<Item>, CatalogError> {
    let key = search_cache_key(query);

    if let Some(items) = cache_fetch::<Vec<Item>>(cache, &key).await {
        return Ok(items);
    }

    let plan = query::translate(query);
    let items = index.search(&plan).await.map_err(CatalogError::Search)?;

    cache_store(cache, &key, &items, ttl).await;
    Ok(items)
}

/// Autocomplete item names by prefix through the cache. Returns at most
/// five names, never full item records.
pub async fn autocomplete(
    cache: &dyn Cache,
    index: &dyn SearchIndex,
    text: &str,
    ttl: Duration,
) -> Result<Vec<String>, CatalogError> {
    let key = autocomplete_cache_key(text);

    if let Some(names) = cache_fetch::<Vec<String>>(cache, &key).await {
        return Ok(names);
    }

    let plan = query::autocomplete_plan(text);
    let names = index
        .autocomplete(&plan)
        .await
        .map_err(CatalogError::Search)?;

    cache_store(cache, &key, &names, ttl).await;
    Ok(names)
}

/// Cache lookup that absorbs faults. A read error or an undecodable entry
/// is reported on stderr and treated as a miss.
async fn cache_fetch<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    let raw = match cache.get(key).await {
        Ok(raw) => raw?,
        Err(e) => {
            eprintln!("cache read failed for {}: {:#}; treating as miss", key, e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            eprintln!("cache entry for {} undecodable: {}; treating as miss", key, e);
            None
        }
    }
}

/// Cache populate that absorbs faults. A write error is reported on stderr
/// and otherwise ignored.
async fn cache_store<T: Serialize>(cache: &dyn Cache, key: &str, value: &T, ttl: Duration) {
    let payload = match serde_json::to_string(value) {
        Ok(payload) => payload,
        Err(_) => return,
    };
    if let Err(e) = cache.set(key, &payload, ttl).await {
        eprintln!("cache write failed for {}: {:#}", key, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortField, SortOrder};
    use crate::store::memory::MemoryCache;

    #[test]
    fn test_equal_queries_share_a_key() {
        let query = SearchQuery {
            q: Some("laptop".to_string()),
            category: Some("Electronics".to_string()),
            min_price: Some(100.0),
            sort: Some(SortField::Price),
            order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(search_cache_key(&query), search_cache_key(&query.clone()));
    }

    #[test]
    fn test_absent_and_present_fields_never_alias() {
        let absent = SearchQuery::default();
        let empty = SearchQuery {
            q: Some(String::new()),
            ..Default::default()
        };
        assert_ne!(search_cache_key(&absent), search_cache_key(&empty));
    }

    #[test]
    fn test_same_value_in_different_fields_never_aliases() {
        let by_category = SearchQuery {
            category: Some("Berlin".to_string()),
            ..Default::default()
        };
        let by_location = SearchQuery {
            location: Some("Berlin".to_string()),
            ..Default::default()
        };
        assert_ne!(
            search_cache_key(&by_category),
            search_cache_key(&by_location)
        );
    }

    #[test]
    fn test_paths_use_distinct_namespaces() {
        let key = autocomplete_cache_key("laptop");
        assert!(key.starts_with("ac:"));
        assert!(!key.starts_with("search:"));
    }

    #[tokio::test]
    async fn test_undecodable_cache_entry_degrades_to_miss() {
        let cache = MemoryCache::new();
        let index = crate::store::memory::MemoryIndex::new();
        let query = SearchQuery::default();

        cache
            .set(
                &search_cache_key(&query),
                "not json",
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let items = search_items(&cache, &index, &query, Duration::from_secs(60))
            .await
            .unwrap();
        assert!(items.is_empty());
    }
}
