//! The [`Catalog`] façade: one object wiring the record store, search
//! index, and cache behind the three public operations.
//!
//! All collaborators are held as `Arc` trait objects, so any backend
//! combination (SQLite + Elasticsearch in production, in-memory everywhere
//! in tests) plugs in without the core knowing which.

use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;
use crate::create;
use crate::error::CatalogError;
use crate::models::{Item, NewItem, SearchQuery};
use crate::search;
use crate::store::{Cache, RecordStore, SearchIndex};

pub struct Catalog {
    record: Arc<dyn RecordStore>,
    index: Arc<dyn SearchIndex>,
    cache: Arc<dyn Cache>,
    search_ttl: Duration,
    autocomplete_ttl: Duration,
}

impl Catalog {
    pub fn new(
        record: Arc<dyn RecordStore>,
        index: Arc<dyn SearchIndex>,
        cache: Arc<dyn Cache>,
        ttls: &CacheConfig,
    ) -> Self {
        Self {
            record,
            index,
            cache,
            search_ttl: ttls.search_ttl(),
            autocomplete_ttl: ttls.autocomplete_ttl(),
        }
    }

    /// Create an item across both stores (index-first).
    pub async fn create_item(&self, candidate: NewItem) -> Result<Item, CatalogError> {
        create::create_item(self.record.as_ref(), self.index.as_ref(), candidate).await
    }

    /// Search the catalog through the cache.
    pub async fn search_items(&self, query: &SearchQuery) -> Result<Vec<Item>, CatalogError> {
        search::search_items(
            self.cache.as_ref(),
            self.index.as_ref(),
            query,
            self.search_ttl,
        )
        .await
    }

    /// Autocomplete item names by prefix; at most five suggestions.
    pub async fn autocomplete(&self, text: &str) -> Result<Vec<String>, CatalogError> {
        search::autocomplete(
            self.cache.as_ref(),
            self.index.as_ref(),
            text,
            self.autocomplete_ttl,
        )
        .await
    }
}
