//! Collaborator abstractions: record store, search index, and cache layer.
//!
//! Each external store is modeled as a narrow capability trait so the core
//! never knows which concrete technology backs it. Implementations must be
//! `Send + Sync` to be shared across request handlers; all operations are
//! async (via `async-trait`) and each one is a single awaited round trip —
//! the core adds no locking and no deadlines of its own.
//!
//! | Trait | Backed by |
//! |-------|-----------|
//! | [`RecordStore`] | [`sqlite::SqliteRecordStore`], [`memory::MemoryRecordStore`] |
//! | [`SearchIndex`] | [`elastic::ElasticIndex`], [`memory::MemoryIndex`] |
//! | [`Cache`] | [`memory::MemoryCache`] |

pub mod elastic;
pub mod memory;
pub mod sqlite;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Item;
use crate::query::QueryPlan;

/// Durable, key-unique storage for item records (the system of record).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Look up an item by its exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Item>>;

    /// Persist an item, returning the stored row.
    async fn save(&self, item: &Item) -> Result<Item>;
}

/// Document index supporting structured boolean queries, prefix matching,
/// filtering, and field-based sorting.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Index an item document.
    async fn index_item(&self, item: &Item) -> Result<()>;

    /// Execute a query plan, returning matching items in plan order.
    async fn search(&self, plan: &QueryPlan) -> Result<Vec<Item>>;

    /// Execute a query plan with a name-only projection (autocomplete).
    async fn autocomplete(&self, plan: &QueryPlan) -> Result<Vec<String>>;
}

/// Key-value store with per-entry expiry.
///
/// The search gateway is the sole reader and writer; it treats this store
/// as advisory, so implementations may evict or fail freely — a failure
/// here must never become a caller-visible error.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}
