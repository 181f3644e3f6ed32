//! Write coordination across the record store and the search index.
//!
//! A create is a three-step sequence: duplicate lookup, index write,
//! record write. The index write gates the record write — of the two
//! possible partial-failure states, an orphan index document is the
//! acceptable one. It can be reconciled from the record store later;
//! a persisted record that search cannot see cannot be recovered from
//! the index side at all.
//!
//! No cross-store lock or transaction wraps the sequence. Two concurrent
//! creates of the same name can both pass the lookup; the record store's
//! own uniqueness enforcement (where present) is the backstop.

use chrono::Utc;
use uuid::Uuid;

use crate::error::CatalogError;
use crate::models::{Item, NewItem};
use crate::store::{RecordStore, SearchIndex};

/// Create an item across both stores.
///
/// Fails with [`CatalogError::Conflict`] when the name is taken (nothing
/// mutated), [`CatalogError::Indexing`] when the index write fails (nothing
/// mutated), and [`CatalogError::Persistence`] when the record write fails
/// after a successful index write (orphan index document left behind).
pub async fn create_item(
    record: &dyn RecordStore,
    index: &dyn SearchIndex,
    candidate: NewItem,
) -> Result<Item, CatalogError> {
    let existing = record
        .find_by_name(&candidate.name)
        .await
        .map_err(|e| CatalogError::Persistence(e.context("looking up item by name")))?;

    if existing.is_some() {
        return Err(CatalogError::Conflict {
            name: candidate.name,
        });
    }

    let now = Utc::now();
    let item = Item {
        id: Uuid::new_v4().to_string(),
        name: candidate.name,
        description: candidate.description,
        price: candidate.price,
        stock: candidate.stock,
        category: candidate.category,
        subcategory: candidate.subcategory,
        location: candidate.location,
        created_at: now,
        updated_at: now,
    };

    // Index first; a failure here must leave the record store untouched.
    index
        .index_item(&item)
        .await
        .map_err(|e| CatalogError::Indexing(e.context("indexing new item")))?;

    let saved = record
        .save(&item)
        .await
        .map_err(|e| CatalogError::Persistence(e.context("saving new item")))?;

    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchQuery;
    use crate::query::{translate, QueryPlan};
    use crate::store::memory::{MemoryIndex, MemoryRecordStore};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    fn candidate(name: &str) -> NewItem {
        NewItem {
            name: name.to_string(),
            description: "a test item".to_string(),
            price: 9.99,
            stock: 3,
            category: "Tools".to_string(),
            subcategory: "Hand tools".to_string(),
            location: "Berlin".to_string(),
        }
    }

    /// Index stub whose write path always fails.
    struct FailingIndex;

    #[async_trait]
    impl SearchIndex for FailingIndex {
        async fn index_item(&self, _item: &Item) -> Result<()> {
            Err(anyhow!("index unavailable"))
        }
        async fn search(&self, _plan: &QueryPlan) -> Result<Vec<Item>> {
            Err(anyhow!("index unavailable"))
        }
        async fn autocomplete(&self, _plan: &QueryPlan) -> Result<Vec<String>> {
            Err(anyhow!("index unavailable"))
        }
    }

    /// Record store stub whose save path always fails.
    struct FailingSaveStore;

    #[async_trait]
    impl RecordStore for FailingSaveStore {
        async fn find_by_name(&self, _name: &str) -> Result<Option<Item>> {
            Ok(None)
        }
        async fn save(&self, _item: &Item) -> Result<Item> {
            Err(anyhow!("record store unavailable"))
        }
    }

    #[tokio::test]
    async fn test_create_populates_both_stores() {
        let record = MemoryRecordStore::new();
        let index = MemoryIndex::new();

        let item = create_item(&record, &index, candidate("Widget"))
            .await
            .unwrap();
        assert_eq!(item.name, "Widget");
        assert_eq!(item.created_at, item.updated_at);

        assert!(record.find_by_name("Widget").await.unwrap().is_some());
        let indexed = index
            .search(&translate(&SearchQuery::default()))
            .await
            .unwrap();
        assert_eq!(indexed.len(), 1);
        assert_eq!(indexed[0].id, item.id);
    }

    #[tokio::test]
    async fn test_duplicate_create_yields_one_success_one_conflict() {
        let record = MemoryRecordStore::new();
        let index = MemoryIndex::new();

        create_item(&record, &index, candidate("Widget"))
            .await
            .unwrap();
        let err = create_item(&record, &index, candidate("Widget"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // Conflict left no second document behind.
        let indexed = index
            .search(&translate(&SearchQuery::default()))
            .await
            .unwrap();
        assert_eq!(indexed.len(), 1);
    }

    #[tokio::test]
    async fn test_index_failure_gates_persist() {
        let record = MemoryRecordStore::new();

        let err = create_item(&record, &FailingIndex, candidate("Widget"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Indexing(_)));

        // The record store must not contain the candidate.
        assert!(record.find_by_name("Widget").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persist_failure_leaves_orphan_index_document() {
        let index = MemoryIndex::new();

        let err = create_item(&FailingSaveStore, &index, candidate("Widget"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Persistence(_)));

        // Accepted bounded inconsistency: the index document exists with
        // no backing record.
        let indexed = index
            .search(&translate(&SearchQuery::default()))
            .await
            .unwrap();
        assert_eq!(indexed.len(), 1);
    }
}
