//! In-memory store implementations for tests and infrastructure-free runs.
//!
//! Uses `HashMap` and `Vec` behind `std::sync::RwLock` for thread safety.
//! [`MemoryIndex`] executes query plans directly over its document set:
//! naive token containment stands in for full-text scoring, filters and
//! field sorts are evaluated literally, and the window is applied last.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Item, SortField, SortOrder};
use crate::query::{FilterClause, MustClause, QueryPlan, SortSpec};

use super::{Cache, RecordStore, SearchIndex};

/// In-memory [`RecordStore`] keyed by item id.
pub struct MemoryRecordStore {
    items: RwLock<HashMap<String, Item>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Item>> {
        let items = self.items.read().unwrap();
        Ok(items.values().find(|i| i.name == name).cloned())
    }

    async fn save(&self, item: &Item) -> Result<Item> {
        let mut items = self.items.write().unwrap();
        items.insert(item.id.clone(), item.clone());
        Ok(item.clone())
    }
}

/// In-memory [`SearchIndex`] that evaluates [`QueryPlan`]s over stored
/// documents.
pub struct MemoryIndex {
    docs: RwLock<Vec<Item>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }

    fn execute(&self, plan: &QueryPlan) -> Vec<Item> {
        let docs = self.docs.read().unwrap();
        let mut scored: Vec<(f64, Item)> = docs
            .iter()
            .filter_map(|item| {
                let score = must_score(&plan.must, item)?;
                if plan.filters.iter().all(|f| filter_matches(f, item)) {
                    Some((score, item.clone()))
                } else {
                    None
                }
            })
            .collect();

        match plan.sort {
            SortSpec::Score => {
                scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
            }
            SortSpec::Field { field, order } => {
                scored.sort_by(|a, b| {
                    let cmp = compare_field(&a.1, &b.1, field, a.0, b.0);
                    match order {
                        SortOrder::Asc => cmp,
                        SortOrder::Desc => cmp.reverse(),
                    }
                });
            }
        }

        let offset = plan.window.offset.unwrap_or(0).max(0) as usize;
        let mut items: Vec<Item> = scored.into_iter().skip(offset).map(|(_, i)| i).collect();
        if let Some(size) = plan.window.size {
            items.truncate(size.max(0) as usize);
        }
        items
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Score an item against the must clauses, or `None` if any clause rejects
/// it. Name hits count double, matching the boost the real engine applies.
fn must_score(must: &[MustClause], item: &Item) -> Option<f64> {
    let mut total = 0.0;
    for clause in must {
        match clause {
            MustClause::MatchAll => total += 1.0,
            MustClause::MultiMatch { query } => {
                let name = item.name.to_lowercase();
                let description = item.description.to_lowercase();
                let mut hits = 0.0;
                for term in query.to_lowercase().split_whitespace() {
                    if name.contains(term) {
                        hits += 2.0;
                    }
                    if description.contains(term) {
                        hits += 1.0;
                    }
                }
                if hits == 0.0 {
                    return None;
                }
                total += hits;
            }
            MustClause::PrefixName { text } => {
                if !item.name.to_lowercase().starts_with(&text.to_lowercase()) {
                    return None;
                }
                total += 1.0;
            }
        }
    }
    Some(total)
}

fn filter_matches(filter: &FilterClause, item: &Item) -> bool {
    match filter {
        FilterClause::Term { field, value } => match *field {
            "category" => item.category == *value,
            "subcategory" => item.subcategory == *value,
            "location" => item.location == *value,
            _ => false,
        },
        FilterClause::Range { gte, lte, .. } => {
            gte.map_or(true, |min| item.price >= min) && lte.map_or(true, |max| item.price <= max)
        }
    }
}

fn compare_field(a: &Item, b: &Item, field: SortField, score_a: f64, score_b: f64) -> Ordering {
    match field {
        SortField::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Stock => a.stock.cmp(&b.stock),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        // Relevance never reaches here via the translator; compare scores
        // ascending so an explicit Desc request still means best-first.
        SortField::Relevance => score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal),
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn index_item(&self, item: &Item) -> Result<()> {
        let mut docs = self.docs.write().unwrap();
        docs.retain(|d| d.id != item.id);
        docs.push(item.clone());
        Ok(())
    }

    async fn search(&self, plan: &QueryPlan) -> Result<Vec<Item>> {
        Ok(self.execute(plan))
    }

    async fn autocomplete(&self, plan: &QueryPlan) -> Result<Vec<String>> {
        Ok(self.execute(plan).into_iter().map(|i| i.name).collect())
    }
}

/// In-memory [`Cache`] with per-entry absolute expiry.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                Some((value, deadline)) if Instant::now() < *deadline => {
                    return Ok(Some(value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired. Drop the entry so the map does not grow without bound;
        // re-check under the write lock in case a writer refreshed it.
        let mut entries = self.entries.write().unwrap();
        if let Some((_, deadline)) = entries.get(key) {
            if Instant::now() >= *deadline {
                entries.remove(key);
            }
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        let now = Instant::now();
        entries.retain(|_, (_, deadline)| now < *deadline);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }
}
