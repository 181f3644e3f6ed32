//! Failure taxonomy for catalog operations.
//!
//! Three kinds of failure leave the core: a business-rule conflict, a
//! search-index fault, and a record-store fault. Cache faults never appear
//! here — the search gateway absorbs them and degrades to a cache miss.

use thiserror::Error;

/// Errors returned by the write coordinator and the search gateway.
///
/// Store faults carry the underlying error with enough context (which
/// store, which operation) attached for triage. None of these are retried
/// by the core; retry policy belongs to the calling layer.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An item with the same name already exists. User-correctable;
    /// nothing was mutated.
    #[error("item named \"{name}\" already exists")]
    Conflict { name: String },

    /// The search index rejected a write. The record store was not
    /// touched, so both stores are unchanged.
    #[error("search index write failed")]
    Indexing(#[source] anyhow::Error),

    /// The record store failed. When this happens after a successful index
    /// write, an orphan index document is left behind (bounded
    /// inconsistency, reconciled out of band).
    #[error("record store operation failed")]
    Persistence(#[source] anyhow::Error),

    /// The search index failed while serving a cache miss. Never cached.
    #[error("search query failed")]
    Search(#[source] anyhow::Error),
}

impl CatalogError {
    /// True for caller-correctable business-rule violations.
    pub fn is_conflict(&self) -> bool {
        matches!(self, CatalogError::Conflict { .. })
    }
}
