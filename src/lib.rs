//! # catalogd
//!
//! A catalog service core: items are created through a dual-store write
//! coordinator, searched through a structured query translator, and read
//! through a cache-aside gateway.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────────┐   ┌──────────────┐
//! │   HTTP   │──▶│ Write Coordinator │──▶│ Search Index │ 1: gates
//! │  / CLI   │   │     (create)      │──▶│ Record Store │ 2
//! └──────────┘   └───────────────────┘   └──────────────┘
//!       │        ┌───────────────────┐   ┌──────────────┐
//!       └───────▶│  Cached Gateway   │──▶│    Cache     │
//!                │ (search/complete) │──▶│ Search Index │
//!                └───────────────────┘   └──────────────┘
//! ```
//!
//! Writes are index-first: the search index gates the record store, so the
//! only partial-failure state is an orphan index document — recoverable
//! from the system of record, unlike an unsearchable record.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`query`] | SearchQuery → QueryPlan translation |
//! | [`create`] | Dual-store write coordination |
//! | [`search`] | Cache-aside search and autocomplete |
//! | [`catalog`] | Façade wiring the collaborators |
//! | [`store`] | Record store / search index / cache traits and backends |
//! | [`server`] | HTTP API |
//! | [`seed`] | Sample-data seeding |
//! | [`db`] | SQLite pool and schema |

pub mod catalog;
pub mod config;
pub mod create;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod search;
pub mod seed;
pub mod server;
pub mod store;
