//! # catalogd CLI
//!
//! Commands for bootstrapping the stores, seeding sample data, creating
//! items, searching, autocompleting, and running the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! catalogd --config ./config/catalogd.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `catalogd init` | Create the SQLite schema and the search index mapping |
//! | `catalogd seed` | Seed sample items through the write coordinator |
//! | `catalogd create <...>` | Create a single item |
//! | `catalogd search [query]` | Search with filters, sorting, pagination |
//! | `catalogd autocomplete <text>` | Name-prefix suggestions |
//! | `catalogd serve` | Start the HTTP server |

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use catalogd::catalog::Catalog;
use catalogd::config::{load_config, Config};
use catalogd::models::{NewItem, SearchQuery, SortField, SortOrder};
use catalogd::store::elastic::ElasticIndex;
use catalogd::store::memory::{MemoryCache, MemoryIndex, MemoryRecordStore};
use catalogd::store::sqlite::SqliteRecordStore;
use catalogd::store::{Cache, RecordStore, SearchIndex};
use catalogd::{db, seed, server};

/// catalogd — a catalog service with dual-store writes and cached search.
#[derive(Parser)]
#[command(
    name = "catalogd",
    about = "Catalog service — dual-store write coordination and cache-aside search",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/catalogd.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the record store schema and the search index mapping.
    /// Idempotent — running it multiple times is safe.
    Init,

    /// Seed sample items through the write coordinator.
    Seed,

    /// Create a single item.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        stock: i64,
        #[arg(long)]
        category: String,
        #[arg(long)]
        subcategory: String,
        #[arg(long)]
        location: String,
    },

    /// Search the catalog.
    Search {
        /// Free-text term matched against name and description.
        query: Option<String>,

        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subcategory: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Inclusive lower price bound.
        #[arg(long)]
        min_price: Option<f64>,
        /// Inclusive upper price bound.
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long)]
        offset: Option<i64>,
        /// Sort field: price, name, stock, created_at, or relevance.
        #[arg(long)]
        sort: Option<SortField>,
        /// Sort order: asc or desc.
        #[arg(long)]
        order: Option<SortOrder>,
    },

    /// Suggest item names for a prefix (at most 5).
    Autocomplete {
        /// The name fragment to complete.
        text: String,
    },

    /// Start the HTTP server.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            build_catalog(&config).await?;
            println!("Stores initialized");
            Ok(())
        }
        Commands::Seed => {
            let catalog = build_catalog(&config).await?;
            seed::run_seed(&catalog).await?;
            Ok(())
        }
        Commands::Create {
            name,
            description,
            price,
            stock,
            category,
            subcategory,
            location,
        } => {
            let candidate = NewItem {
                name,
                description,
                price,
                stock,
                category,
                subcategory,
                location,
            };
            candidate.validate().map_err(anyhow::Error::msg)?;

            let catalog = build_catalog(&config).await?;
            let item = catalog.create_item(candidate).await?;
            println!("Created {} ({})", item.name, item.id);
            Ok(())
        }
        Commands::Search {
            query,
            category,
            subcategory,
            location,
            min_price,
            max_price,
            limit,
            offset,
            sort,
            order,
        } => {
            let catalog = build_catalog(&config).await?;
            let request = SearchQuery {
                q: query,
                category,
                subcategory,
                location,
                min_price,
                max_price,
                limit,
                offset,
                sort,
                order,
            };
            let items = catalog.search_items(&request).await?;
            if items.is_empty() {
                println!("No results.");
                return Ok(());
            }
            for (i, item) in items.iter().enumerate() {
                println!(
                    "{}. {} — {:.2} ({} in stock) [{} / {}] {}",
                    i + 1,
                    item.name,
                    item.price,
                    item.stock,
                    item.category,
                    item.subcategory,
                    item.location
                );
            }
            Ok(())
        }
        Commands::Autocomplete { text } => {
            if text.trim().is_empty() {
                anyhow::bail!("text must not be empty");
            }
            let catalog = build_catalog(&config).await?;
            let names = catalog.autocomplete(&text).await?;
            if names.is_empty() {
                println!("No suggestions.");
                return Ok(());
            }
            for name in names {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Serve => {
            let catalog = Arc::new(build_catalog(&config).await?);
            server::run_server(&config, catalog).await
        }
    }
}

/// Wire the configured backends into a [`Catalog`].
///
/// The memory backend keeps everything in-process (useful for trying the
/// CLI and HTTP API without infrastructure); the elastic backend pairs a
/// SQLite record store with an Elasticsearch index.
async fn build_catalog(config: &Config) -> Result<Catalog> {
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());

    let (record, index): (Arc<dyn RecordStore>, Arc<dyn SearchIndex>) =
        match config.search.backend.as_str() {
            "memory" => (
                Arc::new(MemoryRecordStore::new()),
                Arc::new(MemoryIndex::new()),
            ),
            _ => {
                let pool = db::connect(config).await?;
                db::init_schema(&pool).await?;
                let elastic = ElasticIndex::new(&config.search)?;
                elastic.ensure_index().await?;
                (Arc::new(SqliteRecordStore::new(pool)), Arc::new(elastic))
            }
        };

    Ok(Catalog::new(record, index, cache, &config.cache))
}
