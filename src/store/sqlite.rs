//! SQLite-backed [`RecordStore`] implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::models::Item;

use super::RecordStore;

/// SQLite implementation of the [`RecordStore`] trait.
///
/// Timestamps are stored as unix seconds. The `items` table carries a
/// UNIQUE constraint on name (see [`crate::db::init_schema`]), so a
/// duplicate insert that slips past the coordinator's lookup fails here.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<Item> {
    let created_at: i64 = row.get("created_at");
    let updated_at: i64 = row.get("updated_at");
    Ok(Item {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        stock: row.get("stock"),
        category: row.get("category"),
        subcategory: row.get("subcategory"),
        location: row.get("location"),
        created_at: chrono::DateTime::from_timestamp(created_at, 0)
            .context("invalid created_at timestamp")?,
        updated_at: chrono::DateTime::from_timestamp(updated_at, 0)
            .context("invalid updated_at timestamp")?,
    })
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Item>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price, stock, category, subcategory,
                   location, created_at, updated_at
            FROM items
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("querying items by name")?;

        row.as_ref().map(row_to_item).transpose()
    }

    async fn save(&self, item: &Item) -> Result<Item> {
        sqlx::query(
            r#"
            INSERT INTO items (id, name, description, price, stock, category,
                               subcategory, location, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.stock)
        .bind(&item.category)
        .bind(&item.subcategory)
        .bind(&item.location)
        .bind(item.created_at.timestamp())
        .bind(item.updated_at.timestamp())
        .execute(&self.pool)
        .await
        .with_context(|| format!("inserting item \"{}\"", item.name))?;

        Ok(item.clone())
    }
}
