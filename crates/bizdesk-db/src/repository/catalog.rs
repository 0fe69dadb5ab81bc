//! # Catalog Repository
//!
//! Database operations for catalog (inventory) items that invoice rows can
//! be filled from.
//!
//! ## Filling a Row
//! ```text
//! User picks "Steel bolt M8"
//!      │
//!      ▼
//! db.catalog().get_by_id(id).await ──► Some(item)
//!      │                                   │
//!      │ None: row left as-is              ▼
//!      │                  draft.apply_catalog_item(row, &item)
//! ```
//! Forms that work offline take a [`CatalogRepository::snapshot`] and use
//! `DocumentDraft::fill_from_catalog` against it.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use bizdesk_core::catalog::InMemoryCatalog;
use bizdesk_core::{CatalogItem, Money};

use super::decode_decimal;
use crate::error::{DbError, DbResult};

/// Raw `catalog_items` row.
#[derive(Debug, FromRow)]
struct CatalogRow {
    id: String,
    name: String,
    unit_price: String,
}

impl CatalogRow {
    fn into_item(self) -> DbResult<CatalogItem> {
        let unit_price = decode_decimal("catalog_items.unit_price", &self.unit_price)?;
        Ok(CatalogItem {
            id: self.id,
            name: self.name,
            unit_price: Money::new(unit_price),
        })
    }
}

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Inserts a catalog item.
    ///
    /// ## Errors
    /// - `UniqueViolation` if the id already exists
    pub async fn insert(&self, item: &CatalogItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting catalog item");

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO catalog_items (id, name, unit_price, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.unit_price.amount().to_string())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: item.id.clone(),
            },
            other => other,
        })?;

        Ok(())
    }

    /// Gets a catalog item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CatalogItem>> {
        let row: Option<CatalogRow> = sqlx::query_as(
            r#"
            SELECT id, name, unit_price
            FROM catalog_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CatalogRow::into_item).transpose()
    }

    /// Searches items by name (case-insensitive substring) or exact id.
    ///
    /// An empty query lists items by name.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<CatalogItem>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching catalog");

        let rows: Vec<CatalogRow> = if query.is_empty() {
            sqlx::query_as(
                r#"
                SELECT id, name, unit_price
                FROM catalog_items
                ORDER BY name
                LIMIT ?1
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as(
                r#"
                SELECT id, name, unit_price
                FROM catalog_items
                WHERE name LIKE ?1 ESCAPE '\' OR id = ?2
                ORDER BY name
                LIMIT ?3
                "#,
            )
            .bind(like_pattern(query))
            .bind(query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        };

        debug!(count = rows.len(), "Catalog search returned items");
        rows.into_iter().map(CatalogRow::into_item).collect()
    }

    /// Number of catalog items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Loads the whole catalog for synchronous lookups.
    pub async fn snapshot(&self) -> DbResult<InMemoryCatalog> {
        let rows: Vec<CatalogRow> = sqlx::query_as("SELECT id, name, unit_price FROM catalog_items")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(CatalogRow::into_item).collect()
    }
}

/// `%query%` with LIKE wildcards in the query escaped.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
