//! # Document Repository
//!
//! Database operations for invoices and orders.
//!
//! ## Document Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Document Lifecycle                                │
//! │                                                                         │
//! │  1. SUBMIT                                                             │
//! │     └── draft.to_record() → DocumentRecord { number: None }            │
//! │                                                                         │
//! │  2. SAVE (one transaction)                                             │
//! │     └── assign number INV-YYYYMMDD-NNNN if missing                     │
//! │     └── upsert documents row (totals written verbatim)                 │
//! │     └── replace document_lines rows                                    │
//! │                                                                         │
//! │  3. REDISPLAY                                                          │
//! │     └── get_by_id() → record.redisplay_totals()  (no recompute)        │
//! │                                                                         │
//! │  4. (OPTIONAL) REOPEN / DELETE                                         │
//! │     └── record.to_draft(..) → edit → save again (same id & number)     │
//! │     └── delete() → lines removed by ON DELETE CASCADE                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, trace};

use bizdesk_core::{
    DocumentKind, DocumentRecord, DocumentTotals, LineRecord, Money, Percent, Quantity, TaxModel,
};

use super::{decode_decimal, decode_optional_decimal};
use crate::error::{DbError, DbResult};

// =============================================================================
// Row Types
// =============================================================================

/// Raw `documents` row.
#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    kind: DocumentKind,
    number: String,
    tax_model: TaxModel,
    discount_percent: Option<String>,
    discount_amount: Option<String>,
    subtotal: String,
    cgst_total: String,
    sgst_total: String,
    tax_total: String,
    line_discount_total: String,
    discount_total: String,
    grand_total: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Raw `document_lines` row.
#[derive(Debug, FromRow)]
struct LineRow {
    position: i64,
    description: String,
    catalog_id: Option<String>,
    quantity: String,
    unit_price: String,
    tax_rate: Option<String>,
    cgst_rate: Option<String>,
    sgst_rate: Option<String>,
    discount_percent: Option<String>,
    base_amount: String,
    cgst_amount: String,
    sgst_amount: String,
    tax_amount: String,
    discount_amount: String,
    line_total: String,
}

fn money(column: &str, raw: &str) -> DbResult<Money> {
    decode_decimal(column, raw).map(Money::new)
}

fn optional_percent(column: &str, raw: Option<&str>) -> DbResult<Option<Percent>> {
    Ok(decode_optional_decimal(column, raw)?.map(Percent::new))
}

fn text(value: Money) -> String {
    value.amount().to_string()
}

fn optional_text(value: Option<Percent>) -> Option<String> {
    value.map(|p| p.value().to_string())
}

impl LineRow {
    fn into_record(self) -> DbResult<LineRecord> {
        let position = u32::try_from(self.position)
            .map_err(|_| DbError::invalid_stored("document_lines.position", self.position.to_string()))?;

        Ok(LineRecord {
            position,
            quantity: Quantity::new(decode_decimal("document_lines.quantity", &self.quantity)?),
            unit_price: money("document_lines.unit_price", &self.unit_price)?,
            tax_rate: optional_percent("document_lines.tax_rate", self.tax_rate.as_deref())?,
            cgst_rate: optional_percent("document_lines.cgst_rate", self.cgst_rate.as_deref())?,
            sgst_rate: optional_percent("document_lines.sgst_rate", self.sgst_rate.as_deref())?,
            discount_percent: optional_percent(
                "document_lines.discount_percent",
                self.discount_percent.as_deref(),
            )?,
            base_amount: money("document_lines.base_amount", &self.base_amount)?,
            cgst_amount: money("document_lines.cgst_amount", &self.cgst_amount)?,
            sgst_amount: money("document_lines.sgst_amount", &self.sgst_amount)?,
            tax_amount: money("document_lines.tax_amount", &self.tax_amount)?,
            discount_amount: money("document_lines.discount_amount", &self.discount_amount)?,
            line_total: money("document_lines.line_total", &self.line_total)?,
            description: self.description,
            catalog_id: self.catalog_id,
        })
    }
}

impl DocumentRow {
    fn into_record(self, lines: Vec<LineRecord>) -> DbResult<DocumentRecord> {
        let totals = DocumentTotals {
            subtotal: money("documents.subtotal", &self.subtotal)?,
            cgst_total: money("documents.cgst_total", &self.cgst_total)?,
            sgst_total: money("documents.sgst_total", &self.sgst_total)?,
            tax_total: money("documents.tax_total", &self.tax_total)?,
            line_discount_total: money("documents.line_discount_total", &self.line_discount_total)?,
            discount_total: money("documents.discount_total", &self.discount_total)?,
            grand_total: money("documents.grand_total", &self.grand_total)?,
        };

        Ok(DocumentRecord {
            id: self.id,
            kind: self.kind,
            number: Some(self.number),
            tax_model: self.tax_model,
            lines,
            discount_percent: optional_percent(
                "documents.discount_percent",
                self.discount_percent.as_deref(),
            )?,
            discount_amount: decode_optional_decimal(
                "documents.discount_amount",
                self.discount_amount.as_deref(),
            )?
            .map(Money::new),
            totals,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// =============================================================================
// Summary
// =============================================================================

/// One entry in a document list view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub kind: DocumentKind,
    pub number: String,
    pub grand_total: Money,
    pub line_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    id: String,
    kind: DocumentKind,
    number: String,
    grand_total: String,
    line_count: i64,
    created_at: DateTime<Utc>,
}

impl SummaryRow {
    fn into_summary(self) -> DbResult<DocumentSummary> {
        Ok(DocumentSummary {
            grand_total: money("documents.grand_total", &self.grand_total)?,
            id: self.id,
            kind: self.kind,
            number: self.number,
            line_count: self.line_count,
            created_at: self.created_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for invoice and order database operations.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Creates a new DocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Saves a document and its lines in one transaction.
    ///
    /// ## Behavior
    /// - Assigns a document number if the record has none
    /// - Inserts a new document, or replaces an existing one with the same id
    ///   (its number and `created_at` are kept)
    /// - Lines are replaced wholesale
    /// - Derived amounts and totals are written exactly as given
    ///
    /// ## Returns
    /// The record as stored, with number and `updated_at` filled in.
    pub async fn save(&self, record: &DocumentRecord) -> DbResult<DocumentRecord> {
        let mut saved = record.clone();
        saved.updated_at = Utc::now();

        let mut tx = self.pool.begin().await?;

        if saved.number.is_none() {
            saved.number = Some(next_document_number(&mut tx, saved.kind, saved.updated_at).await?);
        }
        let number = saved.number.clone().unwrap_or_default();

        debug!(id = %saved.id, number = %number, lines = saved.lines.len(), "Saving document");

        let totals = &saved.totals;
        sqlx::query(
            r#"
            INSERT INTO documents (
                id, kind, number, tax_model,
                discount_percent, discount_amount,
                subtotal, cgst_total, sgst_total, tax_total,
                line_discount_total, discount_total, grand_total,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12, ?13,
                ?14, ?15
            )
            ON CONFLICT (id) DO UPDATE SET
                kind = excluded.kind,
                tax_model = excluded.tax_model,
                discount_percent = excluded.discount_percent,
                discount_amount = excluded.discount_amount,
                subtotal = excluded.subtotal,
                cgst_total = excluded.cgst_total,
                sgst_total = excluded.sgst_total,
                tax_total = excluded.tax_total,
                line_discount_total = excluded.line_discount_total,
                discount_total = excluded.discount_total,
                grand_total = excluded.grand_total,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&saved.id)
        .bind(saved.kind)
        .bind(&number)
        .bind(saved.tax_model)
        .bind(optional_text(saved.discount_percent))
        .bind(saved.discount_amount.map(text))
        .bind(text(totals.subtotal))
        .bind(text(totals.cgst_total))
        .bind(text(totals.sgst_total))
        .bind(text(totals.tax_total))
        .bind(text(totals.line_discount_total))
        .bind(text(totals.discount_total))
        .bind(text(totals.grand_total))
        .bind(saved.created_at)
        .bind(saved.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM document_lines WHERE document_id = ?1")
            .bind(&saved.id)
            .execute(&mut *tx)
            .await?;

        for line in &saved.lines {
            insert_line(&mut tx, &saved.id, line).await?;
        }

        tx.commit().await?;

        // An upsert keeps the stored number and created_at
        let stored = self
            .get_by_id(&saved.id)
            .await?
            .ok_or_else(|| DbError::not_found("Document", saved.id.clone()))?;

        info!(
            id = %stored.id,
            number = %stored.display_ref(),
            grand_total = %stored.totals.grand_total,
            "Document saved"
        );
        Ok(stored)
    }

    /// Gets a document with its lines by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DocumentRecord>> {
        let row: Option<DocumentRow> = sqlx::query_as(
            r#"
            SELECT
                id, kind, number, tax_model,
                discount_percent, discount_amount,
                subtotal, cgst_total, sgst_total, tax_total,
                line_discount_total, discount_total, grand_total,
                created_at, updated_at
            FROM documents
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines = self.get_lines(id).await?;
        row.into_record(lines).map(Some)
    }

    /// Lists documents of one kind, newest first.
    pub async fn list_by_kind(&self, kind: DocumentKind, limit: u32) -> DbResult<Vec<DocumentSummary>> {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT
                d.id, d.kind, d.number, d.grand_total, d.created_at,
                (SELECT COUNT(*) FROM document_lines l WHERE l.document_id = d.id) AS line_count
            FROM documents d
            WHERE d.kind = ?1
            ORDER BY d.created_at DESC, d.number DESC
            LIMIT ?2
            "#,
        )
        .bind(kind)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(kind = %kind, count = rows.len(), "Listed documents");
        rows.into_iter().map(SummaryRow::into_summary).collect()
    }

    /// Deletes a document. Its lines go with it.
    ///
    /// ## Errors
    /// - `NotFound` if no document has this id
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Document", id));
        }

        info!(id = %id, "Document deleted");
        Ok(())
    }

    async fn get_lines(&self, document_id: &str) -> DbResult<Vec<LineRecord>> {
        let rows: Vec<LineRow> = sqlx::query_as(
            r#"
            SELECT
                position, description, catalog_id,
                quantity, unit_price,
                tax_rate, cgst_rate, sgst_rate, discount_percent,
                base_amount, cgst_amount, sgst_amount, tax_amount,
                discount_amount, line_total
            FROM document_lines
            WHERE document_id = ?1
            ORDER BY position
            "#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LineRow::into_record).collect()
    }
}

async fn insert_line(
    tx: &mut Transaction<'_, Sqlite>,
    document_id: &str,
    line: &LineRecord,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO document_lines (
            document_id, position, description, catalog_id,
            quantity, unit_price,
            tax_rate, cgst_rate, sgst_rate, discount_percent,
            base_amount, cgst_amount, sgst_amount, tax_amount,
            discount_amount, line_total
        ) VALUES (
            ?1, ?2, ?3, ?4,
            ?5, ?6,
            ?7, ?8, ?9, ?10,
            ?11, ?12, ?13, ?14,
            ?15, ?16
        )
        "#,
    )
    .bind(document_id)
    .bind(i64::from(line.position))
    .bind(&line.description)
    .bind(&line.catalog_id)
    .bind(line.quantity.value().to_string())
    .bind(text(line.unit_price))
    .bind(optional_text(line.tax_rate))
    .bind(optional_text(line.cgst_rate))
    .bind(optional_text(line.sgst_rate))
    .bind(optional_text(line.discount_percent))
    .bind(text(line.base_amount))
    .bind(text(line.cgst_amount))
    .bind(text(line.sgst_amount))
    .bind(text(line.tax_amount))
    .bind(text(line.discount_amount))
    .bind(text(line.line_total))
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Next number for `kind` on the day of `at`, format `PFX-YYYYMMDD-NNNN`.
///
/// ## Example
/// `INV-20260115-0007` is the seventh invoice numbered on 15 January 2026.
///
/// ## Sequence
/// ```text
/// document_sequences
/// prefix          last_value
/// INV-20260115-   6   ──upsert──►  7  ──► INV-20260115-0007
/// ```
/// The counter is bumped by the first write of the save transaction, which
/// takes SQLite's write lock before any number is read. It never goes
/// back, so numbers of deleted documents are not handed out again.
async fn next_document_number(
    tx: &mut Transaction<'_, Sqlite>,
    kind: DocumentKind,
    at: DateTime<Utc>,
) -> DbResult<String> {
    let prefix = format!("{}-{}-", kind.number_prefix(), at.format("%Y%m%d"));

    let sequence: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO document_sequences (prefix, last_value)
        VALUES (?1, 1)
        ON CONFLICT (prefix) DO UPDATE SET last_value = last_value + 1
        RETURNING last_value
        "#,
    )
    .bind(&prefix)
    .fetch_one(&mut **tx)
    .await?;

    trace!(prefix = %prefix, sequence, "Document sequence advanced");
    Ok(format!("{}{:04}", prefix, sequence))
}

// =============================================================================
// Unit Tests
// =============================================================================
