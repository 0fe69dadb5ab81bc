//! # Repository Module
//!
//! Database repository implementations for Bizdesk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories                                         │
//! │                                                                         │
//! │  Form handler                                                          │
//! │       │                                                                 │
//! │       │  db.documents().save(&record)                                  │
//! │       ▼                                                                 │
//! │  DocumentRepository                  CatalogRepository                 │
//! │  ├── save(&self, record)             ├── insert(&self, item)           │
//! │  ├── get_by_id(&self, id)            ├── get_by_id(&self, id)          │
//! │  ├── list_by_kind(&self, kind, n)    ├── search(&self, query, n)       │
//! │  └── delete(&self, id)               └── snapshot(&self)               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Decimal Columns
//! Money, rates and quantities are bound as decimal strings and parsed back
//! with [`decode_decimal`]. A value that does not parse is an error, never
//! a silent zero: stored figures are shown verbatim.
//!
//! ## Available Repositories
//!
//! - [`DocumentRepository`](document::DocumentRepository) - Invoices and orders
//! - [`CatalogRepository`](catalog::CatalogRepository) - Catalog items

pub mod catalog;
pub mod document;

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{DbError, DbResult};

/// Parses a TEXT decimal column.
pub(crate) fn decode_decimal(column: &str, raw: &str) -> DbResult<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|_| DbError::invalid_stored(column, raw))
}

/// Parses a nullable TEXT decimal column.
pub(crate) fn decode_optional_decimal(column: &str, raw: Option<&str>) -> DbResult<Option<Decimal>> {
    raw.map(|value| decode_decimal(column, value)).transpose()
}
