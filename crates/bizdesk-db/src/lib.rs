//! # bizdesk-db: Database Layer for Bizdesk
//!
//! This crate stores submitted invoices/orders and the item catalog.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bizdesk Data Flow                                │
//! │                                                                         │
//! │  Form "Save" (draft.to_record())                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    bizdesk-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ DocumentRepo  │    │ 001_initial  │  │   │
//! │  │   │ Connection    │    │ CatalogRepo   │    │   _schema    │  │   │
//! │  │   │ Management    │    │               │    │ 002_document │  │   │
//! │  │   │               │    │               │    │   _sequences │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here computes money. Totals arrive in the `DocumentRecord` and
//! are written and read back verbatim.
//!
//! ## Module Organization
//!
//! - [`pool`] - Opening the store, pool and lock settings
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Document and catalog repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bizdesk_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/bizdesk.db")).await?;
//!
//! let saved = db.documents().save(&draft.to_record()?).await?;
//! let shown = db.documents().get_by_id(&saved.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::document::{DocumentRepository, DocumentSummary};
