//! # Database Handle
//!
//! Opens the SQLite store that holds submitted documents and the catalog.
//!
//! ## Who Touches the Store
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       One Store, Two Kinds of Access                    │
//! │                                                                         │
//! │   Save invoice / order                  Print view, lists, search      │
//! │   (one write transaction)               (plain reads)                  │
//! │         │                                        │                      │
//! │         ▼                                        ▼                      │
//! │   ┌──────────────────────────────────────────────────────────────┐     │
//! │   │  SqlitePool (max_connections)                                │     │
//! │   └──────────────────────────────────────────────────────────────┘     │
//! │         │                                        │                      │
//! │         ▼                                        ▼                      │
//! │   bump document_sequences  ◄── write lock    read committed rows      │
//! │   upsert document + lines       (one writer)   while a save runs      │
//! │         │                                                               │
//! │         └── a second save waits up to `busy_timeout` for the lock      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File stores run in WAL mode so a print view can read a document while
//! another one is being saved. In-memory stores (tests) use one connection.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::catalog::CatalogRepository;
use crate::repository::document::DocumentRepository;

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives and how the pool behaves.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("./data/bizdesk.db")
///     .max_connections(4)
///     .busy_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub database_path: PathBuf,

    /// Pool size. Default 5; a billing desk rarely has more concurrent
    /// form handlers than that.
    pub max_connections: u32,

    /// How long to wait for a free pool connection. Default 30 s.
    pub acquire_timeout: Duration,

    /// How long a save waits for another save's write lock. Default 5 s.
    pub busy_timeout: Duration,

    /// Apply pending migrations on connect. Default true.
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed store at `path` (created if missing).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Private in-memory store for tests.
    ///
    /// Every connection to `:memory:` opens a different database, so the
    /// pool is pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            ..DbConfig::new(IN_MEMORY)
        }
    }

    /// Reads `BIZDESK_DB_PATH` and `BIZDESK_DB_MAX_CONNECTIONS`, falling back
    /// to `default_path` and the defaults above.
    pub fn from_env(default_path: impl Into<PathBuf>) -> Self {
        Self::from_lookup(default_path, |key| std::env::var(key).ok())
    }

    /// Same as [`DbConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(
        default_path: impl Into<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let path = lookup("BIZDESK_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_path.into());
        let mut config = DbConfig::new(path);

        if let Some(raw) = lookup("BIZDESK_DB_MAX_CONNECTIONS") {
            match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => config.max_connections = n,
                _ => warn!(value = %raw, "Ignoring invalid BIZDESK_DB_MAX_CONNECTIONS"),
            }
        }

        config
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };

        // Document lines cascade with their document
        Ok(options
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the store. Clones share one pool.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./bizdesk.db")).await?;
/// let saved = db.documents().save(&draft.to_record()?).await?;
/// let bolts = db.catalog().search("bolt", 20).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the store and, unless disabled, brings its schema up to date.
    ///
    /// ## Errors
    /// - `ConnectionFailed` if the file cannot be opened or created
    /// - `MigrationFailed` if a migration does not apply
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening billing store");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            max_connections = config.max_connections,
            busy_timeout_ms = config.busy_timeout.as_millis() as u64,
            in_memory = config.is_in_memory(),
            "Pool ready"
        );

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. A no-op when the schema is current.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool, for queries the repositories do not cover.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Submitted invoices and orders.
    pub fn documents(&self) -> DocumentRepository {
        DocumentRepository::new(self.pool.clone())
    }

    /// Items rows can be filled from.
    pub fn catalog(&self) -> CatalogRepository {
        CatalogRepository::new(self.pool.clone())
    }

    /// Closes every connection. Later repository calls fail.
    pub async fn close(&self) {
        info!("Closing billing store");
        self.pool.close().await;
    }

    /// `true` when the store answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
