//! # Record Store
//!
//! Read-only lookups of people records.
//!
//! The store is an explicitly owned resource: the pool is opened once at
//! startup and handed to handlers as an `Arc<dyn RecordStore>`, so tests can
//! substitute a fake without any ambient global. Queries are safe for
//! concurrent read-only use from any number of in-flight requests; no writes
//! ever go through this interface.

use async_trait::async_trait;
use roster_core::{Error, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// One people record, materialized per request from storage
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Person {
    /// Record identity
    pub id: i64,
    /// Display name; escaped at render time, never trusted
    pub name: String,
}

/// Read-only query surface consumed by the handlers
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every record, in storage's natural order
    async fn all(&self) -> Result<Vec<Person>>;

    /// Fetch the record whose id equals the given opaque string.
    ///
    /// The value is bound as a query parameter, never concatenated into
    /// SQL. When duplicates exist the first row is authoritative.
    async fn by_id(&self, id: &str) -> Result<Option<Person>>;
}

/// SQLite-backed record store
#[derive(Clone)]
pub struct SqlitePeopleStore {
    pool: SqlitePool,
}

impl SqlitePeopleStore {
    /// Connect to a SQLite database
    ///
    /// # Arguments
    ///
    /// * `url` - Database URL (e.g., "sqlite:db/people.db" or "sqlite::memory:")
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(|e| Error::Database {
                message: format!("SQLite connection failed: {e}"),
            })?;

        Ok(Self { pool })
    }

    /// Build a store around an existing pool
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SqlitePeopleStore {
    async fn all(&self) -> Result<Vec<Person>> {
        sqlx::query_as::<_, Person>("SELECT id, name FROM people")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database {
                message: format!("Query error: {e}"),
            })
    }

    async fn by_id(&self, id: &str) -> Result<Option<Person>> {
        sqlx::query_as::<_, Person>("SELECT id, name FROM people WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database {
                message: format!("Query error: {e}"),
            })
    }
}
