//! Connection pools for the Postboard database.
//!
//! Listings and lookups go through `reader`; every insert, update, delete and
//! vote transaction goes through the single `writer` connection, so writes
//! never contend for SQLite's lock among themselves.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use postboard_types::error::RepositoryError;

const READER_CONNECTIONS: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open (creating if needed) the database at `database_url` and bring
    /// its schema up to date.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;

        // Readers open read-only, so the schema must exist first.
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        tracing::debug!(url = %database_url, readers = READER_CONNECTIONS, "database opened");
        Ok(Self { reader, writer })
    }
}

/// Timestamps are stored as fixed-width UTC strings so that comparing and
/// ordering the TEXT column matches chronological order.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(e) => Err(RepositoryError::Query(format!("bad timestamp '{raw}': {e}"))),
    }
}

pub(crate) fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

/// Fresh migrated database. The directory is removed when this is dropped.
#[cfg(test)]
pub(crate) struct TestDb {
    pub(crate) pool: DatabasePool,
    dir: tempfile::TempDir,
}

#[cfg(test)]
pub(crate) async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("postboard.db").display());
    let pool = DatabasePool::new(&url).await.unwrap();
    TestDb { pool, dir }
}
