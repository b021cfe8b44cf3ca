// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread. Query modules accept `&Database` and call through
//! `database.connection().call()`; do not create additional `Connection`
//! instances.

use std::path::Path;
use std::time::Duration;

use jobwatch_core::JobwatchError;
use tracing::debug;

/// Handle to the jobcard SQLite database.
///
/// Cloning is cheap; all clones share the same background connection thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, JobwatchError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| JobwatchError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| JobwatchError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| -> Result<(), JobwatchError> {
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(map_sql_err)?;
            conn.pragma_update(None, "foreign_keys", "ON")
                .map_err(map_sql_err)?;
            conn.busy_timeout(Duration::from_secs(5))
                .map_err(map_sql_err)?;
            crate::migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Close the background connection, flushing pending work.
    pub async fn close(&self) -> Result<(), JobwatchError> {
        self.conn.clone().close().await.map_err(map_tr_err)
    }
}

/// Map a tokio-rusqlite error into the workspace error type.
pub(crate) fn map_tr_err<E>(e: tokio_rusqlite::Error<E>) -> JobwatchError
where
    E: std::error::Error + Send + Sync + 'static,
{
    JobwatchError::Storage {
        source: Box::new(e),
    }
}

fn map_sql_err(e: rusqlite::Error) -> JobwatchError {
    JobwatchError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_schema_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobcards.db");
        let path = path.to_str().unwrap();

        let db = Database::open(path).await.unwrap();
        let count: i64 = db
            .connection()
            .call(|conn| -> rusqlite::Result<i64> {
                let n = conn.query_row(
                    "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name LIKE 'jc_%'",
                    [],
                    |row| row.get(0),
                )?;
                Ok(n)
            })
            .await
            .unwrap();
        assert_eq!(count, 4);
        db.close().await.unwrap();

        // Reopening runs migrations again without error.
        let db = Database::open(path).await.unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn queries_after_close_fail_cleanly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobcards.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();

        let result = db
            .connection()
            .call(|conn| -> rusqlite::Result<i64> {
                let n: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
                Ok(n)
            })
            .await;
        assert!(result.is_err());
    }
}
