// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporary jobcard databases seeded with known data.
//!
//! Every fixture database lives in a [`tempfile::TempDir`] and is migrated on
//! open; one client ("Acme Mining") and two users ("tariro", "sam") are
//! pre-inserted so jobcards can reference them by id.

use jobwatch_core::types::{Priority, Status};
use jobwatch_store::Database;
use rusqlite::params;
use tempfile::TempDir;

/// A migrated, seeded database. Dropping it removes the backing file.
pub struct TestDb {
    pub db: Database,
    _dir: TempDir,
}

impl TestDb {
    /// Open a fresh database with the base client and user rows.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let db_path = dir.path().join("jobcards.db");
        let db = Database::open(db_path.to_str().expect("utf-8 temp path"))
            .await
            .expect("open test database");

        db.connection()
            .call(|conn| -> rusqlite::Result<()> {
                conn.execute(
                    "INSERT INTO jc_clients (id, name) VALUES (1, 'Acme Mining')",
                    [],
                )?;
                conn.execute(
                    "INSERT INTO jc_users (id, username) VALUES (1, 'tariro'), (2, 'sam')",
                    [],
                )?;
                Ok(())
            })
            .await
            .expect("seed base rows");

        Self { db, _dir: dir }
    }

    /// Insert a jobcard row.
    pub async fn insert(&self, seed: SeedJobcard) {
        self.db
            .connection()
            .call(move |conn| -> rusqlite::Result<()> {
                conn.execute(
                    "INSERT INTO jc_jobcards \
                     (id, client_id, priority, description, assigned_to, supervised_by, \
                      status, reported_on, start_date, end_date, completion_notes, \
                      issues_arising, created_at) \
                     VALUES (?1, 1, ?2, ?3, 1, 2, ?4, ?5, ?6, ?7, ?8, ?9, ?5)",
                    params![
                        seed.id,
                        seed.priority.to_string(),
                        seed.description,
                        seed.status.to_string(),
                        seed.created_at,
                        seed.start_date,
                        seed.end_date,
                        seed.completion_notes,
                        seed.issues_arising,
                    ],
                )?;
                Ok(())
            })
            .await
            .expect("insert jobcard");
    }

    /// Attach a file (uploaded by user 1) to an existing jobcard.
    pub async fn attach_file(&self, jobcard_id: i64, file_name: &str) {
        let file_name = file_name.to_string();
        self.db
            .connection()
            .call(move |conn| -> rusqlite::Result<()> {
                conn.execute(
                    "INSERT INTO jc_attachments (jobcard_id, uploaded_by, file_name) \
                     VALUES (?1, 1, ?2)",
                    params![jobcard_id, file_name],
                )?;
                Ok(())
            })
            .await
            .expect("insert attachment");
    }
}

/// One jobcard row to insert, with sensible defaults from [`SeedJobcard::new`].
#[derive(Debug, Clone)]
pub struct SeedJobcard {
    pub id: i64,
    pub priority: Priority,
    pub status: Status,
    pub description: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub completion_notes: Option<String>,
    pub issues_arising: Option<String>,
    /// Also used as `reported_on`.
    pub created_at: String,
}

impl SeedJobcard {
    /// An urgent, reported jobcard created on the `id`-th of January 2026.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            priority: Priority::Urgent,
            status: Status::Reported,
            description: format!("job {id}"),
            start_date: Some(iso_day(1)),
            end_date: Some(iso_day(28)),
            completion_notes: None,
            issues_arising: None,
            created_at: iso_day(id as u32),
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn end_date(mut self, end_date: Option<&str>) -> Self {
        self.end_date = end_date.map(str::to_string);
        self
    }
}

/// ISO-8601 UTC timestamp for 08:00 on the `n`-th of January 2026.
pub fn iso_day(n: u32) -> String {
    format!("2026-01-{n:02}T08:00:00.000Z")
}
