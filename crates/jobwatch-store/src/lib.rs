// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Jobwatch bot.
//!
//! Provides WAL-mode SQLite access with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and the paginated jobcard query
//! the conversation controller is built on. The jobcard rows themselves are
//! owned by the external web application; this crate only reads them.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::*;
