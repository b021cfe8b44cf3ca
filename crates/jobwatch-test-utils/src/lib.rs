// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Jobwatch integration tests.
//!
//! Provides a mock channel adapter and seeded database fixtures for fast,
//! deterministic, CI-runnable tests without WhatsApp or a live deployment.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock messaging channel with message injection and capture
//! - [`fixtures`] - Temporary, migrated, pre-seeded jobcard databases

pub mod fixtures;
pub mod mock_channel;

pub use fixtures::{SeedJobcard, TestDb};
pub use mock_channel::MockChannel;
