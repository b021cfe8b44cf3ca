// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `jobwatch-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within the
//! storage crate.

pub use jobwatch_core::types::{Jobcard, JobcardFilter, Page, Priority, Status};
