// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Jobwatch bot.
//!
//! This crate provides the foundational trait definitions, error type, and
//! domain types used throughout the Jobwatch workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::JobwatchError;
pub use traits::{ChannelAdapter, SessionStore};
pub use types::{
    InboundMessage, Jobcard, JobcardFilter, MessageId, MessageKind, OutboundMessage, Page,
    Priority, SessionState, Status,
};
