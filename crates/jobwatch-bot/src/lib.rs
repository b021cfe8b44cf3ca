// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot logic for Jobwatch: jobcard report rendering, per-conversation
//! session tracking, and the conversation controller that drives the
//! command loop over a [`jobwatch_core::traits::ChannelAdapter`].

pub mod controller;
pub mod report;
pub mod session;

pub use controller::{BotSettings, Controller};
pub use session::InMemorySessionStore;
