// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions implemented at the seams of the bot.

pub mod channel;
pub mod session;

pub use channel::ChannelAdapter;
pub use session::SessionStore;
