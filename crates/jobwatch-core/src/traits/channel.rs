// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging platform integrations.

use async_trait::async_trait;

use crate::error::JobwatchError;
use crate::types::{InboundMessage, MessageId, OutboundMessage};

/// Adapter for a bidirectional messaging channel.
///
/// The production implementation is the WhatsApp Cloud API channel; tests
/// substitute a mock with injectable inbound messages.
#[async_trait]
pub trait ChannelAdapter: Send + Sync + 'static {
    /// Establishes the connection (starts the webhook server for webhook
    /// based channels).
    async fn connect(&mut self) -> Result<(), JobwatchError>;

    /// Sends one text message. Sends are fired in sequence and awaited;
    /// there is no batching.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, JobwatchError>;

    /// Receives the next inbound message from the channel.
    async fn receive(&self) -> Result<InboundMessage, JobwatchError>;

    /// Gracefully shuts down the channel, releasing held resources.
    async fn shutdown(&self) -> Result<(), JobwatchError>;
}
