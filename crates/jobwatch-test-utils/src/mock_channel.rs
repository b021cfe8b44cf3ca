// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound messages
//! and captured outbound messages for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use jobwatch_core::error::JobwatchError;
use jobwatch_core::traits::ChannelAdapter;
use jobwatch_core::types::{InboundMessage, MessageId, MessageKind, OutboundMessage};

/// A mock messaging channel for testing.
///
/// Provides two queues:
/// - **inbound**: Messages injected via `inject_message()` are returned by `receive()`
/// - **sent**: Messages passed to `send()` are captured and retrievable via `sent_messages()`
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundMessage>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    notify: Arc<Notify>,
    /// Planned send failures as `(sends to let through, sends to fail)`.
    send_failures: Arc<Mutex<(usize, usize)>>,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            send_failures: Arc::new(Mutex::new((0, 0))),
        }
    }

    /// Arrange for sends to fail: the next `after` sends succeed, then the
    /// following `count` sends return a channel error. Failed sends are not
    /// captured in `sent_messages()`.
    pub async fn fail_sends(&self, after: usize, count: usize) {
        *self.send_failures.lock().await = (after, count);
    }

    /// Inject an inbound message into the receive queue.
    ///
    /// The next call to `receive()` will return this message.
    pub async fn inject_message(&self, msg: InboundMessage) {
        self.inbound.lock().await.push_back(msg);
        self.notify.notify_one();
    }

    /// Inject an inbound text message from `sender`.
    pub async fn inject_text(&self, sender: &str, body: &str) {
        self.inject_message(text_message(sender, body)).await;
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an inbound text message with a fresh id.
pub fn text_message(sender: &str, body: &str) -> InboundMessage {
    InboundMessage {
        id: format!("wamid.test-{}", uuid::Uuid::new_v4()),
        sender: sender.to_string(),
        kind: MessageKind::Text(body.to_string()),
        timestamp: chrono::Utc::now().timestamp().to_string(),
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), JobwatchError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, JobwatchError> {
        {
            let mut plan = self.send_failures.lock().await;
            if plan.0 > 0 {
                plan.0 -= 1;
            } else if plan.1 > 0 {
                plan.1 -= 1;
                return Err(JobwatchError::Channel {
                    message: "mock send failure".to_string(),
                    source: None,
                });
            }
        }
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(msg);
        Ok(MessageId(id))
    }

    async fn receive(&self) -> Result<InboundMessage, JobwatchError> {
        loop {
            // Try to pop from queue
            {
                let mut queue = self.inbound.lock().await;
                if let Some(msg) = queue.pop_front() {
                    return Ok(msg);
                }
            }
            // Wait for notification that a new message was injected
            self.notify.notified().await;
        }
    }

    async fn shutdown(&self) -> Result<(), JobwatchError> {
        Ok(())
    }
}
