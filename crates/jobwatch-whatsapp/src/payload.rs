// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serde types for the WhatsApp Cloud API webhook envelope.
//!
//! Only the fields the bot acts on are modeled; everything else in the
//! envelope is ignored during deserialization.

use jobwatch_core::types::{InboundMessage, MessageKind};
use serde::Deserialize;

/// Top-level webhook event: `entry` -> `changes` -> `value` -> `messages`.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
pub struct Change {
    pub value: ChangeValue,
}

#[derive(Debug, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<WebhookMessage>,
}

/// One user message inside a webhook event.
#[derive(Debug, Deserialize)]
pub struct WebhookMessage {
    pub id: String,
    /// Sender wa_id (phone number), the conversation identity.
    pub from: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<TextBody>,
}

#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub body: String,
}

impl WebhookMessage {
    /// Convert into the channel-agnostic inbound message.
    ///
    /// Anything other than `type = "text"` becomes
    /// [`MessageKind::Unsupported`] carrying the type tag; a text message
    /// with a missing body is treated the same way.
    pub fn into_inbound(self) -> InboundMessage {
        let kind = if self.kind == "text" {
            match self.text {
                Some(text) => MessageKind::Text(text.body),
                None => MessageKind::Unsupported("text".to_string()),
            }
        } else {
            MessageKind::Unsupported(self.kind)
        };
        InboundMessage {
            id: self.id,
            sender: self.from,
            kind,
            timestamp: self.timestamp,
        }
    }
}

/// Collect all user messages from a webhook event in delivery order.
pub fn extract_messages(event: WebhookEvent) -> Vec<InboundMessage> {
    event
        .entry
        .into_iter()
        .flat_map(|e| e.changes)
        .flat_map(|c| c.value.messages)
        .map(WebhookMessage::into_inbound)
        .collect()
}
