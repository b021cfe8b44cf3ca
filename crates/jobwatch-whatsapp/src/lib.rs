// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Business Cloud API channel for the Jobwatch bot.
//!
//! Implements [`ChannelAdapter`] over the official Cloud API: inbound
//! messages arrive on an axum webhook server, outbound texts go to the
//! Graph API via reqwest. Requires an access token and phone number id
//! from Meta Business Suite.

pub mod payload;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use jobwatch_config::model::WhatsAppConfig;
use jobwatch_core::error::JobwatchError;
use jobwatch_core::traits::ChannelAdapter;
use jobwatch_core::types::{InboundMessage, MessageId, OutboundMessage};
use serde::Deserialize;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};

use crate::webhook::WebhookState;

/// Production Graph API endpoint; overridable for tests.
pub const GRAPH_API_BASE: &str = "https://graph.facebook.com/v21.0";

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    messages: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}

/// WhatsApp channel implementing [`ChannelAdapter`].
#[derive(Debug)]
pub struct WhatsAppChannel {
    config: WhatsAppConfig,
    http: reqwest::Client,
    api_base: String,
    access_token: String,
    phone_number_id: String,
    inbound_tx: mpsc::Sender<InboundMessage>,
    inbound_rx: Mutex<mpsc::Receiver<InboundMessage>>,
    server_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl WhatsAppChannel {
    /// Creates a new WhatsApp channel.
    ///
    /// Requires `access_token`, `phone_number_id`, and `verify_token` to be
    /// set in the config.
    pub fn new(config: WhatsAppConfig) -> Result<Self, JobwatchError> {
        let access_token = require(&config.access_token, "whatsapp.access_token")?;
        let phone_number_id = require(&config.phone_number_id, "whatsapp.phone_number_id")?;
        require(&config.verify_token, "whatsapp.verify_token")?;

        let (inbound_tx, inbound_rx) = mpsc::channel(256);

        Ok(Self {
            config,
            http: reqwest::Client::new(),
            api_base: GRAPH_API_BASE.to_string(),
            access_token,
            phone_number_id,
            inbound_tx,
            inbound_rx: Mutex::new(inbound_rx),
            server_handle: Mutex::new(None),
        })
    }

    /// Point the channel at a different Graph API base URL (tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Webhook handler state shared with the axum server.
    pub fn webhook_state(&self) -> Arc<WebhookState> {
        Arc::new(WebhookState {
            verify_token: self.config.verify_token.clone().unwrap_or_default(),
            app_secret: self.config.app_secret.clone(),
            inbound_tx: self.inbound_tx.clone(),
        })
    }

    /// Send one text message via the Cloud API.
    async fn send_text(&self, to: &str, body: &str) -> Result<MessageId, JobwatchError> {
        let url = format!("{}/{}/messages", self.api_base, self.phone_number_id);
        let payload = serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "text",
            "text": { "preview_url": false, "body": body }
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| JobwatchError::Channel {
                message: format!("WhatsApp send request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(JobwatchError::Channel {
                message: format!("WhatsApp send rejected ({status}): {detail}"),
                source: None,
            });
        }

        let parsed: SendResponse =
            response.json().await.map_err(|e| JobwatchError::Channel {
                message: format!("WhatsApp send response unreadable: {e}"),
                source: Some(Box::new(e)),
            })?;

        let id = parsed
            .messages
            .into_iter()
            .next()
            .map(|m| m.id)
            .ok_or_else(|| JobwatchError::Channel {
                message: "WhatsApp send response carried no message id".to_string(),
                source: None,
            })?;

        debug!(to, id = %id, "message sent");
        Ok(MessageId(id))
    }
}

fn require(value: &Option<String>, key: &str) -> Result<String, JobwatchError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(JobwatchError::Config(format!(
            "{key} is required for the WhatsApp channel"
        ))),
    }
}

#[async_trait]
impl ChannelAdapter for WhatsAppChannel {
    async fn connect(&mut self) -> Result<(), JobwatchError> {
        let app = webhook::router(self.webhook_state());
        let addr = format!(
            "{}:{}",
            self.config.webhook_host, self.config.webhook_port
        );

        let listener =
            tokio::net::TcpListener::bind(&addr)
                .await
                .map_err(|e| JobwatchError::Channel {
                    message: format!("failed to bind webhook server to {addr}: {e}"),
                    source: Some(Box::new(e)),
                })?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "webhook server error");
            }
        });

        let mut server_handle = self.server_handle.lock().await;
        *server_handle = Some(handle);

        info!(addr = %addr, "WhatsApp webhook server listening");
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, JobwatchError> {
        self.send_text(&msg.to, &msg.body).await
    }

    async fn receive(&self) -> Result<InboundMessage, JobwatchError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| JobwatchError::Channel {
            message: "webhook inbound queue closed".to_string(),
            source: None,
        })
    }

    async fn shutdown(&self) -> Result<(), JobwatchError> {
        let mut handle = self.server_handle.lock().await;
        if let Some(h) = handle.take() {
            h.abort();
        }
        Ok(())
    }
}
