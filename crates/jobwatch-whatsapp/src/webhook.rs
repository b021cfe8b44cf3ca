// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Axum webhook server for inbound WhatsApp events.
//!
//! Meta delivers events as HTTP POSTs and performs a one-time GET
//! verification handshake when the webhook is registered. Event delivery is
//! always answered 200 (after optional signature verification) so Meta does
//! not endlessly retry payloads we cannot act on.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use hmac::{Hmac, Mac};
use jobwatch_core::types::InboundMessage;
use sha2::Sha256;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::payload::{self, WebhookEvent};

/// Shared state for the webhook handlers.
pub struct WebhookState {
    /// Token Meta echoes during the verification handshake.
    pub verify_token: String,
    /// App secret for `X-Hub-Signature-256` checks; `None` disables them.
    pub app_secret: Option<String>,
    /// Queue feeding `WhatsAppChannel::receive()`.
    pub inbound_tx: mpsc::Sender<InboundMessage>,
}

/// Build the webhook router.
pub fn router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/webhook", get(verify).post(receive_event))
        .with_state(state)
}

/// GET verification handshake: echo `hub.challenge` when the mode and token
/// match, otherwise 403.
async fn verify(
    State(state): State<Arc<WebhookState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);
    let challenge = params.get("hub.challenge").cloned().unwrap_or_default();

    if mode == Some("subscribe") && token == Some(state.verify_token.as_str()) {
        info!("webhook verification handshake accepted");
        (StatusCode::OK, challenge).into_response()
    } else {
        warn!("webhook verification handshake rejected");
        StatusCode::FORBIDDEN.into_response()
    }
}

/// POST event delivery: verify the signature if configured, then push every
/// contained user message onto the inbound queue.
async fn receive_event(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(secret) = &state.app_secret {
        let signature = headers
            .get("x-hub-signature-256")
            .and_then(|v| v.to_str().ok());
        if !signature_matches(secret, &body, signature) {
            warn!("rejecting webhook event with bad or missing signature");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            // Unknown payload shapes are acknowledged, not retried forever.
            warn!(error = %e, "ignoring unparseable webhook payload");
            return StatusCode::OK;
        }
    };

    for msg in payload::extract_messages(event) {
        debug!(sender = %msg.sender, id = %msg.id, "inbound webhook message");
        if state.inbound_tx.send(msg).await.is_err() {
            warn!("inbound queue closed, dropping webhook message");
        }
    }

    StatusCode::OK
}

/// Check an `X-Hub-Signature-256` header (`sha256=<hex>`) against the body.
fn signature_matches(secret: &str, body: &[u8], header: Option<&str>) -> bool {
    let Some(hex_digest) = header.and_then(|h| h.strip_prefix("sha256=")) else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}
