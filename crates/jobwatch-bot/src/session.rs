// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session tracking.
//!
//! One [`SessionState`] per conversation identity, held in a [`DashMap`].
//! Sessions are never evicted and never persisted; a restart clears them
//! and with them the cool-down state.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use jobwatch_core::traits::SessionStore;
use jobwatch_core::types::SessionState;

/// Process-local session store keyed by conversation identity.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionState>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, identity: &str) -> Option<SessionState> {
        self.sessions.get(identity).map(|entry| entry.clone())
    }

    fn set(&self, identity: &str, state: SessionState) {
        self.sessions.insert(identity.to_string(), state);
    }
}

/// When the identity may issue its next start command.
///
/// Returns `Some(last_request + cooldown)` while the cool-down is still
/// running at `now`, `None` once it has elapsed.
pub fn next_eligible(
    last_request: DateTime<Utc>,
    cooldown_hours: i64,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let next = last_request + Duration::hours(cooldown_hours);
    (now < next).then_some(next)
}
