// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value session store trait.

use crate::types::SessionState;

/// Process-local key-value store mapping a conversation identity to its
/// session state.
///
/// Injected into the conversation controller rather than held as a module
/// global, so tests can substitute a double and the store can later be
/// externalized without touching controller logic. Access is atomic per
/// key; each identity owns its own entry, so no cross-key coordination is
/// needed.
pub trait SessionStore: Send + Sync + 'static {
    /// Returns the state recorded for `identity`, if any.
    fn get(&self, identity: &str) -> Option<SessionState>;

    /// Records `state` for `identity`, overwriting any previous entry.
    fn set(&self, identity: &str, state: SessionState);
}
