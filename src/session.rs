//! Per-browser-session state storage
//!
//! The store is an external collaborator scoped to one end-user browser
//! session. Both flows use it for exactly one slot each: the CSRF state
//! token (OAuth2) and the opaque per-login protocol blob (OpenID). Slots are
//! written at login, consumed at the matching callback, and overwritten by
//! the next login.
//!
//! There is deliberately no locking or transaction discipline: two
//! concurrent login attempts on the same session race on the single stored
//! slot, and the loser's callback is rejected as a CSRF/missing-state
//! failure. That rejection doubles as the cancellation mechanism for
//! abandoned logins.

use std::collections::HashMap;

/// Session key holding the OAuth2 CSRF state token.
pub const CSRF_STATE_KEY: &str = "state";

/// Session key holding the serialized OpenID protocol state.
pub const OPENID_SESSION_KEY: &str = "openid_session";

/// Key/value view of one browser session.
///
/// Implementations are expected to be backed by whatever session mechanism
/// the host application already has (cookie session, server-side store).
pub trait SessionStore: Send {
    /// Read a value without consuming it.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, overwriting any previous one under the same key.
    fn set(&mut self, key: &str, value: String);

    /// Delete a value, returning it if it was present.
    fn remove(&mut self, key: &str) -> Option<String>;
}

/// In-memory session, suitable for tests and single-process hosts.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: HashMap<String, String>,
}

impl MemorySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}
