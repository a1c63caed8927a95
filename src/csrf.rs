//! CSRF state guard
//!
//! Issues and verifies the one-time opaque token that binds a login attempt
//! to its callback. Verification runs before any other callback processing;
//! on failure no network call is made.

use log::debug;
use uuid::Uuid;

use crate::error::AuthError;
use crate::session::{SessionStore, CSRF_STATE_KEY};

/// Generate a fresh state token and store it in the session.
///
/// The returned token is embedded in the outbound authorization URL; the
/// stored copy is consumed by [`verify`] at the matching callback. Issuing
/// again overwrites any earlier token for this session.
pub fn issue(session: &mut dyn SessionStore) -> String {
    let state = Uuid::new_v4().simple().to_string();
    session.set(CSRF_STATE_KEY, state.clone());
    state
}

/// Check a callback's state parameter against the stored token.
///
/// The stored token is deleted on success (single use); a later callback
/// presenting the same value is rejected.
///
/// # Errors
///
/// Returns [`AuthError::Csrf`] carrying both values when `received` is
/// missing, no token is stored, or the two are not exactly equal.
pub fn verify(session: &mut dyn SessionStore, received: Option<&str>) -> Result<(), AuthError> {
    let stored = session.get(CSRF_STATE_KEY);
    match (&stored, received) {
        (Some(stored_state), Some(received_state)) if stored_state == received_state => {
            session.remove(CSRF_STATE_KEY);
            debug!("CSRF state verified");
            Ok(())
        }
        _ => Err(AuthError::Csrf {
            received: received.map(ToOwned::to_owned),
            stored,
        }),
    }
}
