//! Error taxonomy for federated authentication flows
//!
//! Security-relevant failures (CSRF, discovery, verification) are terminal
//! and always surfaced to the caller; transport failures keep the provider's
//! status and raw body as diagnostics. A user declining at the provider is
//! not an error at all — see [`crate::models::Completion::Denied`].

use thiserror::Error;

/// Errors produced by the flow controllers and their collaborators.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The callback's state parameter does not match the token issued at
    /// login (or one of the two is missing). Checked before any network
    /// call is made.
    #[error("CSRF validation check failed: request state {received:?} is not the same as session state {stored:?}")]
    Csrf {
        received: Option<String>,
        stored: Option<String>,
    },

    /// A required login input was absent.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// A provider endpoint answered with a non-2xx status, or with a 2xx
    /// body that is missing a field the protocol requires. Carries the
    /// status and raw body for the caller's diagnostics.
    #[error("third-party failure: status {status}: {body}")]
    ThirdParty { status: u16, body: String },

    /// OpenID discovery failed. Raised by the protocol-library collaborator
    /// and propagated unmodified.
    #[error("OpenID discovery failed for {identifier}: {reason}")]
    Discovery { identifier: String, reason: String },

    /// The OpenID exchange completed with a non-success status
    /// (failure, cancel, or anything else the library reports).
    #[error("OpenID verification failed: {0}")]
    Verification(String),

    /// No pending protocol state was found in the session. Also the shape a
    /// stale callback takes after a newer login overwrote its state slot.
    #[error("no pending authentication state found in session")]
    MissingState,

    /// The per-login protocol blob could not be (de)serialized.
    #[error("session state error: {0}")]
    SessionState(String),

    /// The HTTP transport collaborator failed before a response was read.
    #[error("transport error: {0}")]
    Transport(String),

    /// A configured endpoint could not be assembled into a valid URL.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl AuthError {
    /// Build a [`AuthError::ThirdParty`] from a provider response.
    #[must_use]
    pub fn third_party(status: u16, body: impl Into<String>) -> Self {
        AuthError::ThirdParty {
            status,
            body: body.into(),
        }
    }
}
