//! Seam to the external OpenID 2.0 protocol library
//!
//! Discovery, message construction, and signature/nonce verification are
//! delegated to a protocol-library collaborator behind [`OpenIdConsumer`].
//! The flow controller only sees a pending request it can decorate with
//! extensions, an opaque state blob it persists across the round trip, and
//! a verification outcome.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// OpenID+OAuth hybrid extension namespace carrying a request token.
pub const OAUTH_HYBRID_NS: &str = "http://specs.openid.net/extensions/oauth/1.0";

/// Opaque per-attempt protocol state.
///
/// Produced at [`OpenIdConsumer::begin`], serialized into the session, and
/// handed back (exactly once) to [`OpenIdConsumer::complete`]. The flow
/// never looks inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolState(pub serde_json::Value);

/// One discovered authorization request, alive for a single login-callback
/// round trip. The flow fills in the extension lists; provider hooks may add
/// raw extension arguments on top.
#[derive(Debug, Clone, Default)]
pub struct PendingAuthRequest {
    /// The provider endpoint discovery resolved to.
    pub endpoint: String,
    /// Providers may state a preference for a form POST over a redirect.
    pub prefers_form_post: bool,
    /// Attribute Exchange fetch list (attribute URIs).
    pub ax_fetch: Vec<&'static str>,
    /// Simple Registration optional-field list.
    pub sreg_optional: Vec<&'static str>,
    /// Extra raw extension arguments added by provider hooks.
    pub extension_args: HashMap<String, String>,
}

/// Status of a completed OpenID exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Success,
    Failure,
    Cancel,
    SetupNeeded,
}

/// What the protocol library reports after verifying a callback.
#[derive(Debug, Clone)]
pub struct VerifyResponse {
    pub status: CheckStatus,
    /// The identity URL the assertion was made for.
    pub identity_url: String,
    /// Stable canonical ID some providers issue in place of the mutable
    /// identity URL (i-names). Preferred when present.
    pub canonical_id: Option<String>,
    /// Attribute Exchange payload, keyed by attribute URI.
    pub ax: HashMap<String, String>,
    /// Simple Registration payload, keyed by field name.
    pub sreg: HashMap<String, String>,
    /// Other extension payloads, keyed by namespace URI.
    pub extensions: HashMap<String, HashMap<String, String>>,
}

impl VerifyResponse {
    /// A negative outcome carrying only a status.
    #[must_use]
    pub fn failed(status: CheckStatus) -> Self {
        Self {
            status,
            identity_url: String::new(),
            canonical_id: None,
            ax: HashMap::new(),
            sreg: HashMap::new(),
            extensions: HashMap::new(),
        }
    }
}

/// The external OpenID protocol library.
#[async_trait]
pub trait OpenIdConsumer: Send + Sync {
    /// Run discovery on the identifier and open a fresh per-attempt
    /// protocol state.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Discovery`] when discovery fails; the flow
    /// propagates it unmodified.
    async fn begin(
        &self,
        identifier: &str,
    ) -> Result<(PendingAuthRequest, ProtocolState), AuthError>;

    /// Render the authorization redirect URL for a pending request.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be rendered against the
    /// realm or return-to URL.
    fn redirect_url(
        &self,
        request: &PendingAuthRequest,
        realm: &str,
        return_to: &str,
    ) -> Result<String, AuthError>;

    /// Render the auto-submitting HTML form for providers that prefer POST.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be rendered against the
    /// realm or return-to URL.
    fn form_markup(
        &self,
        request: &PendingAuthRequest,
        realm: &str,
        return_to: &str,
    ) -> Result<String, AuthError>;

    /// Verify the provider's callback parameters against the stored
    /// protocol state (signature, nonce, return-to).
    ///
    /// # Errors
    ///
    /// Returns an error when verification cannot be performed at all;
    /// negative outcomes are reported through [`VerifyResponse::status`].
    async fn complete(
        &self,
        state: ProtocolState,
        params: &HashMap<String, String>,
        return_to: &str,
    ) -> Result<VerifyResponse, AuthError>;
}
