//! Provider-specific capability points
//!
//! Specialized OpenID providers (Google Apps, hybrid OpenID+OAuth setups)
//! differ from the generic flow in exactly three places. Each is a hook
//! with a no-op default, injected as a strategy rather than subclassed.

use async_trait::async_trait;

use crate::openid::consumer::PendingAuthRequest;

/// Injectable provider-specific behavior for the OpenID flow.
#[async_trait]
pub trait ProviderHooks: Send + Sync {
    /// Rewrite or default the identifier before discovery. A provider that
    /// always discovers against one fixed URL can ignore the input.
    fn lookup_identifier(&self, identifier: Option<&str>) -> Option<String> {
        identifier.map(ToOwned::to_owned)
    }

    /// Decorate the pending request with provider-specific extension
    /// arguments before it is rendered.
    fn update_auth_request(&self, _request: &mut PendingAuthRequest) {}

    /// Exchange a hybrid-OAuth request token for an access token. Providers
    /// without the hybrid extension leave this unimplemented.
    async fn access_token(&self, _request_token: &str) -> Option<String> {
        None
    }
}

/// The generic flow: no rewriting, no extra extensions, no hybrid OAuth.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

#[async_trait]
impl ProviderHooks for DefaultHooks {}
