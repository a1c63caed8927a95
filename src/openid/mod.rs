//! OpenID 2.0 consumer flow
//!
//! Drives login → (redirect | form POST) → callback → verify → extension
//! extraction → normalization. Discovery and cryptographic verification are
//! delegated to the [`consumer::OpenIdConsumer`] collaborator; provider
//! specializations plug in through [`hooks::ProviderHooks`].

pub mod consumer;
pub mod hooks;
pub mod schema;

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::error::AuthError;
use crate::models::{Completion, Credentials, LoginDirective};
use crate::openid::consumer::{CheckStatus, OpenIdConsumer, ProtocolState, OAUTH_HYBRID_NS};
use crate::openid::hooks::{DefaultHooks, ProviderHooks};
use crate::openid::schema::{AxSchema, SREG_FIELDS};
use crate::profile::openid_profile;
use crate::session::{SessionStore, OPENID_SESSION_KEY};

/// Relying-party identity presented to the provider.
#[derive(Debug, Clone)]
pub struct OpenIdSettings {
    /// The trust realm the user approves.
    pub realm: String,
    /// Absolute callback URL the provider returns the assertion to.
    pub return_to: String,
}

/// OpenID consumer flow controller.
pub struct OpenIdFlow {
    settings: OpenIdSettings,
    consumer: Arc<dyn OpenIdConsumer>,
    hooks: Arc<dyn ProviderHooks>,
    schema: AxSchema,
}

impl OpenIdFlow {
    #[must_use]
    pub fn new(settings: OpenIdSettings, consumer: Arc<dyn OpenIdConsumer>) -> Self {
        Self {
            settings,
            consumer,
            hooks: Arc::new(DefaultHooks),
            schema: AxSchema::default(),
        }
    }

    /// Install provider-specific hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Select the AX attribute namespace to request.
    #[must_use]
    pub fn with_schema(mut self, schema: AxSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Begin a login against the given identifier.
    ///
    /// Runs discovery, attaches both attribute extensions unconditionally
    /// (providers support AX and SReg inconsistently, not exclusively),
    /// persists the per-attempt protocol state into the session, and returns
    /// the redirect or form-POST directive the host should answer with.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingParameter`] when no identifier survives the
    /// lookup hook; [`AuthError::Discovery`] propagated unmodified from the
    /// protocol library; [`AuthError::SessionState`] when the protocol state
    /// cannot be serialized.
    pub async fn login(
        &self,
        session: &mut dyn SessionStore,
        identifier: Option<&str>,
    ) -> Result<LoginDirective, AuthError> {
        debug!("handling OpenID login");

        // Hooks may supply or rewrite the identifier before it is required.
        let identifier = self
            .hooks
            .lookup_identifier(identifier)
            .filter(|id| !id.is_empty())
            .ok_or(AuthError::MissingParameter("openid_identifier"))?;

        debug!("beginning OpenID discovery for {identifier}");
        let (mut request, state) = self.consumer.begin(&identifier).await?;

        request.ax_fetch = self.schema.fetch_uris();
        request.sreg_optional = SREG_FIELDS.to_vec();
        self.hooks.update_auth_request(&mut request);

        let directive = if request.prefers_form_post {
            debug!("provider prefers form POST to {}", request.endpoint);
            LoginDirective::FormPost(self.consumer.form_markup(
                &request,
                &self.settings.realm,
                &self.settings.return_to,
            )?)
        } else {
            debug!("redirecting to provider endpoint {}", request.endpoint);
            LoginDirective::Redirect(self.consumer.redirect_url(
                &request,
                &self.settings.realm,
                &self.settings.return_to,
            )?)
        };

        let blob = serde_json::to_string(&state)
            .map_err(|e| AuthError::SessionState(e.to_string()))?;
        session.set(OPENID_SESSION_KEY, blob);

        Ok(directive)
    }

    /// Handle the incoming redirect or POST from the OpenID provider.
    ///
    /// The stored protocol state is deleted before use; a replayed or stale
    /// callback therefore finds nothing and is rejected.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingState`] when no protocol state is stored;
    /// [`AuthError::Verification`] when the exchange did not end in success;
    /// verification errors from the protocol library propagate unmodified.
    pub async fn process(
        &self,
        session: &mut dyn SessionStore,
        params: &HashMap<String, String>,
    ) -> Result<Completion, AuthError> {
        debug!("handling processing of response from server");

        let blob = session
            .remove(OPENID_SESSION_KEY)
            .ok_or(AuthError::MissingState)?;
        let state: ProtocolState =
            serde_json::from_str(&blob).map_err(|e| AuthError::SessionState(e.to_string()))?;

        let info = self
            .consumer
            .complete(state, params, &self.settings.return_to)
            .await?;

        match info.status {
            CheckStatus::Success => {}
            CheckStatus::Failure => {
                return Err(AuthError::Verification(
                    "provider reported a failed assertion".to_owned(),
                ))
            }
            CheckStatus::Cancel => {
                return Err(AuthError::Verification(
                    "authentication was cancelled at the provider".to_owned(),
                ))
            }
            CheckStatus::SetupNeeded => {
                return Err(AuthError::Verification(
                    "provider requires setup to continue".to_owned(),
                ))
            }
        }

        // An i-name's canonical ID stays secure even if the mutable
        // identity URL is later compromised, so it wins when supplied.
        let identifier = info
            .canonical_id
            .clone()
            .unwrap_or_else(|| info.identity_url.clone());

        let profile = openid_profile(&identifier, &info.sreg, &info.ax, self.schema);

        let mut credentials = Credentials::new();
        if let Some(request_token) = info
            .extensions
            .get(OAUTH_HYBRID_NS)
            .and_then(|oauth| oauth.get("request_token"))
        {
            debug!("exchanging hybrid OAuth request token");
            if let Some(access_token) = self.hooks.access_token(request_token).await {
                credentials.insert("oauthAccessToken".to_owned(), access_token);
            }
        }

        Ok(Completion::Success {
            profile,
            credentials,
        })
    }
}
