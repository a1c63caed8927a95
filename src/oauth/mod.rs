//! OAuth2 authorization-code redirect flow
//!
//! Drives login → callback → token exchange → profile fetch → normalization
//! for providers with the single redirect-flow shape (modeled on the
//! Facebook Graph API). The CSRF guard runs before anything else in the
//! callback; a user declining at the provider is a [`Completion::Denied`],
//! not an error.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error};
use url::form_urlencoded;

use crate::csrf;
use crate::error::AuthError;
use crate::http::HttpFetch;
use crate::models::{Completion, Credentials, LoginDirective};
use crate::profile::facebook_profile;
use crate::session::SessionStore;
use crate::utils::flat_url;

/// Endpoint and credential configuration for one OAuth2 provider.
#[derive(Debug, Clone)]
pub struct OAuth2Provider {
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub profile_endpoint: String,
    /// Absolute callback URL registered with the provider.
    pub redirect_uri: String,
    /// Default scope; a login request may override it.
    pub scope: Option<String>,
}

impl OAuth2Provider {
    /// Facebook with the standard Graph endpoints.
    #[must_use]
    pub fn facebook(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        scope: Option<String>,
    ) -> Self {
        Self {
            name: "facebook".to_owned(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorization_endpoint: "https://www.facebook.com/dialog/oauth/".to_owned(),
            token_endpoint: "https://graph.facebook.com/oauth/access_token".to_owned(),
            profile_endpoint: "https://graph.facebook.com/me".to_owned(),
            redirect_uri: redirect_uri.into(),
            scope,
        }
    }
}

/// OAuth2 redirect flow controller.
pub struct OAuth2Flow {
    provider: OAuth2Provider,
    http: Arc<dyn HttpFetch>,
}

impl OAuth2Flow {
    #[must_use]
    pub fn new(provider: OAuth2Provider, http: Arc<dyn HttpFetch>) -> Self {
        Self { provider, http }
    }

    /// Initiate a login: issue a CSRF state token and build the
    /// authorization redirect. No network call is made.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidUrl`] when the configured authorization
    /// endpoint is not a valid URL.
    pub fn login(
        &self,
        session: &mut dyn SessionStore,
        scope: Option<&str>,
    ) -> Result<LoginDirective, AuthError> {
        let state = csrf::issue(session);
        let scope = scope.or(self.provider.scope.as_deref()).unwrap_or_default();
        let url = flat_url(
            &self.provider.authorization_endpoint,
            &[
                ("scope", scope),
                ("client_id", &self.provider.client_id),
                ("redirect_uri", &self.provider.redirect_uri),
                ("state", &state),
            ],
        )?;
        debug!("initiating {} login", self.provider.name);
        Ok(LoginDirective::Redirect(url))
    }

    /// Process the provider's redirect back to us.
    ///
    /// # Errors
    ///
    /// [`AuthError::Csrf`] when the state parameter does not match the one
    /// issued at login (checked first, no outbound call is made);
    /// [`AuthError::ThirdParty`] when the token exchange or profile fetch
    /// answers non-2xx, omits the access token, or returns an unusable
    /// profile document.
    pub async fn callback(
        &self,
        session: &mut dyn SessionStore,
        params: &HashMap<String, String>,
    ) -> Result<Completion, AuthError> {
        csrf::verify(session, params.get("state").map(String::as_str))?;

        // No code means the provider or the user declined: a normal
        // negative completion, not an error.
        let Some(code) = params.get("code") else {
            let reason = params
                .get("error_reason")
                .cloned()
                .unwrap_or_else(|| "No reason provided.".to_owned());
            debug!("{} authentication denied: {reason}", self.provider.name);
            return Ok(Completion::Denied { reason });
        };

        let access_token = self.exchange_code(code).await?;
        let profile_url = flat_url(
            &self.provider.profile_endpoint,
            &[("access_token", &access_token)],
        )?;
        let response = self.http.get(&profile_url).await?;
        if !response.is_success() {
            error!(
                "{} profile fetch failed with status {}",
                self.provider.name, response.status
            );
            return Err(AuthError::third_party(response.status, response.body));
        }

        let data: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|_| AuthError::third_party(response.status, response.body.clone()))?;
        let profile = facebook_profile(&data)
            .map_err(|_| AuthError::third_party(response.status, response.body.clone()))?;

        let mut credentials = Credentials::new();
        credentials.insert("oauthAccessToken".to_owned(), access_token);

        Ok(Completion::Success {
            profile,
            credentials,
        })
    }

    /// Exchange the authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let token_url = flat_url(
            &self.provider.token_endpoint,
            &[
                ("client_id", &self.provider.client_id),
                ("client_secret", &self.provider.client_secret),
                ("redirect_uri", &self.provider.redirect_uri),
                ("code", code),
            ],
        )?;
        let response = self.http.get(&token_url).await?;
        if !response.is_success() {
            error!(
                "{} token exchange failed with status {}",
                self.provider.name, response.status
            );
            return Err(AuthError::third_party(response.status, response.body));
        }

        // A 2xx body without the token field is still a provider fault;
        // keep the raw body as the diagnostic.
        form_urlencoded::parse(response.body.as_bytes())
            .find(|(key, _)| key == "access_token")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| AuthError::third_party(response.status, response.body.clone()))
    }
}
