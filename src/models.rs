//! Common data types shared by both flow controllers

use std::collections::HashMap;

use crate::profile::Profile;

/// Credential material handed back alongside a profile,
/// e.g. `{"oauthAccessToken": "..."}`.
pub type Credentials = HashMap<String, String>;

/// Terminal outcome of a federated exchange.
///
/// Owned transiently by the flow controller and handed to the caller; true
/// failures (CSRF, transport, verification) are surfaced as
/// [`crate::AuthError`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The provider authenticated the user and we normalized their profile.
    Success {
        profile: Profile,
        credentials: Credentials,
    },
    /// The provider or the user explicitly declined. A normal negative
    /// outcome, distinct from the error taxonomy.
    Denied { reason: String },
}

/// What the host application should answer the login request with.
///
/// Models the HTTP shapes without binding a web framework: a 302-style
/// redirect to the provider, or a 200-style HTML body carrying an
/// auto-submitting form (OpenID 2.0 providers may request form POST).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginDirective {
    Redirect(String),
    FormPost(String),
}

impl LoginDirective {
    /// The redirect target, if this directive is a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            LoginDirective::Redirect(url) => Some(url),
            LoginDirective::FormPost(_) => None,
        }
    }
}
