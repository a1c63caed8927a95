//! Mock collaborators for the flow controllers

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::error::AuthError;
use crate::http::{HttpFetch, HttpResponse};
use crate::openid::consumer::{
    OpenIdConsumer, PendingAuthRequest, ProtocolState, VerifyResponse,
};

/// HTTP transport serving canned responses by URL prefix.
///
/// Records every requested URL so tests can assert that a rejected callback
/// made no outbound calls.
#[derive(Default)]
pub struct MockFetch {
    routes: Vec<(String, HttpResponse)>,
    calls: Mutex<Vec<String>>,
}

impl MockFetch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `status`/`body` for any URL starting with `prefix`.
    #[must_use]
    pub fn route(mut self, prefix: &str, status: u16, body: &str) -> Self {
        self.routes.push((
            prefix.to_owned(),
            HttpResponse {
                status,
                body: body.to_owned(),
            },
        ));
        self
    }

    /// URLs requested so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetch for MockFetch {
    async fn get(&self, url: &str) -> Result<HttpResponse, AuthError> {
        self.calls.lock().unwrap().push(url.to_owned());
        let matched = self
            .routes
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()));
        match matched {
            Some((_, response)) => Ok(response.clone()),
            None => Ok(HttpResponse {
                status: 404,
                body: format!("no mock route for {url}"),
            }),
        }
    }
}

/// Scripted OpenID protocol library.
///
/// `begin` hands out a pending request for the configured endpoint together
/// with a recognizable protocol-state blob; `complete` replays the
/// configured [`VerifyResponse`]. Rendered requests and completed states are
/// recorded for assertions.
pub struct MockConsumer {
    endpoint: String,
    prefers_form_post: bool,
    discovery_failure: Option<String>,
    response: Option<VerifyResponse>,
    rendered: Mutex<Vec<PendingAuthRequest>>,
    completed: Mutex<Vec<ProtocolState>>,
}

impl MockConsumer {
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_owned(),
            prefers_form_post: false,
            discovery_failure: None,
            response: None,
            rendered: Mutex::new(Vec::new()),
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Make the provider ask for a form POST instead of a redirect.
    #[must_use]
    pub fn prefers_form_post(mut self) -> Self {
        self.prefers_form_post = true;
        self
    }

    /// Make discovery fail with the given reason.
    #[must_use]
    pub fn fail_discovery(mut self, reason: &str) -> Self {
        self.discovery_failure = Some(reason.to_owned());
        self
    }

    /// Script the outcome `complete` reports.
    #[must_use]
    pub fn complete_with(mut self, response: VerifyResponse) -> Self {
        self.response = Some(response);
        self
    }

    /// The most recently rendered pending request, extensions included.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn last_rendered(&self) -> Option<PendingAuthRequest> {
        self.rendered.lock().unwrap().last().cloned()
    }

    /// Protocol states handed back through `complete`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn completed_states(&self) -> Vec<ProtocolState> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl OpenIdConsumer for MockConsumer {
    async fn begin(
        &self,
        identifier: &str,
    ) -> Result<(PendingAuthRequest, ProtocolState), AuthError> {
        if let Some(reason) = &self.discovery_failure {
            return Err(AuthError::Discovery {
                identifier: identifier.to_owned(),
                reason: reason.clone(),
            });
        }
        let request = PendingAuthRequest {
            endpoint: self.endpoint.clone(),
            prefers_form_post: self.prefers_form_post,
            ..PendingAuthRequest::default()
        };
        let state = ProtocolState(json!({
            "assoc_handle": "mock-handle",
            "endpoint": self.endpoint,
            "claimed_id": identifier,
        }));
        Ok((request, state))
    }

    fn redirect_url(
        &self,
        request: &PendingAuthRequest,
        realm: &str,
        return_to: &str,
    ) -> Result<String, AuthError> {
        self.rendered.lock().unwrap().push(request.clone());
        Ok(format!(
            "{}?openid.mode=checkid_setup&openid.realm={realm}&openid.return_to={return_to}",
            request.endpoint
        ))
    }

    fn form_markup(
        &self,
        request: &PendingAuthRequest,
        realm: &str,
        return_to: &str,
    ) -> Result<String, AuthError> {
        self.rendered.lock().unwrap().push(request.clone());
        Ok(format!(
            "<form method=\"post\" action=\"{}\">\
             <input type=\"hidden\" name=\"openid.realm\" value=\"{realm}\"/>\
             <input type=\"hidden\" name=\"openid.return_to\" value=\"{return_to}\"/>\
             </form><script>document.forms[0].submit();</script>",
            request.endpoint
        ))
    }

    async fn complete(
        &self,
        state: ProtocolState,
        _params: &HashMap<String, String>,
        _return_to: &str,
    ) -> Result<VerifyResponse, AuthError> {
        self.completed.lock().unwrap().push(state);
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => Err(AuthError::Verification(
                "mock consumer has no scripted response".to_owned(),
            )),
        }
    }
}
