//! HTTP transport seam
//!
//! The flows only ever need "GET this URL, give me the status and body";
//! keeping that behind a trait leaves timeout and retry policy to the
//! transport collaborator and lets tests substitute canned responses.

use async_trait::async_trait;

use crate::error::AuthError;

/// A provider response, reduced to what the flows inspect.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP collaborator.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Perform a GET and return the response regardless of status; the
    /// caller decides what a non-2xx means.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Transport`] only when no response could be read
    /// at all (connection failure, invalid URL at the transport layer).
    async fn get(&self, url: &str) -> Result<HttpResponse, AuthError>;
}

/// Default transport backed by a shared [`reqwest::Client`].
#[derive(Debug, Default, Clone)]
pub struct ReqwestFetch {
    client: reqwest::Client,
}

impl ReqwestFetch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an already-configured client (proxies, timeouts).
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetch {
    async fn get(&self, url: &str) -> Result<HttpResponse, AuthError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
