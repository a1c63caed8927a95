//! Shared test fixtures

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::oauth::OAuth2Provider;
use crate::openid::schema::AxSchema;

/// A Facebook provider wired with test credentials.
#[must_use]
pub fn facebook_provider() -> OAuth2Provider {
    OAuth2Provider::facebook(
        "test_client_id",
        "test_client_secret",
        "https://rp.example/login/facebook/callback",
        Some("email".to_owned()),
    )
}

/// The Graph `me` document used across the OAuth2 scenarios.
#[must_use]
pub fn graph_profile_json() -> Value {
    json!({
        "id": "100",
        "name": "Jane Doe",
        "link": "https://facebook.com/jane.doe",
        "email": "jane@example.com",
        "verified": true,
    })
}

/// Build callback parameters from key/value pairs.
#[must_use]
pub fn callback_params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

/// Build an AX response keyed by attribute URI from logical names.
///
/// # Panics
///
/// Panics when a logical name is not part of the AX schema.
#[must_use]
pub fn ax_response(schema: AxSchema, pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(name, value)| {
            let uri = schema
                .uri(name)
                .unwrap_or_else(|| panic!("unknown AX attribute {name}"));
            (uri.to_owned(), (*value).to_owned())
        })
        .collect()
}
