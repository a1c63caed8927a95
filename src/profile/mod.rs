//! Canonical profile and attribute normalization
//!
//! Both flows end in the same place: a [`Profile`], a flat map of
//! Portable-Contacts-style fields assembled from whatever the provider
//! supplied. The two extraction paths live in submodules:
//! [`openid`] reconciles AX and SReg extension payloads, [`facebook`]
//! handles the Graph-shaped JSON document of the OAuth2 flow.

pub mod facebook;
pub mod openid;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use facebook::{facebook_profile, ProfileError};
pub use openid::{openid_profile, AttribAccess};

/// A normalized identity record.
///
/// Keys follow the canonical schema (`identifier`, `providerName`,
/// `displayName`, `preferredUsername`, `name`, `emails`/`verifiedEmail`,
/// `gender`, `birthday`, `utcOffset`, `urls`, `accounts`). After
/// [`compaction`](Profile::compact) no key holds an empty string, empty
/// list, empty map, or boolean `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw field value. Empty or false values are allowed here and
    /// removed later by [`compact`](Profile::compact).
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_owned(), value.into());
    }

    /// Insert a field only when the value is present.
    pub fn insert_opt(&mut self, key: &str, value: Option<impl Into<Value>>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Convenience accessor for string-valued fields.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Strip every key whose value is an empty string, empty list, empty
    /// map, boolean `false`, or a list whose first element is such.
    ///
    /// Known consequence, preserved on purpose: a boolean `false` used to
    /// signal "email present but unverified" is indistinguishable from "no
    /// value" and is always stripped, so `verifiedEmail` only ever appears
    /// as a string or not at all.
    pub fn compact(&mut self) {
        self.0.retain(|_, value| !is_empty_value(value));
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty() || is_empty_value(&items[0]),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
