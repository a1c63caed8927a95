//! OpenID attribute normalization
//!
//! Reconciles the two attribute extensions a provider may answer with —
//! Attribute Exchange (keyed by URI) and Simple Registration (keyed by short
//! field name) — into the canonical profile. AX wins whenever it has a
//! value; SReg is only consulted for fields its vocabulary defines.

use std::collections::HashMap;

use serde_json::json;

use crate::openid::schema::{sreg_field, AxSchema};
use crate::profile::Profile;

/// Uniform accessor over Simple Registration and Attribute Exchange values.
pub struct AttribAccess<'a> {
    sreg: &'a HashMap<String, String>,
    ax: &'a HashMap<String, String>,
    schema: AxSchema,
}

impl<'a> AttribAccess<'a> {
    #[must_use]
    pub fn new(
        sreg: &'a HashMap<String, String>,
        ax: &'a HashMap<String, String>,
        schema: AxSchema,
    ) -> Self {
        Self { sreg, ax, schema }
    }

    /// Get a value by logical attribute name, AX first, then SReg.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.lookup(key, false)
    }

    /// Get a value from AX only, never falling back to SReg. Used where the
    /// weaker SReg attestation is not wanted (verified-email trust).
    #[must_use]
    pub fn get_ax_only(&self, key: &str) -> Option<&'a str> {
        self.lookup(key, true)
    }

    fn lookup(&self, key: &str, ax_only: bool) -> Option<&'a str> {
        let ax_value = self
            .schema
            .uri(key)
            .and_then(|uri| self.ax.get(uri))
            .map(String::as_str)
            .filter(|v| !v.is_empty());
        if ax_value.is_some() {
            return ax_value;
        }
        if ax_only {
            return None;
        }

        // Translate to the SReg vocabulary; names it cannot express are
        // never looked up.
        let field = sreg_field(key)?;
        self.sreg
            .get(field)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Which identity provider an OpenID identifier belongs to.
///
/// Inferred by substring match on the identity URL; selects username
/// derivation and email-verification trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenIdProvider {
    Google,
    Yahoo,
    Generic,
}

impl OpenIdProvider {
    fn classify(identifier: &str) -> Self {
        if identifier.contains("google.com") {
            OpenIdProvider::Google
        } else if identifier.contains("yahoo.com") {
            OpenIdProvider::Yahoo
        } else {
            OpenIdProvider::Generic
        }
    }

    fn name(self) -> &'static str {
        match self {
            OpenIdProvider::Google => "Google",
            OpenIdProvider::Yahoo => "Yahoo",
            OpenIdProvider::Generic => "OpenID",
        }
    }

    /// Google and Yahoo verify email addresses before releasing them.
    fn verifies_email(self) -> bool {
        matches!(self, OpenIdProvider::Google | OpenIdProvider::Yahoo)
    }
}

const NAME_PARTS: [(&str, &str); 5] = [
    ("name_prefix", "honorificPrefix"),
    ("first_name", "givenName"),
    ("middle_name", "middleName"),
    ("last_name", "familyName"),
    ("name_suffix", "honorificSuffix"),
];

/// Normalize a combined AX + SReg response into a canonical profile.
#[must_use]
pub fn openid_profile(
    identifier: &str,
    sreg: &HashMap<String, String>,
    ax: &HashMap<String, String>,
    schema: AxSchema,
) -> Profile {
    let attribs = AttribAccess::new(sreg, ax, schema);
    let provider = OpenIdProvider::classify(identifier);

    let mut profile = Profile::new();
    profile.insert("identifier", identifier);
    profile.insert("providerName", provider.name());

    // Google supplies no usable nickname; derive the username from the
    // email's local part instead.
    if provider == OpenIdProvider::Google {
        let username = attribs
            .get("email")
            .and_then(|email| email.split('@').next());
        profile.insert_opt("preferredUsername", username);
    } else {
        profile.insert_opt("preferredUsername", attribs.get("nickname"));
    }

    if provider.verifies_email() {
        profile.insert_opt("verifiedEmail", attribs.get_ax_only("email"));
    } else {
        profile.insert_opt("emails", attribs.get("email").map(|e| json!([e])));
    }

    // Assemble the name from discrete parts; fall back to the full-name
    // attribute when no parts were released.
    let mut name = serde_json::Map::new();
    let mut full_name_vals: Vec<&str> = Vec::new();
    for (part, canonical) in NAME_PARTS {
        if let Some(val) = attribs.get(part) {
            full_name_vals.push(val);
            name.insert(canonical.to_owned(), json!(val));
        }
    }
    let mut full_name = full_name_vals.join(" ").trim().to_owned();
    if full_name.is_empty() {
        full_name = attribs.get("full_name").unwrap_or_default().to_owned();
    }
    if !full_name.is_empty() {
        name.insert("formatted".to_owned(), json!(full_name));
    }

    let display_name = if full_name.is_empty() {
        profile.get_str("preferredUsername").map(ToOwned::to_owned)
    } else {
        Some(full_name)
    };
    profile.insert("name", name);
    profile.insert_opt("displayName", display_name);

    profile.insert_opt("urls", attribs.get("web").map(|w| json!([w])));
    profile.insert_opt("gender", attribs.get("gender"));
    profile.insert_opt("birthday", attribs.get("birthday"));

    profile.compact();
    profile
}
