//! Static attribute schema tables
//!
//! Immutable lookup tables for the two OpenID attribute extensions: the AX
//! attribute URIs we request (in both the axschema.org namespace and the
//! older schema.openid.net one some providers still speak), the fixed SReg
//! field set, and the AX-to-SReg name translation used when falling back.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Logical attribute names, in the order we request them.
pub const ATTRIBUTE_NAMES: [&str; 15] = [
    "nickname",
    "email",
    "full_name",
    "birthday",
    "gender",
    "postal_code",
    "country",
    "timezone",
    "language",
    "name_prefix",
    "first_name",
    "last_name",
    "middle_name",
    "name_suffix",
    "web",
];

static AX_ATTRIBUTES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("nickname", "http://axschema.org/namePerson/friendly"),
        ("email", "http://axschema.org/contact/email"),
        ("full_name", "http://axschema.org/namePerson"),
        ("birthday", "http://axschema.org/birthDate"),
        ("gender", "http://axschema.org/person/gender"),
        ("postal_code", "http://axschema.org/contact/postalCode/home"),
        ("country", "http://axschema.org/contact/country/home"),
        ("timezone", "http://axschema.org/pref/timezone"),
        ("language", "http://axschema.org/pref/language"),
        ("name_prefix", "http://axschema.org/namePerson/prefix"),
        ("first_name", "http://axschema.org/namePerson/first"),
        ("last_name", "http://axschema.org/namePerson/last"),
        ("middle_name", "http://axschema.org/namePerson/middle"),
        ("name_suffix", "http://axschema.org/namePerson/suffix"),
        ("web", "http://axschema.org/contact/web/default"),
    ])
});

static ALTERNATE_AX_ATTRIBUTES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("nickname", "http://schema.openid.net/namePerson/friendly"),
        ("email", "http://schema.openid.net/contact/email"),
        ("full_name", "http://schema.openid.net/namePerson"),
        ("birthday", "http://schema.openid.net/birthDate"),
        ("gender", "http://schema.openid.net/person/gender"),
        (
            "postal_code",
            "http://schema.openid.net/contact/postalCode/home",
        ),
        ("country", "http://schema.openid.net/contact/country/home"),
        ("timezone", "http://schema.openid.net/pref/timezone"),
        ("language", "http://schema.openid.net/pref/language"),
        ("name_prefix", "http://schema.openid.net/namePerson/prefix"),
        ("first_name", "http://schema.openid.net/namePerson/first"),
        ("last_name", "http://schema.openid.net/namePerson/last"),
        ("middle_name", "http://schema.openid.net/namePerson/middle"),
        ("name_suffix", "http://schema.openid.net/namePerson/suffix"),
        ("web", "http://schema.openid.net/contact/web/default"),
    ])
});

/// AX logical names whose SReg equivalent is spelled differently.
static AX_TO_SREG: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("full_name", "fullname"),
        ("birthday", "dob"),
        ("postal_code", "postcode"),
    ])
});

/// The fields Simple Registration defines; anything else is never looked up
/// in an SReg response.
pub const SREG_FIELDS: [&str; 9] = [
    "nickname", "email", "fullname", "dob", "gender", "postcode", "country", "language", "timezone",
];

/// Which AX attribute namespace to request and resolve against.
///
/// Selected by configuration: most providers speak axschema.org, a few only
/// answer the older schema.openid.net URIs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AxSchema {
    #[default]
    AxSchemaOrg,
    OpenIdNet,
}

impl AxSchema {
    /// The logical-name-to-URI table for this namespace.
    #[must_use]
    pub fn attributes(self) -> &'static HashMap<&'static str, &'static str> {
        match self {
            AxSchema::AxSchemaOrg => &AX_ATTRIBUTES,
            AxSchema::OpenIdNet => &ALTERNATE_AX_ATTRIBUTES,
        }
    }

    /// The attribute URI for a logical name, if the schema defines one.
    #[must_use]
    pub fn uri(self, name: &str) -> Option<&'static str> {
        self.attributes().get(name).copied()
    }

    /// The full fetch list, in request order.
    #[must_use]
    pub fn fetch_uris(self) -> Vec<&'static str> {
        ATTRIBUTE_NAMES
            .iter()
            .filter_map(|name| self.uri(name))
            .collect()
    }
}

/// Translate an AX logical name to its SReg field name, when the SReg
/// vocabulary defines one. Returns `None` for names SReg cannot express.
#[must_use]
pub fn sreg_field(ax_name: &str) -> Option<&'static str> {
    let translated = AX_TO_SREG.get(ax_name).copied();
    let candidate = translated.unwrap_or(ax_name);
    SREG_FIELDS
        .iter()
        .find(|field| **field == candidate)
        .copied()
}
