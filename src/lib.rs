#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Federated authentication for relying applications.
//!
//! Two protocol flows — an OAuth2 authorization-code redirect flow
//! ([`oauth`]) and an OpenID 2.0 consumer with AX/SReg attribute extensions
//! ([`openid`]) — both ending in the same normalized [`Profile`]. The HTTP
//! transport, the per-browser session store, and the OpenID protocol
//! library are collaborators behind traits; the host web framework mounts
//! the flows however it likes and answers with the returned
//! [`LoginDirective`].

/// Version of the relyr library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod csrf;
pub mod error;
pub mod http;
pub mod models;
pub mod oauth;
pub mod openid;
pub mod profile;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod utils;

/// Re-export commonly used items
pub use error::AuthError;
pub use http::{HttpFetch, HttpResponse, ReqwestFetch};
pub use models::{Completion, Credentials, LoginDirective};
pub use oauth::{OAuth2Flow, OAuth2Provider};
pub use openid::consumer::{
    CheckStatus, OpenIdConsumer, PendingAuthRequest, ProtocolState, VerifyResponse,
};
pub use openid::hooks::{DefaultHooks, ProviderHooks};
pub use openid::schema::AxSchema;
pub use openid::{OpenIdFlow, OpenIdSettings};
pub use profile::Profile;
pub use session::{MemorySession, SessionStore};
