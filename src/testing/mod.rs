//! Testing utilities
//!
//! Mock collaborators and fixtures for exercising the flows without a
//! network or a real OpenID library. Available to integration tests through
//! the `testing` feature.

pub mod fixtures;
pub mod mock;

pub use fixtures::{ax_response, callback_params, facebook_provider, graph_profile_json};
pub use mock::{MockConsumer, MockFetch};
