//! Small helpers shared across the flows

use url::Url;

use crate::error::AuthError;

/// Create a URL with the given query parameters encoded.
///
/// # Errors
///
/// Returns [`AuthError::InvalidUrl`] if the base is not a valid URL.
pub fn flat_url(base: &str, params: &[(&str, &str)]) -> Result<String, AuthError> {
    let url = Url::parse_with_params(base, params)?;
    Ok(url.to_string())
}
