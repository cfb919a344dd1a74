//! Shared helpers used across dump operations and sources.

use url::Url;

use super::source::DEFAULT_BASE_URL;
use super::{BaseUrl, DumpUrl, TransportError};

/// Trim trailing slashes and fall back to the default dump endpoint.
pub(crate) fn sanitise_base_url(url: impl Into<String>) -> BaseUrl {
    let raw = url.into();
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        BaseUrl::from(DEFAULT_BASE_URL)
    } else {
        BaseUrl::new(trimmed.to_owned())
    }
}

/// Join a file name onto the base URL.
pub(crate) fn file_url(base_url: &BaseUrl, file_name: &str) -> Result<DumpUrl, TransportError> {
    let absolute = format!("{}/{}", base_url.as_ref(), file_name.trim_start_matches('/'));
    Url::parse(&absolute)
        .map(Into::into)
        .map_err(|source| TransportError::InvalidUrl {
            url: absolute,
            source,
        })
}
