use url::Url;

/// Per-request context carrying correlation and addressing information.
/// Threaded through orchestration and backend calls; links are resolved against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Correlation identifier, propagated in the `x-request-id` header.
    pub request_id: String,
    /// Base URL the API is served under. Always ends with `/`.
    pub base_url: Url,
    /// Full URL of the current request.
    pub url: Url,
}

impl RequestContext {
    /// Builds a context, normalising `base_url` to end with a trailing slash so relative
    /// route paths join underneath it instead of replacing its last segment.
    #[must_use]
    pub fn new(request_id: impl Into<String>, mut base_url: Url, url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            request_id: request_id.into(),
            base_url,
            url,
        }
    }
}
