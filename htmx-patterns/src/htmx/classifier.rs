//! Classification of incoming requests by their htmx marker headers.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderName},
};
use axum_htmx::{HxCurrentUrl, HxRequest, HxTarget, HX_CURRENT_URL, HX_REQUEST, HX_TARGET};
use std::convert::Infallible;

/// Check if the current request is an htmx request based on headers.
///
/// Useful in middleware or where extractors aren't available.
#[must_use]
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.contains_key(HX_REQUEST)
}

/// What the htmx headers say about a request.
///
/// Usable as an extractor; it never rejects. As an extractor it is built from
/// the `axum-htmx` extractors, so an `AutoVaryLayer` sees it.
///
/// ```rust,ignore
/// async fn handler(hx: HtmxRequest) -> impl IntoResponse {
///     if hx.is_htmx() { /* fragment */ } else { /* full page */ }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmxRequest {
    is_htmx: bool,
    target: Option<String>,
    current_url: Option<String>,
}

impl HtmxRequest {
    /// Classify a request from its headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let text = |name: &HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self {
            is_htmx: is_htmx_request(headers),
            target: text(&HX_TARGET),
            current_url: text(&HX_CURRENT_URL),
        }
    }

    pub fn is_htmx(&self) -> bool {
        self.is_htmx
    }

    /// Value of `HX-Target`, if sent
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Value of `HX-Current-URL`, if sent
    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }
}

impl<S> FromRequestParts<S> for HtmxRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let HxRequest(is_htmx) = HxRequest::from_request_parts(parts, state).await?;
        let HxTarget(target) = HxTarget::from_request_parts(parts, state).await?;
        let HxCurrentUrl(current_url) = HxCurrentUrl::from_request_parts(parts, state).await?;

        Ok(Self {
            is_htmx,
            target,
            current_url: current_url.map(|uri| uri.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    #[test]
    fn test_is_htmx_request() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx_request(&headers));

        headers.insert(HX_REQUEST, HeaderValue::from_static("true"));
        assert!(is_htmx_request(&headers));
    }

    #[test]
    fn test_plain_request() {
        let hx = HtmxRequest::from_headers(&HeaderMap::new());
        assert!(!hx.is_htmx());
        assert_eq!(hx.target(), None);
        assert_eq!(hx.current_url(), None);
    }

    #[test]
    fn test_htmx_request_with_markers() {
        let mut headers = HeaderMap::new();
        headers.insert(HX_REQUEST, HeaderValue::from_static("true"));
        headers.insert(HX_TARGET, HeaderValue::from_static("monster-list"));
        headers.insert(
            HX_CURRENT_URL,
            HeaderValue::from_static("http://localhost:8000/headers/"),
        );

        let hx = HtmxRequest::from_headers(&headers);
        assert!(hx.is_htmx());
        assert_eq!(hx.target(), Some("monster-list"));
        assert_eq!(hx.current_url(), Some("http://localhost:8000/headers/"));
    }

    #[tokio::test]
    async fn test_extractor() {
        let request = Request::builder()
            .header("HX-Request", "true")
            .header("HX-Target", "page")
            .header("HX-Current-URL", "http://localhost:8000/headers/")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let hx = HtmxRequest::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(hx.is_htmx());
        assert_eq!(hx.target(), Some("page"));
        assert_eq!(hx.current_url(), Some("http://localhost:8000/headers/"));
    }
}
