use axum::response::{IntoResponse, Response};

use crate::{
    htmx::{html_escape, HtmlFragment, HtmxRequest},
    templates::TemplateResponse,
};

/// Shows which headers htmx sends. htmx requests get a one-line answer
/// naming the page they came from.
pub async fn headers_demo(hx: HtmxRequest) -> Response {
    if hx.is_htmx() {
        let current_url = hx.current_url().unwrap_or("unknown");
        return HtmlFragment(format!(
            "This is a response to a request sent by htmx from {}<br>",
            html_escape(current_url)
        ))
        .into_response();
    }

    TemplateResponse::new("headers.html", ()).into_response()
}

#[cfg(test)]
mod tests {
    use crate::htmx::HX_CURRENT_URL;
    use crate::testing::{body_string, get_request, htmx_get, test_app};
    use axum::http::{header::VARY, HeaderValue, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_htmx_request_gets_current_url_line() {
        let mut request = htmx_get("/headers/");
        request.headers_mut().insert(
            HX_CURRENT_URL,
            HeaderValue::from_static("http://localhost:8000/headers/"),
        );

        let response = test_app(0).await.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            "This is a response to a request sent by htmx from http://localhost:8000/headers/<br>"
        );
    }

    #[tokio::test]
    async fn test_missing_current_url_is_reported_as_unknown() {
        let response = test_app(0).await.oneshot(htmx_get("/headers/")).await.unwrap();
        assert!(body_string(response).await.ends_with("from unknown<br>"));
    }

    #[tokio::test]
    async fn test_response_varies_on_htmx_headers() {
        let response = test_app(0).await.oneshot(get_request("/headers/")).await.unwrap();
        let vary: Vec<_> = response.headers().get_all(VARY).iter().collect();
        assert_eq!(vary, ["hx-request, hx-target"]);
    }
}
