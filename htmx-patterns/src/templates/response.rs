//! Deferred template responses.
//!
//! Handlers return a [`TemplateResponse`]: a template name plus its context,
//! not yet rendered. Route layers such as the htmx fragment selector can still
//! swap the template or pick blocks out of it. Rendering happens last, in the
//! router-wide [`render_deferred`] middleware.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use minijinja::Value;
use serde::Serialize;

use super::Templates;
use crate::error::Result;

/// A template render that has not happened yet.
#[derive(Debug, Clone)]
pub struct TemplateResponse {
    template: String,
    context: Value,
    status: StatusCode,
    headers: HeaderMap,
}

impl TemplateResponse {
    /// Create a deferred render of `template` with `context`.
    #[must_use]
    pub fn new(template: impl Into<String>, context: impl Serialize) -> Self {
        Self {
            template: template.into(),
            context: Value::from_serialize(context),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
        }
    }

    /// Set the HTTP status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Add a response header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn template_name(&self) -> &str {
        &self.template
    }

    /// Replace the template, keeping context, status and headers.
    pub fn set_template_name(&mut self, template: impl Into<String>) {
        self.template = template.into();
    }

    pub fn context(&self) -> &Value {
        &self.context
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Render the whole template into a finalized response.
    pub fn render(self, templates: &Templates) -> Result<Response> {
        let html = templates.render(&self.template, &self.context)?;
        Ok(finalize(html, self.status, self.headers))
    }

    /// Render only the given blocks, concatenated, into a finalized response.
    pub fn render_blocks(self, templates: &Templates, blocks: &[String]) -> Result<Response> {
        let html = templates.render_blocks(&self.template, blocks, &self.context)?;
        Ok(finalize(html, self.status, self.headers))
    }
}

fn finalize(html: String, status: StatusCode, headers: HeaderMap) -> Response {
    let mut response = (status, Html(html)).into_response();
    response.headers_mut().extend(headers);
    response
}

/// Response extension carrying a render that still has to happen.
#[derive(Debug, Clone)]
pub struct DeferredTemplate(pub TemplateResponse);

impl IntoResponse for TemplateResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response.extensions_mut().insert(DeferredTemplate(self));
        response
    }
}

/// What a view produced: a deferred template render or a finalized response.
#[derive(Debug)]
pub enum ViewResponse {
    Template(TemplateResponse),
    Response(Response),
}

impl ViewResponse {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Template(_))
    }
}

impl From<TemplateResponse> for ViewResponse {
    fn from(template: TemplateResponse) -> Self {
        Self::Template(template)
    }
}

impl From<Response> for ViewResponse {
    /// Recover a deferred render from a response produced by
    /// [`TemplateResponse::into_response`]. Headers and status added by
    /// layers in between are kept.
    fn from(mut response: Response) -> Self {
        match response.extensions_mut().remove::<DeferredTemplate>() {
            Some(DeferredTemplate(mut template)) => {
                template.status = response.status();
                template.headers = std::mem::take(response.headers_mut());
                template.headers.remove(header::CONTENT_LENGTH);
                Self::Template(template)
            }
            None => Self::Response(response),
        }
    }
}

impl IntoResponse for ViewResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Template(template) => template.into_response(),
            Self::Response(response) => response,
        }
    }
}

/// Middleware rendering any template response that is still deferred.
pub async fn render_deferred(
    State(templates): State<Templates>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    match ViewResponse::from(response) {
        ViewResponse::Template(template) => {
            let name = template.template_name().to_string();
            match template.render(&templates) {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(template = %name, "Failed to render template: {}", e);
                    e.into_response()
                }
            }
        }
        ViewResponse::Response(response) => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware::from_fn_with_state, routing::get, Router};
    use minijinja::context;
    use tower::ServiceExt;

    fn templates() -> Templates {
        Templates::from_sources([("hello.html", "Hello {{ name }}!")]).unwrap()
    }

    #[test]
    fn test_into_response_round_trips_through_extension() {
        let response = TemplateResponse::new("hello.html", context! { name => "Boris" })
            .with_status(StatusCode::CREATED)
            .with_header(HeaderName::from_static("x-demo"), HeaderValue::from_static("1"))
            .into_response();

        match ViewResponse::from(response) {
            ViewResponse::Template(t) => {
                assert_eq!(t.template_name(), "hello.html");
                assert_eq!(t.status(), StatusCode::CREATED);
                assert_eq!(t.headers()["x-demo"], "1");
            }
            ViewResponse::Response(_) => panic!("expected a deferred template"),
        }
    }

    #[test]
    fn test_plain_response_is_finalized() {
        let view = ViewResponse::from(Html("done").into_response());
        assert!(!view.is_deferred());
    }

    #[tokio::test]
    async fn test_render_deferred_middleware() {
        let app = Router::new()
            .route(
                "/",
                get(|| async { TemplateResponse::new("hello.html", context! { name => "Agnes" }) }),
            )
            .layer(from_fn_with_state(templates(), render_deferred));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Hello Agnes!");
    }

    #[tokio::test]
    async fn test_missing_template_is_a_server_error() {
        let app = Router::new()
            .route("/", get(|| async { TemplateResponse::new("missing.html", ()) }))
            .layer(from_fn_with_state(templates(), render_deferred));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
