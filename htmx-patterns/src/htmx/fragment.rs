//! Fragment selection for htmx requests.
//!
//! A view always produces the full page as a deferred [`TemplateResponse`].
//! [`ForHtmx`] wraps the route and, when the request comes from htmx, either
//! swaps in a different template or renders only some named blocks of the
//! page template. Everything else passes through untouched.
//!
//! ```rust,ignore
//! let paging = ForHtmx::blocks(["page_and_paging_controls"])
//!     .wraps(get(paging_with_inline_partials_improved), templates.clone());
//!
//! let actions = ForHtmx::block_from_request()
//!     .wraps(get(multiple_actions).post(multiple_actions), templates.clone());
//! ```

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{Request, State},
    http::Method,
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use axum_htmx::{
    VaryHxRequest, VaryHxTarget, HX_TRIGGER, HX_TRIGGER_AFTER_SETTLE, HX_TRIGGER_AFTER_SWAP,
};
use std::sync::Arc;

use super::classifier::HtmxRequest;
use crate::error::{Error, Result};
use crate::templates::{Templates, ViewResponse};

/// Query/body parameter naming the blocks to render
pub const USE_BLOCK_PARAM: &str = "use_block";

/// Largest form body read for `use_block` unless [`ForHtmx::body_limit`] says otherwise
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// What to render for an htmx request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentMode {
    /// Render this template instead, with the same context
    WholeTemplate(String),
    /// Render these blocks of the page template, concatenated in order
    NamedBlocks(Vec<String>),
    /// Render the blocks named by the `use_block` request parameter
    BlockFromRequest,
}

/// Misconfiguration detected while building a [`ForHtmx`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FragmentConfigError {
    #[error("one of template, blocks or block_from_request must be set")]
    NoMode,

    #[error("only one of template, blocks or block_from_request may be set")]
    ConflictingModes,
}

/// Fragment selection applied to a response it cannot modify.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FragmentError {
    /// The view returned a finalized response instead of a deferred template
    /// render. A render that already happened is finalized too.
    #[error("cannot modify a response that is not a deferred template render")]
    NotDeferred,
}

/// Fragment selector configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForHtmx {
    mode: FragmentMode,
    if_hx_target: Option<String>,
    body_limit: usize,
}

impl ForHtmx {
    /// Replace the template for htmx requests.
    pub fn template(name: impl Into<String>) -> Self {
        Self::with_mode(FragmentMode::WholeTemplate(name.into()))
    }

    /// Render only `names` for htmx requests. An empty list renders an empty body.
    pub fn blocks<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_mode(FragmentMode::NamedBlocks(
            names.into_iter().map(Into::into).collect(),
        ))
    }

    /// Render the blocks the client asks for with `use_block`.
    pub fn block_from_request() -> Self {
        Self::with_mode(FragmentMode::BlockFromRequest)
    }

    fn with_mode(mode: FragmentMode) -> Self {
        Self {
            mode,
            if_hx_target: None,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Only act when `HX-Target` equals `target`.
    #[must_use]
    pub fn if_hx_target(mut self, target: impl Into<String>) -> Self {
        self.if_hx_target = Some(target.into());
        self
    }

    /// Cap on the request body read to find `use_block`.
    #[must_use]
    pub fn body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    pub fn builder() -> ForHtmxBuilder {
        ForHtmxBuilder::default()
    }

    pub fn mode(&self) -> &FragmentMode {
        &self.mode
    }

    pub fn target_filter(&self) -> Option<&str> {
        self.if_hx_target.as_deref()
    }

    /// Decide what to send back for a view's result.
    pub fn apply(
        &self,
        hx: &HtmxRequest,
        params: &RequestParams,
        response: ViewResponse,
        templates: &Templates,
    ) -> Result<ViewResponse> {
        if !hx.is_htmx() {
            return Ok(response);
        }

        if let Some(expected) = &self.if_hx_target {
            if hx.target() != Some(expected.as_str()) {
                tracing::debug!(expected = %expected, actual = ?hx.target(), "HX-Target differs, passing through");
                return Ok(response);
            }
        }

        if let ViewResponse::Response(r) = &response {
            if is_event_only(r) {
                return Ok(response);
            }
        }

        let blocks = match &self.mode {
            FragmentMode::WholeTemplate(name) => {
                let ViewResponse::Template(mut template) = response else {
                    return Err(FragmentError::NotDeferred.into());
                };
                tracing::debug!(from = %template.template_name(), to = %name, "Swapping template for htmx");
                template.set_template_name(name.clone());
                return Ok(ViewResponse::Template(template));
            }
            FragmentMode::NamedBlocks(blocks) => blocks.clone(),
            FragmentMode::BlockFromRequest => {
                let requested = params.use_block_values();
                if requested.is_empty() {
                    if params.is_mutating() {
                        return Err(Error::BadRequest(format!(
                            "{USE_BLOCK_PARAM} is required for {} htmx requests",
                            params.method
                        )));
                    }
                    return Ok(response);
                }
                requested
            }
        };

        let ViewResponse::Template(template) = response else {
            return Err(FragmentError::NotDeferred.into());
        };
        tracing::debug!(template = %template.template_name(), blocks = ?blocks, "Rendering blocks for htmx");
        Ok(ViewResponse::Response(template.render_blocks(templates, &blocks)?))
    }

    /// Wrap a route so its responses go through [`ForHtmx::apply`].
    ///
    /// Adds `Vary: HX-Request` (and `HX-Target` when a target filter is set)
    /// since the same URL serves different bodies.
    pub fn wraps<S>(self, route: MethodRouter<S>, templates: Templates) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let state = Arc::new(FragmentLayer {
            config: self,
            templates,
        });
        route.layer(from_fn_with_state(state, select_fragment))
    }
}

/// Builder taking each knob separately; [`ForHtmxBuilder::build`] checks
/// that exactly one mode was chosen.
#[derive(Debug, Clone, Default)]
pub struct ForHtmxBuilder {
    template: Option<String>,
    blocks: Option<Vec<String>>,
    block_from_request: bool,
    if_hx_target: Option<String>,
}

impl ForHtmxBuilder {
    #[must_use]
    pub fn template(mut self, name: impl Into<String>) -> Self {
        self.template = Some(name.into());
        self
    }

    #[must_use]
    pub fn blocks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocks = Some(names.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn block_from_request(mut self, enabled: bool) -> Self {
        self.block_from_request = enabled;
        self
    }

    #[must_use]
    pub fn if_hx_target(mut self, target: impl Into<String>) -> Self {
        self.if_hx_target = Some(target.into());
        self
    }

    pub fn build(self) -> std::result::Result<ForHtmx, FragmentConfigError> {
        let blocks = self.blocks.filter(|b| !b.is_empty());
        let chosen = usize::from(self.template.is_some())
            + usize::from(blocks.is_some())
            + usize::from(self.block_from_request);

        let mode = match (chosen, self.template, blocks) {
            (0, _, _) => return Err(FragmentConfigError::NoMode),
            (1, Some(template), _) => FragmentMode::WholeTemplate(template),
            (1, _, Some(blocks)) => FragmentMode::NamedBlocks(blocks),
            (1, _, _) => FragmentMode::BlockFromRequest,
            _ => return Err(FragmentConfigError::ConflictingModes),
        };

        Ok(ForHtmx {
            mode,
            if_hx_target: self.if_hx_target,
            body_limit: DEFAULT_BODY_LIMIT,
        })
    }
}

/// The parts of a request that block selection looks at.
#[derive(Debug, Clone)]
pub struct RequestParams {
    pub method: Method,
    pub query: Option<String>,
    /// urlencoded body, when it was read
    pub body: Option<Bytes>,
}

impl RequestParams {
    pub fn new(method: Method, query: Option<&str>, body: Option<Bytes>) -> Self {
        Self {
            method,
            query: query.map(str::to_string),
            body,
        }
    }

    /// POST, PUT, PATCH and DELETE
    pub fn is_mutating(&self) -> bool {
        is_mutating(&self.method)
    }

    /// `use_block` values from the query string, or from the body on
    /// mutating requests when the query has none. Order is preserved.
    pub fn use_block_values(&self) -> Vec<String> {
        let from_query = self
            .query
            .as_deref()
            .map(|q| values_named(q, USE_BLOCK_PARAM))
            .unwrap_or_default();
        if !from_query.is_empty() || !self.is_mutating() {
            return from_query;
        }

        self.body
            .as_ref()
            .and_then(|b| std::str::from_utf8(b).ok())
            .map(|b| values_named(b, USE_BLOCK_PARAM))
            .unwrap_or_default()
    }
}

fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn values_named(encoded: &str, name: &str) -> Vec<String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(encoded)
        .unwrap_or_default()
        .into_iter()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value)
        .collect()
}

/// Empty body plus an htmx event header: the view only wants to fire
/// client-side events.
fn is_event_only(response: &Response) -> bool {
    let headers = response.headers();
    let has_event = headers.contains_key(HX_TRIGGER)
        || headers.contains_key(HX_TRIGGER_AFTER_SETTLE)
        || headers.contains_key(HX_TRIGGER_AFTER_SWAP);
    has_event && response.body().size_hint().exact() == Some(0)
}

struct FragmentLayer {
    config: ForHtmx,
    templates: Templates,
}

async fn select_fragment(
    State(layer): State<Arc<FragmentLayer>>,
    request: Request,
    next: Next,
) -> Response {
    let hx = HtmxRequest::from_headers(request.headers());
    let method = request.method().clone();
    let query = request.uri().query().map(str::to_string);

    let needs_body = hx.is_htmx()
        && layer.config.mode == FragmentMode::BlockFromRequest
        && is_mutating(&method);

    // Block names may live in the form body, which the view also needs.
    let (request, body) = if needs_body {
        let (parts, body) = request.into_parts();
        let limit = layer.config.body_limit;
        if body.size_hint().lower() > limit as u64 {
            return Error::PayloadTooLarge(format!("Request body exceeds {limit} bytes"))
                .into_response();
        }
        let bytes = match axum::body::to_bytes(body, limit).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return Error::BadRequest(format!("Could not read request body: {e}"))
                    .into_response()
            }
        };
        (
            Request::from_parts(parts, Body::from(bytes.clone())),
            Some(bytes),
        )
    } else {
        (request, None)
    };

    let params = RequestParams {
        method,
        query,
        body,
    };

    let response = next.run(request).await;
    let response = match layer
        .config
        .apply(&hx, &params, ViewResponse::from(response), &layer.templates)
    {
        Ok(view) => view.into_response(),
        Err(e) => e.into_response(),
    };

    if layer.config.if_hx_target.is_some() {
        (VaryHxRequest, VaryHxTarget, response).into_response()
    } else {
        (VaryHxRequest, response).into_response()
    }
}
