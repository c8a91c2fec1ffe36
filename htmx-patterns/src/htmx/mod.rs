//! htmx support: request classification, fragment selection and response helpers.
//!
//! ```rust,ignore
//! use htmx_patterns::htmx::{ForHtmx, HtmxRequest};
//!
//! async fn headers_demo(hx: HtmxRequest) -> impl IntoResponse {
//!     match hx.current_url() { /* ... */ }
//! }
//!
//! let route = ForHtmx::template("_page_and_paging_controls.html")
//!     .wraps(get(paging), templates.clone());
//! ```

mod classifier;
mod fragment;
mod responders;

pub use classifier::{is_htmx_request, HtmxRequest};
pub use fragment::{
    ForHtmx, ForHtmxBuilder, FragmentConfigError, FragmentError, FragmentMode, RequestParams,
    DEFAULT_BODY_LIMIT, USE_BLOCK_PARAM,
};
pub use responders::{html_escape, HtmlFragment, HxTriggerEvents, TriggerTiming};

// Header names and Vary responders from axum-htmx
pub use axum_htmx::{
    AutoVaryLayer, HxCurrentUrl, HxRequest, HxTarget, VaryHxRequest, VaryHxTarget,
    HX_CURRENT_URL, HX_REQUEST, HX_TARGET, HX_TRIGGER, HX_TRIGGER_AFTER_SETTLE,
    HX_TRIGGER_AFTER_SWAP,
};
