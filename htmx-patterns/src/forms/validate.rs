//! Re-validation of a single form field for htmx.
//!
//! Field rows rendered with `do_htmx_validation` send
//! `GET <same url>?<whole form>&_validate_field=<name>` when they lose focus.
//! The wrapped route answers those with just the re-rendered row; every other
//! request reaches the view.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::{from_fn_with_state, Next},
    response::{Html, IntoResponse, Response},
    routing::MethodRouter,
};

use super::{render_field_row, FormData, ValidatedForm};
use crate::htmx::{is_htmx_request, VaryHxRequest};
use crate::templates::Templates;

/// Query parameter naming the field to re-validate
pub const VALIDATE_FIELD_PARAM: &str = "_validate_field";

/// Wrap `route` so htmx single-field validation requests are answered with
/// the row of that field, validated as part of form `F`.
///
/// ```rust,ignore
/// let route = validate_field_layer::<MonsterForm, _>(
///     get(form_validation).post(form_validation),
///     templates.clone(),
/// );
/// ```
pub fn validate_field_layer<F, S>(route: MethodRouter<S>, templates: Templates) -> MethodRouter<S>
where
    F: ValidatedForm,
    S: Clone + Send + Sync + 'static,
{
    route.layer(from_fn_with_state(templates, validate_field::<F>))
}

async fn validate_field<F: ValidatedForm>(
    State(templates): State<Templates>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::GET && is_htmx_request(request.headers()) {
        let data = FormData::parse(request.uri().query().unwrap_or_default());
        if let Some(field) = data.get(VALIDATE_FIELD_PARAM).filter(|f| !f.is_empty()) {
            let mut form = F::bind(&data);
            let valid = form.is_valid();
            tracing::debug!(field = %field, form_valid = valid, "Single field validation");
            return match render_field_row(form.form(), field, &templates) {
                Ok(html) => (VaryHxRequest, Html(html)).into_response(),
                Err(e) => e.into_response(),
            };
        }
    }
    next.run(request).await
}
