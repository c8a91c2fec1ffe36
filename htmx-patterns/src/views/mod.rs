//! Page handlers and the application router.
//!
//! Views build a template context and return a deferred
//! [`TemplateResponse`](crate::templates::TemplateResponse). Routes wrapped
//! with [`ForHtmx`] or [`validate_field_layer`] may narrow that to a fragment
//! for htmx; whatever is still deferred at the end is rendered by
//! [`render_deferred`].

mod actions;
mod assets;
mod headers;
mod home;
mod modals;
mod partials;
mod posts;
mod restarts;
mod validation;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use axum_htmx::AutoVaryLayer;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    error::Result,
    forms::{validate_field_layer, MonsterForm},
    health::health,
    htmx::ForHtmx,
    models::Monster,
    pagination::{Page, Paginator},
    session::create_memory_session_layer,
    state::AppState,
    store::Ordering,
    templates::render_deferred,
};

pub use partials::{PAGE_PARTIAL_TEMPLATE, PAGING_BLOCK};

/// Build the application router with every demo page.
///
/// # Errors
///
/// Fails when a fragment selector is misconfigured.
pub fn router(state: AppState) -> Result<Router> {
    let templates = state.templates().clone();
    let body_limit = state.config().body_limit_bytes();

    let inline_paging = ForHtmx::builder().blocks([PAGING_BLOCK]).build()?;

    let app = Router::new()
        .route("/", get(home::home))
        .route("/headers/", get(headers::headers_demo))
        .route("/simple-post-form/", get(posts::simple_post_form))
        .route("/post-without-form/", get(posts::post_without_form))
        .route("/post-form-endpoint/", post(posts::post_form_endpoint))
        .route(
            "/toggle-with-separate-partials/",
            get(partials::toggle_with_separate_partials),
        )
        .route("/toggle-item/{monster_id}/", post(partials::toggle_item))
        .route(
            "/paging-with-separate-partials/",
            get(partials::paging_with_separate_partials),
        )
        .route(
            "/paging-with-separate-partials-improved/",
            ForHtmx::template(PAGE_PARTIAL_TEMPLATE).wraps(
                get(partials::paging_with_separate_partials_improved),
                templates.clone(),
            ),
        )
        .route(
            "/paging-with-inline-partials/",
            get(partials::paging_with_inline_partials),
        )
        .route(
            "/paging-with-inline-partials-improved/",
            inline_paging.clone().wraps(
                get(partials::paging_with_inline_partials_improved),
                templates.clone(),
            ),
        )
        .route(
            "/paging-with-inline-partials-improved-lob/",
            inline_paging.wraps(
                get(partials::paging_with_inline_partials_improved_lob),
                templates.clone(),
            ),
        )
        .route(
            "/multiple-actions/{monster_id}/",
            ForHtmx::block_from_request().body_limit(body_limit).wraps(
                get(actions::multiple_actions).post(actions::multiple_actions_post),
                templates.clone(),
            ),
        )
        .route(
            "/view-restart/",
            ForHtmx::block_from_request().body_limit(body_limit).wraps(
                get(restarts::view_restart).post(restarts::view_restart_post),
                templates.clone(),
            ),
        )
        .route(
            "/modals-main/",
            ForHtmx::block_from_request()
                .body_limit(body_limit)
                .wraps(get(modals::main), templates.clone()),
        )
        .route(
            "/modals-create-monster/",
            ForHtmx::block_from_request().body_limit(body_limit).wraps(
                get(modals::create_monster_form).post(modals::create_monster),
                templates.clone(),
            ),
        )
        .route(
            "/form-validation/",
            validate_field_layer::<MonsterForm, _>(
                get(validation::form_validation).post(validation::form_validation_post),
                templates.clone(),
            ),
        )
        .route("/static/{*path}", get(assets::static_asset))
        .route("/health", get(health))
        .layer(from_fn_with_state(templates, render_deferred))
        .layer(AutoVaryLayer)
        .layer(create_memory_session_layer(&state.config().session))
        .with_state(state);

    Ok(app)
}

/// Local calendar date used for age checks
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// `?page=` of the paging demos; kept raw so garbage falls back to page 1
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageQuery {
    pub page: Option<String>,
}

/// The requested page of all monsters, in id order.
pub(crate) async fn monster_page(state: &AppState, raw_page: Option<&str>) -> Result<Page<Monster>> {
    let monsters = state.store().list(Ordering::ById).await?;
    let paginator = Paginator::new(monsters, state.config().pagination.per_page);
    Ok(paginator.get_page(raw_page)?)
}
