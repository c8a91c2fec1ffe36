//! Partial re-rendering: a toggle list and five versions of the same
//! paging page, from hand-written htmx checks to [`ForHtmx`](crate::htmx::ForHtmx).

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use minijinja::context;

use super::{monster_page, PageQuery};
use crate::{
    error::Result,
    htmx::{HtmlFragment, HtmxRequest},
    models::{MonsterId, Transition},
    state::AppState,
    store::{transition, Ordering},
    templates::TemplateResponse,
};

/// Page list plus paging controls, as a template of its own
pub const PAGE_PARTIAL_TEMPLATE: &str = "_page_and_paging_controls.html";
/// Block holding the page list plus paging controls in the inline templates
pub const PAGING_BLOCK: &str = "page_and_paging_controls";

const TOGGLE_LIST_URL: &str = "/toggle-with-separate-partials/";
const SEPARATE_PAGING_TEMPLATE: &str = "paging_with_separate_partials.html";
const INLINE_PAGING_TEMPLATE: &str = "paging_with_inline_partials.html";
const INLINE_PAGING_LOB_TEMPLATE: &str = "paging_with_inline_partials_improved_lob.html";

pub async fn toggle_with_separate_partials(
    State(state): State<AppState>,
) -> Result<TemplateResponse> {
    let monsters = state.store().list(Ordering::ById).await?;
    Ok(TemplateResponse::new(
        "toggle_with_separate_partials.html",
        context! { monsters },
    ))
}

/// Flip a monster's mood. htmx gets the re-rendered list item, plain form
/// posts are redirected back to the list.
pub async fn toggle_item(
    State(state): State<AppState>,
    hx: HtmxRequest,
    Path(monster_id): Path<MonsterId>,
) -> Result<Response> {
    let monster = transition(state.store(), monster_id, Transition::Toggle).await?;
    tracing::info!(monster_id, is_happy = monster.is_happy, "Toggled monster");

    if !hx.is_htmx() {
        return Ok(Redirect::to(TOGGLE_LIST_URL).into_response());
    }
    Ok(TemplateResponse::new("_toggle_item_partial.html", context! { monster }).into_response())
}

/// Picks the partial template by hand.
pub async fn paging_with_separate_partials(
    State(state): State<AppState>,
    hx: HtmxRequest,
    Query(query): Query<PageQuery>,
) -> Result<TemplateResponse> {
    let template = if hx.is_htmx() {
        PAGE_PARTIAL_TEMPLATE
    } else {
        SEPARATE_PAGING_TEMPLATE
    };
    let page_obj = monster_page(&state, query.page.as_deref()).await?;
    Ok(TemplateResponse::new(template, context! { page_obj }))
}

/// Same page; the route's fragment selector swaps the template.
pub async fn paging_with_separate_partials_improved(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<TemplateResponse> {
    let page_obj = monster_page(&state, query.page.as_deref()).await?;
    Ok(TemplateResponse::new(
        SEPARATE_PAGING_TEMPLATE,
        context! { page_obj },
    ))
}

/// Renders the paging block by hand for htmx.
pub async fn paging_with_inline_partials(
    State(state): State<AppState>,
    hx: HtmxRequest,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let page_obj = monster_page(&state, query.page.as_deref()).await?;
    let ctx = context! { page_obj };

    if hx.is_htmx() {
        let html = state.templates().render_blocks(
            INLINE_PAGING_TEMPLATE,
            &[PAGING_BLOCK.to_string()],
            &ctx,
        )?;
        return Ok(HtmlFragment(html).into_response());
    }
    Ok(TemplateResponse::new(INLINE_PAGING_TEMPLATE, ctx).into_response())
}

pub async fn paging_with_inline_partials_improved(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<TemplateResponse> {
    let page_obj = monster_page(&state, query.page.as_deref()).await?;
    Ok(TemplateResponse::new(INLINE_PAGING_TEMPLATE, context! { page_obj }))
}

/// As above, with the htmx attributes written next to the markup they drive.
pub async fn paging_with_inline_partials_improved_lob(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<TemplateResponse> {
    let page_obj = monster_page(&state, query.page.as_deref()).await?;
    Ok(TemplateResponse::new(
        INLINE_PAGING_LOB_TEMPLATE,
        context! { page_obj },
    ))
}

#[cfg(test)]
mod tests {
    use crate::models::NewMonster;
    use crate::testing::{
        body_string, empty_state, form_post, get_request, htmx_get, htmx_post, test_state,
    };
    use crate::views::router;
    use axum::http::{header::LOCATION, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_toggle_item_twice_flips_back() {
        let state = test_state(6).await;
        let app = router(state.clone()).unwrap();
        let before = state.store().get(5).await.unwrap().is_happy;

        let response = app
            .clone()
            .oneshot(htmx_post("/toggle-item/5/", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("id=\"monster-5\""));
        assert!(!body.contains("<html"));
        assert_eq!(state.store().get(5).await.unwrap().is_happy, !before);

        app.oneshot(htmx_post("/toggle-item/5/", "")).await.unwrap();
        assert_eq!(state.store().get(5).await.unwrap().is_happy, before);
    }

    #[tokio::test]
    async fn test_toggle_without_htmx_redirects() {
        let app = router(test_state(2).await).unwrap();
        let response = app.oneshot(form_post("/toggle-item/1/", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[LOCATION],
            "/toggle-with-separate-partials/"
        );
    }

    #[tokio::test]
    async fn test_toggle_missing_monster_is_404() {
        let app = router(test_state(2).await).unwrap();
        let response = app.oneshot(htmx_post("/toggle-item/99/", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_every_paging_variant_answers_htmx_with_the_fragment() {
        let app = router(test_state(25).await).unwrap();
        for path in [
            "/paging-with-separate-partials/",
            "/paging-with-separate-partials-improved/",
            "/paging-with-inline-partials/",
            "/paging-with-inline-partials-improved/",
            "/paging-with-inline-partials-improved-lob/",
        ] {
            let uri = format!("{path}?page=2");
            let body = body_string(app.clone().oneshot(htmx_get(&uri)).await.unwrap()).await;
            assert!(!body.contains("<html"), "{path} returned a full page");
            assert!(body.contains("Page 2 of 3"), "{path}: {body}");
            assert!(body.contains("?page=3"), "{path} should link to the next page");
        }
    }

    #[tokio::test]
    async fn test_paging_full_page_clamps_out_of_range() {
        let app = router(test_state(25).await).unwrap();
        let body = body_string(
            app.oneshot(get_request("/paging-with-inline-partials-improved/?page=40"))
                .await
                .unwrap(),
        )
        .await;
        assert!(body.contains("<html"));
        assert!(body.contains("Page 3 of 3"));
    }

    #[tokio::test]
    async fn test_page_number_too_large_to_parse_clamps_to_last_page() {
        let app = router(test_state(25).await).unwrap();
        let body = body_string(
            app.oneshot(htmx_get(
                "/paging-with-inline-partials-improved/?page=99999999999999999999",
            ))
            .await
            .unwrap(),
        )
        .await;
        assert!(body.contains("Page 3 of 3"), "{body}");
        assert!(!body.contains(">Next</a>"));
    }

    #[tokio::test]
    async fn test_long_names_are_truncated_in_the_list() {
        let state = empty_state();
        let name = "Wilhelmina Fortescue-Hargreaves of the Lower Fens";
        state.store().create(NewMonster::new(name)).await.unwrap();

        let body = body_string(
            router(state)
                .unwrap()
                .oneshot(get_request("/paging-with-inline-partials-improved-lob/"))
                .await
                .unwrap(),
        )
        .await;
        assert!(body.contains("Wilhelmina Fortescue-Hargreaves of th...</li>"), "{body}");
        assert!(body.contains(&format!(r#"title="{name}""#)));
    }
}
