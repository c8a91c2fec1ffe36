use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use minijinja::context;

use crate::{
    error::Result,
    forms::FormData,
    htmx::HtmxRequest,
    models::{MonsterId, Transition},
    state::AppState,
    store::transition,
    templates::TemplateResponse,
};

const TEMPLATE: &str = "multiple_actions.html";

pub async fn multiple_actions(
    State(state): State<AppState>,
    Path(monster_id): Path<MonsterId>,
) -> Result<TemplateResponse> {
    let monster = state.store().get(monster_id).await?;
    Ok(TemplateResponse::new(TEMPLATE, context! { monster }))
}

/// Kick or hug, depending on which submit button was pressed.
pub async fn multiple_actions_post(
    State(state): State<AppState>,
    hx: HtmxRequest,
    Path(monster_id): Path<MonsterId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let data = FormData::from(pairs);
    let action = if data.contains("kick") {
        Some(Transition::Kick)
    } else if data.contains("hug") {
        Some(Transition::Hug)
    } else {
        None
    };

    let monster = match action {
        Some(action) => {
            let monster = transition(state.store(), monster_id, action).await?;
            tracing::info!(monster_id, %action, is_happy = monster.is_happy, "Monster action");
            monster
        }
        None => state.store().get(monster_id).await?,
    };

    if !hx.is_htmx() {
        return Ok(Redirect::to(&format!("/multiple-actions/{monster_id}/")).into_response());
    }
    Ok(TemplateResponse::new(TEMPLATE, context! { monster }).into_response())
}
