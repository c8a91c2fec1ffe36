//! Bulk actions on checked monsters. After an htmx POST the page is rendered
//! again as for a GET, so checkboxes that were not acted on stay checked.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Serialize;

use crate::{
    error::Result,
    forms::FormData,
    htmx::HtmxRequest,
    models::{Monster, MonsterId, Transition},
    state::AppState,
    store::{transition, MonsterStore, Ordering},
    templates::TemplateResponse,
};

const TEMPLATE: &str = "view_restart.html";
const URL: &str = "/view-restart/";

#[derive(Debug, Serialize)]
struct RestartContext {
    happy_monsters: Vec<Monster>,
    sad_monsters: Vec<Monster>,
    selected_happy_monsters: Vec<MonsterId>,
    selected_sad_monsters: Vec<MonsterId>,
}

pub async fn view_restart(State(state): State<AppState>) -> Result<TemplateResponse> {
    render(state.store(), Vec::new(), Vec::new()).await
}

pub async fn view_restart_post(
    State(state): State<AppState>,
    hx: HtmxRequest,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let data = FormData::from(pairs);
    let store = state.store();
    let (happy, sad) = partition_by_mood(store).await?;

    let mut selected_happy = selected(&happy, &data, "happy_monster");
    let mut selected_sad = selected(&sad, &data, "sad_monster");

    if data.contains("kick") {
        for id in &selected_happy {
            transition(store, *id, Transition::Kick).await?;
        }
        tracing::info!(count = selected_happy.len(), "Kicked selected monsters");
        selected_happy.clear();
    }
    if data.contains("hug") {
        for id in &selected_sad {
            transition(store, *id, Transition::Hug).await?;
        }
        tracing::info!(count = selected_sad.len(), "Hugged selected monsters");
        selected_sad.clear();
    }

    if hx.is_htmx() {
        return Ok(render(store, selected_happy, selected_sad)
            .await?
            .into_response());
    }
    Ok(Redirect::to(URL).into_response())
}

async fn render(
    store: &dyn MonsterStore,
    selected_happy_monsters: Vec<MonsterId>,
    selected_sad_monsters: Vec<MonsterId>,
) -> Result<TemplateResponse> {
    let (happy_monsters, sad_monsters) = partition_by_mood(store).await?;
    Ok(TemplateResponse::new(
        TEMPLATE,
        RestartContext {
            happy_monsters,
            sad_monsters,
            selected_happy_monsters,
            selected_sad_monsters,
        },
    ))
}

async fn partition_by_mood(store: &dyn MonsterStore) -> Result<(Vec<Monster>, Vec<Monster>)> {
    Ok(store
        .list(Ordering::ById)
        .await?
        .into_iter()
        .partition(|m| m.is_happy))
}

/// Ids of `monsters` whose `<prefix>_<id>` checkbox was submitted
fn selected(monsters: &[Monster], data: &FormData, prefix: &str) -> Vec<MonsterId> {
    monsters
        .iter()
        .filter(|m| data.contains(&format!("{prefix}_{}", m.id)))
        .map(|m| m.id)
        .collect()
}
