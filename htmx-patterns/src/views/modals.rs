use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use minijinja::context;
use serde_json::json;

use super::today;
use crate::{
    error::Result,
    forms::{FormData, MonsterForm, ValidatedForm},
    htmx::HxTriggerEvents,
    state::AppState,
    store::Ordering,
    templates::TemplateResponse,
};

const CREATE_TEMPLATE: &str = "modals_create_monster.html";

/// Monster list with a button opening the create dialog
pub async fn main(State(state): State<AppState>) -> Result<TemplateResponse> {
    let monsters = state.store().list(Ordering::ByName).await?;
    Ok(TemplateResponse::new("modals_main.html", context! { monsters }))
}

pub async fn create_monster_form() -> TemplateResponse {
    let form = MonsterForm::quick(today());
    TemplateResponse::new(CREATE_TEMPLATE, context! { form => form.form() })
}

/// On success the dialog is closed and the list refreshed through client
/// events; the response itself has no body.
pub async fn create_monster(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let mut form = MonsterForm::bind_quick(&FormData::from(pairs), today());

    if form.is_valid() {
        if let Some(new) = form.cleaned().cloned() {
            let monster = state.store().create(new).await?;
            tracing::info!(monster_id = monster.id, name = %monster.name, "Created monster from modal");

            let events = HxTriggerEvents::new()
                .event_with_data("closeModal", json!(true))
                .event_with_data("monsterCreated", json!(monster.id));
            return Ok((StatusCode::OK, events, ()).into_response());
        }
    }

    Ok(TemplateResponse::new(CREATE_TEMPLATE, context! { form => form.form() }).into_response())
}
