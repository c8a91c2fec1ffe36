use axum::extract::State;
use minijinja::context;

use crate::{error::Result, state::AppState, templates::TemplateResponse};

/// Index of the demos, showing the first monster if there is one.
pub async fn home(State(state): State<AppState>) -> Result<TemplateResponse> {
    let monster = state.store().first().await?;
    Ok(TemplateResponse::new("home.html", context! { monster }))
}
