use axum::{extract::State, Form};
use serde::Deserialize;

use super::today;
use crate::{
    error::{Error, Result},
    htmx::{html_escape, HtmlFragment},
    state::AppState,
    store::make_monsters,
    templates::TemplateResponse,
};

pub async fn simple_post_form() -> TemplateResponse {
    TemplateResponse::new("simple_post_form.html", ())
}

pub async fn post_without_form() -> TemplateResponse {
    TemplateResponse::new("post_without_form.html", ())
}

#[derive(Debug, Deserialize)]
pub struct BulkCreate {
    howmany: Option<String>,
}

/// Create `howmany` random monsters and list them.
///
/// There is no redirect after this POST: the result is a fragment swapped
/// into the page, so a refresh never resubmits it.
pub async fn post_form_endpoint(
    State(state): State<AppState>,
    Form(input): Form<BulkCreate>,
) -> Result<HtmlFragment<String>> {
    let max = state.config().bulk_create.max_howmany;
    let howmany = parse_howmany(input.howmany.as_deref(), max)?;

    let monsters = make_monsters(state.store(), howmany, today()).await?;
    tracing::info!(count = monsters.len(), "Created monsters");

    let body: String = monsters
        .iter()
        .map(|m| format!("Created {}<br>", html_escape(&m.name)))
        .collect();
    Ok(HtmlFragment(body))
}

fn parse_howmany(raw: Option<&str>, max: usize) -> Result<usize> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(1);
    }
    let howmany: usize = raw
        .parse()
        .map_err(|_| Error::BadRequest(format!("howmany must be a whole number, got {raw:?}")))?;
    if howmany > max {
        return Err(Error::BadRequest(format!("howmany must be at most {max}")));
    }
    Ok(howmany)
}
