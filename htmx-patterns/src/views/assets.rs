use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

use crate::error::{Error, Result};

/// Scripts and styles embedded at compile time
#[derive(Embed)]
#[folder = "static/"]
struct StaticAssets;

pub async fn static_asset(Path(path): Path<String>) -> Result<Response> {
    let file = StaticAssets::get(&path)
        .ok_or_else(|| Error::NotFound(format!("Static file not found: {path}")))?;
    let content_type = file.metadata.mimetype().to_string();
    Ok(([(header::CONTENT_TYPE, content_type)], file.data).into_response())
}
