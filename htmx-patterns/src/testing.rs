//! Shared fixtures for router tests

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request},
    response::Response,
    Router,
};

use crate::{
    htmx::HX_REQUEST,
    state::AppState,
    store::make_monsters,
    views::{router, today},
};

/// State with the embedded templates and an empty store
pub fn empty_state() -> AppState {
    AppState::builder().build().unwrap()
}

/// State seeded with `monsters` random monsters, ids `1..=monsters`
pub async fn test_state(monsters: usize) -> AppState {
    let state = empty_state();
    make_monsters(state.store(), monsters, today()).await.unwrap();
    state
}

pub async fn test_app(monsters: usize) -> Router {
    router(test_state(monsters).await).unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn htmx_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(HX_REQUEST, "true")
        .body(Body::empty())
        .unwrap()
}

/// urlencoded POST, as a plain HTML form sends it
pub fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn htmx_post(uri: &str, body: &str) -> Request<Body> {
    let mut request = form_post(uri, body);
    request
        .headers_mut()
        .insert(HX_REQUEST, "true".parse().unwrap());
    request
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
