//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    pub service: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Monsters currently stored, when the store answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monsters: Option<usize>,
}

/// Liveness probe.
///
/// 200 while the store answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let monsters = match state.store().count().await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("Health check: store unavailable: {}", e);
            None
        }
    };

    let (status, label) = if monsters.is_some() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let response = HealthResponse {
        status: label.to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        monsters,
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewMonster;

    #[tokio::test]
    async fn test_health_reports_monster_count() {
        let state = AppState::builder().build().unwrap();
        state.store().create(NewMonster::new("Agnes")).await.unwrap();

        let response = health(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.service, "htmx-patterns");
        assert_eq!(body.monsters, Some(1));
    }
}
