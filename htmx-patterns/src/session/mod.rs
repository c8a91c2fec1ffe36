//! Cookie sessions, used for flash messages only.
//!
//! Sessions live in an in-memory store and disappear on restart.

mod flash;

pub use flash::{FlashMessage, FlashMessages, RenderedFlash};

pub use tower_sessions::{Expiry, Session, SessionManagerLayer};
pub use tower_sessions_memory_store::MemoryStore;

use axum::http::request::Parts;
use time::Duration;
use tower_sessions::cookie::SameSite;

use crate::config::SessionConfig;
use crate::error::Error;

/// Create the session layer from configuration.
pub fn create_memory_session_layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore> {
    let expiry = if config.expiry_secs == 0 {
        Expiry::OnSessionEnd
    } else {
        Expiry::OnInactivity(Duration::seconds(
            i64::try_from(config.expiry_secs).unwrap_or(i64::MAX),
        ))
    };

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(config.cookie_name.clone())
        .with_expiry(expiry)
        .with_secure(config.secure)
        .with_http_only(config.http_only)
        .with_same_site(same_site(&config.same_site))
}

fn same_site(value: &str) -> SameSite {
    match value.to_lowercase().as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    }
}

/// The session set by [`SessionManagerLayer`].
pub(crate) fn session_from_parts(parts: &Parts) -> Result<Session, Error> {
    parts.extensions.get::<Session>().cloned().ok_or_else(|| {
        Error::Session(
            "Session not found in request extensions. Is SessionManagerLayer configured?"
                .to_string(),
        )
    })
}
