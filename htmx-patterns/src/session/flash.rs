//! Messages shown once, on the page after a redirect.
//!
//! The form-validation view queues "Monster Boris created. You can make
//! another." before redirecting; the GET that follows extracts
//! [`FlashMessages`], which empties the queue, and hands
//! [`FlashMessages::rendered`] to `base.html`.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::Error;

const QUEUE_KEY: &str = "flash.queue";

/// Bulma `notification` colour of queued messages
const CSS_CLASS: &str = "is-info";

/// An informational message queued for the next page render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlashMessage {
    pub message: String,
}

impl FlashMessage {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// What `base.html` iterates over
#[derive(Debug, Clone, Serialize)]
pub struct RenderedFlash<'a> {
    pub message: &'a str,
    pub css_class: &'static str,
}

/// The queued messages of this request's session. Extracting empties the
/// queue.
#[derive(Debug, Default)]
pub struct FlashMessages {
    messages: Vec<FlashMessage>,
}

impl FlashMessages {
    #[must_use]
    pub fn messages(&self) -> &[FlashMessage] {
        &self.messages
    }

    #[must_use]
    pub fn rendered(&self) -> Vec<RenderedFlash<'_>> {
        self.messages
            .iter()
            .map(|m| RenderedFlash {
                message: &m.message,
                css_class: CSS_CLASS,
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append `message` to the session's queue.
    pub async fn push(session: &Session, message: FlashMessage) -> Result<(), Error> {
        let mut queue: Vec<FlashMessage> = session
            .get(QUEUE_KEY)
            .await
            .map_err(|e| session_error("read", e))?
            .unwrap_or_default();
        queue.push(message);
        session
            .insert(QUEUE_KEY, queue)
            .await
            .map_err(|e| session_error("write", e))
    }

    /// Remove the whole queue from the session.
    pub async fn take(session: &Session) -> Result<Self, Error> {
        let messages = session
            .remove::<Vec<FlashMessage>>(QUEUE_KEY)
            .await
            .map_err(|e| session_error("read", e))?
            .unwrap_or_default();
        Ok(Self { messages })
    }
}

fn session_error(action: &str, e: impl std::fmt::Display) -> Error {
    Error::Session(format!("could not {action} flash messages: {e}"))
}

impl<S> FromRequestParts<S> for FlashMessages
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = super::session_from_parts(parts)?;
        Self::take(&session).await
    }
}
