//! Error types and HTTP response conversion
//!
//! Request-time failures render as a small HTML notification so that htmx
//! swaps show something readable in place of the targeted fragment.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::htmx::{html_escape, FragmentConfigError, FragmentError};
use crate::store::{StoreError, StoreErrorKind};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Template loading or rendering failed
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Structured store error with operation context
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Fragment selector misconfigured at router construction
    #[error("Fragment configuration error: {0}")]
    FragmentConfig(#[from] FragmentConfigError),

    /// Fragment selector applied to a response it cannot work with
    #[error("Fragment error: {0}")]
    Fragment(#[from] FragmentError),

    /// Session error
    #[error("Session error: {0}")]
    Session(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body over the configured limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Page parameters rejected by the paginator
    #[error("Pagination error: {0}")]
    Pagination(#[from] paginator_rs::PaginatorError),
}

impl Error {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Store(e) if e.kind == StoreErrorKind::NotFound => StatusCode::NOT_FOUND,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Store(e) if e.kind == StoreErrorKind::Unavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code shown in the error fragment
    pub fn code(&self) -> String {
        match self {
            Error::Config(_) => "CONFIG_ERROR".to_string(),
            Error::Io(_) => "IO_ERROR".to_string(),
            Error::Template(_) => "TEMPLATE_ERROR".to_string(),
            Error::Store(e) => format!("STORE_{}", e.kind.to_string().to_uppercase()),
            Error::FragmentConfig(_) => "FRAGMENT_CONFIG_ERROR".to_string(),
            Error::Fragment(_) => "FRAGMENT_ERROR".to_string(),
            Error::Session(_) => "SESSION_ERROR".to_string(),
            Error::NotFound(_) => "NOT_FOUND".to_string(),
            Error::BadRequest(_) => "BAD_REQUEST".to_string(),
            Error::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE".to_string(),
            Error::Pagination(_) => "PAGINATION_ERROR".to_string(),
        }
    }

    /// Message safe to show to the user
    fn user_message(&self) -> String {
        match self {
            Error::NotFound(msg) | Error::BadRequest(msg) | Error::PayloadTooLarge(msg) => {
                msg.clone()
            }
            Error::Store(e) if e.is_not_found() => match e.monster_id {
                Some(id) => format!("Monster {id} not found"),
                None => "Monster not found".to_string(),
            },
            Error::Store(_) => "Store operation failed".to_string(),
            Error::Template(_) => "Page could not be rendered".to_string(),
            Error::Session(_) => "Session operation failed".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        match &self {
            Error::Template(e) => tracing::error!(error = %e, detail = ?e.detail(), "Template error"),
            Error::Store(e) if !e.is_not_found() => tracing::error!(
                operation = %e.operation,
                kind = %e.kind,
                monster_id = ?e.monster_id,
                "Store error: {}", e.message
            ),
            _ if status.is_server_error() => tracing::error!(code = %code, "{}", self),
            _ => tracing::debug!(code = %code, "{}", self),
        }

        let body = format!(
            r#"<div class="notification is-danger" data-error-code="{}">{}</div>"#,
            code,
            html_escape(&self.user_message())
        );
        (status, Html(body)).into_response()
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
