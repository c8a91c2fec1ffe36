//! # htmx-patterns
//!
//! Server-rendered htmx patterns on axum: one view renders the full page,
//! and a route wrapper narrows it to a fragment when htmx asks.
//!
//! ## Features
//!
//! - **Fragment selection**: swap the template, render named blocks, or
//!   render the blocks the client names with `use_block`
//! - **Deferred rendering**: views return template + context; rendering
//!   happens in a router-wide middleware
//! - **Single-field validation**: htmx re-validates one form field and gets
//!   back just that field's row
//! - **Pagination**, flash messages, embedded and overridable templates
//!
//! ## Example
//!
//! ```rust,no_run
//! use htmx_patterns::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::builder().config(config.clone()).build()?;
//!     let app = views::router(state)?;
//!
//!     Server::new(config).serve(app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod forms;
pub mod health;
pub mod htmx;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod pagination;
pub mod server;
pub mod session;
pub mod state;
pub mod store;
pub mod templates;
pub mod views;

#[cfg(test)]
mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::forms::{validate_field_layer, FormData, MonsterForm, ValidatedForm};
    pub use crate::health::health;
    pub use crate::htmx::{
        ForHtmx, ForHtmxBuilder, FragmentConfigError, FragmentError, FragmentMode, HtmlFragment,
        HtmxRequest, HxTriggerEvents,
    };
    pub use crate::models::{Monster, MonsterId, MonsterKind, NewMonster, Transition};
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::pagination::{Page, Paginator};
    pub use crate::server::Server;
    pub use crate::session::{FlashMessage, FlashMessages};
    pub use crate::state::{AppState, AppStateBuilder};
    pub use crate::store::{InMemoryMonsterStore, MonsterStore, Ordering};
    pub use crate::templates::{render_deferred, TemplateResponse, Templates, ViewResponse};
    pub use crate::views;

    pub use axum::{
        routing::{get, post},
        Router,
    };
}
