//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    error::Result,
    store::{InMemoryMonsterStore, MonsterStore},
    templates::Templates,
};

/// Application state shared across handlers.
///
/// Everything is behind `Arc` (or cheaply cloneable), so cloning per request
/// is fine.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<dyn MonsterStore>,
    templates: Templates,
}

impl AppState {
    /// Create a new builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The monster store
    pub fn store(&self) -> &dyn MonsterStore {
        self.store.as_ref()
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AppState`].
///
/// Missing pieces get defaults: `Config::default()`, an empty in-memory
/// store, and templates loaded from the embedded set (plus
/// `templates.override_dir` when configured).
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    store: Option<Arc<dyn MonsterStore>>,
    templates: Option<Templates>,
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a specific store implementation
    pub fn store(mut self, store: Arc<dyn MonsterStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn templates(mut self, templates: Templates) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Build the state.
    ///
    /// # Errors
    ///
    /// Fails when the template environment cannot be created.
    pub fn build(self) -> Result<AppState> {
        let config = self.config.unwrap_or_default();
        let templates = match self.templates {
            Some(templates) => templates,
            None => Templates::load(config.templates.override_dir.as_deref())?,
        };
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryMonsterStore::new()));

        Ok(AppState {
            config: Arc::new(config),
            store,
            templates,
        })
    }
}
