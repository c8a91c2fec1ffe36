//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: HTMX_PATTERNS_, nesting separator: `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/htmx-patterns/config.toml
//! 4. System directory: /etc/htmx-patterns/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

const APP_NAME: &str = "htmx-patterns";
const ENV_PREFIX: &str = "HTMX_PATTERNS_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Session cookie configuration (flash messages)
    #[serde(default)]
    pub session: SessionConfig,

    /// Pagination defaults for the paging demos
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Monsters generated at startup
    #[serde(default)]
    pub seed: SeedConfig,

    /// Limits for the bulk-create endpoint
    #[serde(default)]
    pub bulk_create: BulkCreateConfig,

    /// Template loading
    #[serde(default)]
    pub templates: TemplatesConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error) or a full EnvFilter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ServiceConfig {
    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// Enable panic recovery middleware
    #[serde(default = "default_true")]
    pub catch_panic: bool,

    /// Enable compression
    #[serde(default = "default_true")]
    pub compression: bool,

    /// CORS mode (permissive, restrictive, disabled)
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            catch_panic: true,
            compression: true,
            cors_mode: default_cors_mode(),
        }
    }
}

/// Session cookie configuration.
///
/// Sessions only carry flash messages, so the store is always in-memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session cookie name
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Inactivity expiry in seconds (`0` = browser-session cookie)
    #[serde(default = "default_expiry_secs")]
    pub expiry_secs: u64,

    /// Secure cookie flag (HTTPS only)
    #[serde(default = "default_false")]
    pub secure: bool,

    /// HttpOnly cookie flag
    #[serde(default = "default_true")]
    pub http_only: bool,

    /// SameSite policy: strict, lax or none
    #[serde(default = "default_same_site")]
    pub same_site: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            expiry_secs: default_expiry_secs(),
            secure: false,
            http_only: true,
            same_site: default_same_site(),
        }
    }
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Items per page in the paging demos
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
        }
    }
}

/// Startup seeding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Number of random monsters created when the server starts
    #[serde(default = "default_seed_monsters")]
    pub monsters: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            monsters: default_seed_monsters(),
        }
    }
}

/// Bulk-create endpoint limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateConfig {
    /// Largest accepted `howmany` value
    #[serde(default = "default_max_howmany")]
    pub max_howmany: usize,
}

impl Default for BulkCreateConfig {
    fn default() -> Self {
        Self {
            max_howmany: default_max_howmany(),
        }
    }
}

/// Template loading configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Directory whose files shadow the embedded templates of the same name
    #[serde(default)]
    pub override_dir: Option<PathBuf>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_body_limit_mb() -> usize {
    2
}

fn default_cors_mode() -> String {
    "restrictive".to_string()
}

fn default_cookie_name() -> String {
    "htmx_patterns_session".to_string()
}

fn default_expiry_secs() -> u64 {
    86400
}

fn default_same_site() -> String {
    "lax".to_string()
}

fn default_per_page() -> usize {
    10
}

fn default_seed_monsters() -> usize {
    25
}

fn default_max_howmany() -> usize {
    100
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Searches for config files in this order (first found wins on conflicts):
    /// 1. Current working directory: ./config.toml
    /// 2. XDG config directory: ~/.config/htmx-patterns/config.toml
    /// 3. System directory: /etc/htmx-patterns/config.toml
    ///
    /// Environment variables (HTMX_PATTERNS_ prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so that higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the search path. Environment variables still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Config file paths in priority order (highest first)
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        if let Ok(path) = xdg_dirs.place_config_file("config.toml") {
            paths.push(path);
        }

        paths.push(PathBuf::from("/etc").join(APP_NAME).join("config.toml"));

        paths
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.service.host, self.service.port)
    }

    /// Request body limit in bytes
    pub fn body_limit_bytes(&self) -> usize {
        self.middleware.body_limit_mb * 1024 * 1024
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: APP_NAME.to_string(),
                host: default_host(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            middleware: MiddlewareConfig::default(),
            session: SessionConfig::default(),
            pagination: PaginationConfig::default(),
            seed: SeedConfig::default(),
            bulk_create: BulkCreateConfig::default(),
            templates: TemplatesConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 8000);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.pagination.per_page, 10);
        assert_eq!(config.bulk_create.max_howmany, 100);
        assert!(config.templates.override_dir.is_none());
    }

    #[test]
    fn test_bind_addr_and_limits() {
        let mut config = Config::default();
        config.service.host = "127.0.0.1".to_string();
        config.service.port = 9001;
        assert_eq!(config.bind_addr(), "127.0.0.1:9001");
        assert_eq!(config.body_limit_bytes(), 2 * 1024 * 1024);
        assert_eq!(config.service.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [service]
                name = "demo"
                port = 9090

                [pagination]
                per_page = 5
                "#,
            )?;
            jail.set_env("HTMX_PATTERNS_SEED__MONSTERS", "3");

            let config = Config::load_from("custom.toml").expect("config loads");
            assert_eq!(config.service.name, "demo");
            assert_eq!(config.service.port, 9090);
            assert_eq!(config.pagination.per_page, 5);
            assert_eq!(config.seed.monsters, 3);
            assert_eq!(config.service.log_level, "info");
            Ok(())
        });
    }
}
