//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT secrets and token lifetimes
//! - `cache` - Cache backend selection and Redis connection
//! - `environment` - Environment detection and logging configuration
//! - `rate_limit` - Progressive login throttling
//!
//! [`AppConfig::load`] layers, from lowest to highest priority: built-in
//! defaults, `config/default.toml`, `config/<environment>.toml`, a `.env`
//! file and `GK_`-prefixed environment variables using `__` as the section
//! separator (`GK_AUTHENTICATION__JWT__ACCESS_SECRET`).

pub mod auth;
pub mod cache;
pub mod environment;
pub mod rate_limit;

use config::{Config, ConfigBuilder, File, FileFormat};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::{AuthenticationConfig, JwtConfig};
pub use cache::{CacheBackend, CacheConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use rate_limit::{RateLimitConfig, SecurityConfig};

/// Prefix for environment variable overrides
const ENV_PREFIX: &str = "GK";

/// Errors raised while assembling configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment the process runs in
    #[serde(default)]
    pub environment: Environment,

    /// Token signing configuration
    #[serde(default)]
    pub authentication: AuthenticationConfig,

    /// Login throttling configuration
    #[serde(default)]
    pub security: SecurityConfig,

    /// Cache backend configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the environment named by `GK_ENVIRONMENT`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::load_for(Environment::from_env())
    }

    /// Load configuration for an explicit environment
    pub fn load_for(environment: Environment) -> Result<Self, ConfigError> {
        let config = Self::defaults(environment)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(environment.config_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Build configuration from defaults plus an inline TOML document
    ///
    /// Environment variables are not consulted, which keeps tests hermetic.
    pub fn from_toml(environment: Environment, toml: &str) -> Result<Self, ConfigError> {
        let config = Self::defaults(environment)?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Built-in defaults, some of which depend on the environment
    fn defaults(environment: Environment) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let rate_limit = RateLimitConfig::for_environment(environment);
        let logging = LoggingConfig::for_environment(environment);

        let builder = Config::builder()
            .set_default("environment", environment.to_string())?
            .set_default("authentication.jwt.access_expires_in", "15m")?
            .set_default("authentication.jwt.refresh_expires_in", "7d")?
            .set_default("security.rate_limit.max_attempts", rate_limit.max_attempts as i64)?
            .set_default("security.rate_limit.window_seconds", rate_limit.window_seconds as i64)?
            .set_default(
                "security.rate_limit.block_duration_seconds",
                rate_limit.block_duration_seconds as i64,
            )?
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", logging.format.as_str())?
            .set_default("logging.colored", logging.colored)?
            .set_default("logging.source_location", logging.source_location)?;

        Ok(builder)
    }

    /// Rate limiting section shortcut
    pub fn rate_limit(&self) -> RateLimitConfig {
        self.security.rate_limit
    }

    /// JWT section shortcut
    pub fn jwt(&self) -> &JwtConfig {
        &self.authentication.jwt
    }
}
