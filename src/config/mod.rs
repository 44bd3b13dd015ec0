//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `OPINION_SCORE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use opinion_score::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod analysis;
mod database;
mod enrichment;
mod error;
mod redis;
mod server;

pub use analysis::AnalysisConfig;
pub use database::DatabaseConfig;
pub use enrichment::EnrichmentConfig;
pub use error::{ConfigError, ValidationError};
pub use redis::RedisConfig;
pub use server::{LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults. `database` and `redis` are optional; when absent
/// the service runs on in-memory adapters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Result store (PostgreSQL)
    pub database: Option<DatabaseConfig>,

    /// Progress channel (Redis pub/sub)
    pub redis: Option<RedisConfig>,

    /// LLM feedback provider
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Dataset location, lexicon and job defaults
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `OPINION_SCORE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `OPINION_SCORE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `OPINION_SCORE__DATABASE__URL=...` -> `database.url = ...`
    /// - `OPINION_SCORE__ENRICHMENT__API_KEY=...` -> `enrichment.api_key = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("OPINION_SCORE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        if let Some(redis) = &self.redis {
            redis.validate()?;
        }
        self.enrichment.validate()?;
        self.analysis.validate()?;
        Ok(())
    }
}
