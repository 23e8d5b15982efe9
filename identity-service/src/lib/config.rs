use std::env;

use chrono::Duration;
use chrono::Utc;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub token: TokenConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    /// Lifetime of bearer tokens issued at login
    pub ttl_hours: i64,
}

impl TokenConfig {
    /// Token lifetime as a duration.
    ///
    /// # Errors
    /// Rejects non-positive values and lifetimes whose expiry would fall
    /// outside the representable date range.
    pub fn ttl(&self) -> Result<Duration, ConfigError> {
        let ttl = Duration::try_hours(self.ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                ConfigError::Message(format!(
                    "token.ttl_hours must be a positive number of hours within the supported date range, got {}",
                    self.ttl_hours
                ))
            })?;

        Ok(ttl)
    }
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, TOKEN__TTL_HOURS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: TOKEN__TTL_HOURS=1 overrides token.ttl_hours
            .add_source(Environment::default().separator("__"))
            .build()?;

        Self::from_configuration(configuration)
    }

    /// Deserialize and validate an already-built configuration.
    pub fn from_configuration(configuration: ConfigBuilder) -> Result<Self, ConfigError> {
        let config: Self = configuration.try_deserialize()?;
        config.token.ttl()?;

        Ok(config)
    }
}
