use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Configuration options specific to the price feed service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    pub address: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// SQLite database path.
    pub database_url: String,
    /// Upper bound for a whole fetch-and-ingest run, in seconds.
    pub fetch_timeout_secs: u64,
}

impl ServerConfig {
    pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

    /// Load settings from `config/default.yaml`, `config/{APP_ENV}.yaml` and
    /// `APP_*` environment variables, in increasing priority.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

        Config::builder()
            .set_default("address", "127.0.0.1")?
            .set_default("port", 50051)?
            .set_default("database_url", "app.db")?
            .set_default("fetch_timeout_secs", Self::DEFAULT_FETCH_TIMEOUT_SECS)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.address.clone(), self.port)
    }
}
