//! Server settings
//!
//! Read from `LEDGER_`-prefixed environment variables on top of defaults.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_DATABASE_PATH: &str = "clientes.db";
pub const DEFAULT_LOG_FILTER: &str = "ledger_server=info,tower_http=info";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// `LEDGER_BIND_ADDRESS`
    pub bind_address: String,
    /// `LEDGER_DATABASE_PATH`
    pub database_path: String,
    /// `LEDGER_LOG_FILTER`, a tracing-subscriber env-filter directive
    pub log_filter: String,
}

impl ServerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix("LEDGER").prefix_separator("_"))
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("database_path", DEFAULT_DATABASE_PATH)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}
