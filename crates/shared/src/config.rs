//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Cash count reconciliation policy.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
    /// Movement ledger policy.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// How a close treats a cash count that disagrees with the declared amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationMode {
    /// Reject the close; nothing is persisted.
    Strict,
    /// Accept the close, record the difference and log a warning.
    #[default]
    Warn,
}

/// Reconciliation configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReconciliationConfig {
    /// Mismatch policy applied at close time.
    #[serde(default)]
    pub mode: ReconciliationMode,
}

/// Movement ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Whether a movement may be posted while its operator has no open session.
    #[serde(default = "default_allow_unassigned")]
    pub allow_unassigned_movements: bool,
    /// Largest installment overpayment absorbed as rounding.
    #[serde(default = "default_overpayment_tolerance")]
    pub overpayment_tolerance: Decimal,
}

fn default_allow_unassigned() -> bool {
    true
}

fn default_overpayment_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            allow_unassigned_movements: default_allow_unassigned(),
            overpayment_tolerance: default_overpayment_tolerance(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KASA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
