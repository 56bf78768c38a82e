//! Application configuration management.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Persistence configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Cycle setup rules.
    #[serde(default)]
    pub cycle: CycleConfig,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Key prefix for every persisted record.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Path of the JSON file backing the key-value store.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_namespace() -> String {
    "financial_discipline".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/burnrate.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            path: default_store_path(),
        }
    }
}

/// Limits applied when a cycle is set up.
#[derive(Debug, Clone, Deserialize)]
pub struct CycleConfig {
    /// Smallest budget a cycle may start with.
    #[serde(default = "default_min_budget")]
    pub min_budget: Decimal,
    /// Longest allowed cycle, in days, start and end inclusive.
    #[serde(default = "default_max_days")]
    pub max_days: i64,
}

fn default_min_budget() -> Decimal {
    Decimal::ONE
}

fn default_max_days() -> i64 {
    365
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            min_budget: default_min_budget(),
            max_days: default_max_days(),
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
            .add_source(config::Environment::with_prefix("BURNRATE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
