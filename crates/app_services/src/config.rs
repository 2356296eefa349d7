//! Runtime configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use infra_store::CreditStore;

/// Core runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Bound on waiting for a contended wallet lock, in milliseconds
    pub wallet_lock_timeout_ms: u64,
    /// Log level filter, `RUST_LOG` syntax
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            wallet_lock_timeout_ms: 2_000,
            log_level: "info".to_string(),
        }
    }
}

impl CoreConfig {
    /// Loads configuration from the environment (prefix `CREDIT_CORE_`)
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        config::Config::builder()
            .add_source(config::Config::try_from(&CoreConfig::default())?)
            .add_source(config::Environment::with_prefix("CREDIT_CORE"))
            .build()?
            .try_deserialize()
    }

    pub fn wallet_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.wallet_lock_timeout_ms)
    }

    /// Builds a store honoring the configured lock window
    pub fn build_store(&self) -> CreditStore {
        CreditStore::new(self.wallet_lock_timeout())
    }

    /// Installs the global tracing subscriber honoring `log_level`
    ///
    /// `RUST_LOG` wins over the configured level. Safe to call more than
    /// once; later calls are no-ops.
    pub fn init_tracing(&self) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.log_level));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.wallet_lock_timeout(), Duration::from_millis(2_000));
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_store_uses_configured_window() {
        let cfg = CoreConfig {
            wallet_lock_timeout_ms: 50,
            ..CoreConfig::default()
        };
        let _store = cfg.build_store();
    }
}
