//! Faucet configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Faucet service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaucetConfig {
    /// Server address
    pub server_addr: String,

    /// Pool wallet the faucet pays out from (MPN address)
    pub pool_wallet: String,

    /// Amount dispensed per approved request (in tℤ)
    pub send_amount: f64,

    /// Cooldown period between disbursements to the same address (seconds)
    pub cooldown_secs: u64,

    /// Ledger state file path
    pub state_path: String,

    /// Wallet CLI binary name
    pub bazuka_bin: String,

    /// Timeout for one wallet CLI invocation (seconds)
    pub executor_timeout_secs: u64,

    /// Enable CORS
    pub cors_enabled: bool,
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:3000".to_string(),
            pool_wallet: String::new(),
            send_amount: 1.0,
            cooldown_secs: 28800, // 8 hours
            state_path: "faucet_wallets.json".to_string(),
            bazuka_bin: "bazuka".to_string(),
            executor_timeout_secs: 30,
            cors_enabled: true,
        }
    }
}

impl FaucetConfig {
    /// Load from environment variables with defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("ZIESHA_FAUCET_SERVER_ADDR") {
            config.server_addr = addr;
        }

        if let Ok(wallet) = std::env::var("ZIESHA_POOL_WALLET") {
            config.pool_wallet = wallet;
        }

        if let Ok(amount) = std::env::var("ZIESHA_FAUCET_AMOUNT") {
            config.send_amount = amount.parse().unwrap_or(config.send_amount);
        }

        if let Ok(cooldown) = std::env::var("ZIESHA_FAUCET_COOL_DOWN_SEC") {
            config.cooldown_secs = cooldown.parse().unwrap_or(config.cooldown_secs);
        }

        if let Ok(path) = std::env::var("ZIESHA_FAUCET_STATE_PATH") {
            config.state_path = path;
        }

        if let Ok(bin) = std::env::var("ZIESHA_FAUCET_BAZUKA_BIN") {
            config.bazuka_bin = bin;
        }

        if let Ok(timeout) = std::env::var("ZIESHA_FAUCET_EXECUTOR_TIMEOUT") {
            config.executor_timeout_secs = timeout.parse().unwrap_or(config.executor_timeout_secs);
        }

        if let Ok(enabled) = std::env::var("ZIESHA_FAUCET_CORS_ENABLED") {
            config.cors_enabled = enabled.to_lowercase() == "true";
        }

        config
    }

    /// Get cooldown duration
    pub fn cooldown_duration(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// Get executor timeout duration
    pub fn executor_timeout(&self) -> Duration {
        Duration::from_secs(self.executor_timeout_secs)
    }
}
