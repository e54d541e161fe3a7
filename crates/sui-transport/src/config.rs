//! RPC endpoint configuration.
//!
//! Configuration via environment variables:
//!
//! - `SUI_RPC_ENDPOINT` - fullnode JSON-RPC URL (default: testnet)
//! - `SUI_RPC_API_KEY` - sent as `x-api-key` when set
//! - `SUI_RPC_TIMEOUT_SECS` - per-request timeout (default: 30)
//! - `SUI_RPC_CONNECT_TIMEOUT_SECS` - connect timeout (default: 10)

use std::time::Duration;
use sui_ptb_types::env_utils::{env_duration_secs, env_string, env_string_or};

pub const MAINNET_RPC: &str = "https://fullnode.mainnet.sui.io:443";
pub const TESTNET_RPC: &str = "https://fullnode.testnet.sui.io:443";
pub const DEVNET_RPC: &str = "https://fullnode.devnet.sui.io:443";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl RpcConfig {
    /// Endpoint with default timeouts and no API key.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn mainnet() -> Self {
        Self::new(MAINNET_RPC)
    }

    pub fn testnet() -> Self {
        Self::new(TESTNET_RPC)
    }

    pub fn devnet() -> Self {
        Self::new(DEVNET_RPC)
    }

    pub fn from_env() -> Self {
        Self {
            endpoint: env_string_or("SUI_RPC_ENDPOINT", TESTNET_RPC),
            api_key: env_string("SUI_RPC_API_KEY"),
            timeout: env_duration_secs("SUI_RPC_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            connect_timeout: env_duration_secs(
                "SUI_RPC_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            ),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }

    /// Network name guessed from the endpoint URL.
    pub fn network(&self) -> Option<&'static str> {
        infer_network_from_url(&self.endpoint)
    }
}

pub fn infer_network_from_url(url: &str) -> Option<&'static str> {
    let lower = url.to_lowercase();
    ["testnet", "devnet", "mainnet"]
        .into_iter()
        .find(|network| lower.contains(network))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_constructors() {
        assert_eq!(RpcConfig::mainnet().network(), Some("mainnet"));
        assert_eq!(RpcConfig::testnet().network(), Some("testnet"));
        assert_eq!(RpcConfig::devnet().network(), Some("devnet"));
        assert_eq!(RpcConfig::new("http://127.0.0.1:9000").network(), None);
    }

    #[test]
    fn test_builder_methods() {
        let config = RpcConfig::new("http://localhost:9000")
            .with_api_key("secret")
            .with_timeouts(Duration::from_secs(5), Duration::from_secs(2));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_from_env_defaults_to_testnet() {
        // Only asserts on variables this test does not set.
        if std::env::var("SUI_RPC_ENDPOINT").is_err() {
            assert_eq!(RpcConfig::from_env().endpoint, TESTNET_RPC);
        }
        if std::env::var("SUI_RPC_TIMEOUT_SECS").is_err() {
            assert_eq!(RpcConfig::from_env().timeout, Duration::from_secs(30));
        }
    }
}
