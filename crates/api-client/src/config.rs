//! Configuration of the HTTP clients.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the HTTP providers live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// The base URL of the mempool.space compatible block explorer.
    pub mempool_url: String,

    /// The base URL of the staking API.
    pub staking_api_url: String,

    /// The timeout applied to every request, in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            mempool_url: "https://mempool.space".to_string(),
            staking_api_url: "http://localhost:8092".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// The request timeout.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: ApiConfig = toml::from_str(
            r#"
            mempool_url = "https://mempool.space/signet"
            "#,
        )
        .unwrap();

        assert_eq!(config.mempool_url, "https://mempool.space/signet");
        assert_eq!(config.staking_api_url, ApiConfig::default().staking_api_url);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }
}
