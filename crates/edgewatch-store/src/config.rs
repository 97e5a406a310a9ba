//! Store connection configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for the Redis backend (`[store]` in edgewatch.toml)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Redis host name or IP address
    #[serde(default = "default_host")]
    pub host: String,

    /// Redis TCP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional AUTH password
    #[serde(default)]
    pub password: Option<String>,

    /// Logical database index
    #[serde(default)]
    pub db: i64,

    /// Upper bound on establishing the initial connection, in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            password: None,
            db: 0,
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl StoreConfig {
    /// `host:port`, as shown in log lines.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

// Serde default functions
fn default_host() -> String {
    "192.168.7.1".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}
