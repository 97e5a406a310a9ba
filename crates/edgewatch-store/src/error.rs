// error.rs — Error types for store client operations.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while talking to the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The initial connection could not be established.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        source: redis::RedisError,
    },

    /// The initial connection did not complete in time.
    #[error("connecting to {endpoint} timed out after {timeout:?}")]
    ConnectTimeout { endpoint: String, timeout: Duration },

    /// A command sent to Redis failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The server answered PING with something other than PONG.
    #[error("unexpected ping reply: {0}")]
    UnexpectedPingReply(String),

    /// The backend is not reachable (used by the in-process store).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
