// error.rs — Error types for watcher configuration.

use thiserror::Error;

/// Errors raised while loading and validating watcher configuration.
///
/// Nothing inside the loop returns this type; per-tick failures are logged
/// and retried on the next tick.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Reading the config file failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::WatchConfig`].
    #[error("config parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The config parsed but describes something the watcher cannot run.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
