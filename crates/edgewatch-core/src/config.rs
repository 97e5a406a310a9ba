//! Watcher configuration
//!
//! [`WatchConfig`] mirrors `edgewatch.toml`. Every key has a default, so an
//! empty file (or no file) describes the reference deployment: watch
//! `vehicle.state` and, on `stand-by` → `parked`, set `dashboard.ready` and
//! publish `ready` on the `dashboard` topic.
//!
//! The raw config is validated into [`WatchSettings`], which is what the
//! [`crate::Watcher`] takes by ownership.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use edgewatch_store::StoreConfig;

use crate::edge::Edge;
use crate::error::WatchError;
use crate::reaction::Reaction;

/// Top-level configuration from edgewatch.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Sampling cadence in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Store connection settings
    #[serde(default)]
    pub store: StoreConfig,

    /// The hash field sampled on every tick
    #[serde(default)]
    pub observe: FieldRef,

    /// The transition that triggers reactions
    #[serde(default)]
    pub edge: EdgeConfig,

    /// Side effects run, in order, when the edge fires
    #[serde(default = "default_reactions")]
    pub reactions: Vec<Reaction>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            store: StoreConfig::default(),
            observe: FieldRef::default(),
            edge: EdgeConfig::default(),
            reactions: default_reactions(),
        }
    }
}

/// A field inside a hash record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub key: String,
    pub field: String,
}

impl Default for FieldRef {
    fn default() -> Self {
        Self {
            key: "vehicle".to_string(),
            field: "state".to_string(),
        }
    }
}

/// Raw `[edge]` table, checked by [`Edge::new`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeConfig {
    pub from: String,
    pub to: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            from: "stand-by".to_string(),
            to: "parked".to_string(),
        }
    }
}

// Serde default functions
fn default_poll_interval_ms() -> u64 {
    500
}

fn default_reactions() -> Vec<Reaction> {
    vec![
        Reaction::SetField {
            key: "dashboard".to_string(),
            field: "ready".to_string(),
            value: "true".to_string(),
        },
        Reaction::Publish {
            topic: "dashboard".to_string(),
            message: "ready".to_string(),
        },
    ]
}

/// Validated, immutable settings for one [`crate::Watcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSettings {
    pub poll_interval: Duration,
    pub observe: FieldRef,
    pub edge: Edge,
    pub reactions: Vec<Reaction>,
}

impl WatchConfig {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self, WatchError> {
        let content = std::fs::read_to_string(path).map_err(|source| WatchError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load config from `path`, or the defaults if the file doesn't exist.
    /// A file that exists but doesn't parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, WatchError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(content: &str) -> Result<Self, WatchError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate into the settings the watcher runs with.
    pub fn settings(&self) -> Result<WatchSettings, WatchError> {
        if self.poll_interval_ms == 0 {
            return Err(WatchError::InvalidConfig(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.observe.key.is_empty() || self.observe.field.is_empty() {
            return Err(WatchError::InvalidConfig(
                "observe.key and observe.field must not be empty".to_string(),
            ));
        }
        for reaction in &self.reactions {
            let incomplete = match reaction {
                Reaction::SetField { key, field, .. } => key.is_empty() || field.is_empty(),
                Reaction::Publish { topic, .. } => topic.is_empty(),
            };
            if incomplete {
                return Err(WatchError::InvalidConfig(format!(
                    "reaction is missing a target: {:?}",
                    reaction
                )));
            }
        }

        Ok(WatchSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            observe: self.observe.clone(),
            edge: Edge::new(&self.edge.from, &self.edge.to)?,
            reactions: self.reactions.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn empty_file_yields_reference_defaults() {
        let config = WatchConfig::parse("").unwrap();
        assert_eq!(config, WatchConfig::default());

        let settings = config.settings().unwrap();
        assert_eq!(settings.poll_interval, Duration::from_millis(500));
        assert_eq!(settings.observe.key, "vehicle");
        assert_eq!(settings.observe.field, "state");
        assert_eq!(settings.edge.from(), "stand-by");
        assert_eq!(settings.edge.to(), "parked");
        assert_eq!(settings.reactions.len(), 2);
    }

    #[test]
    fn parses_full_file() {
        let toml = r#"
poll_interval_ms = 250

[store]
host = "127.0.0.1"
port = 6380
password = "hunter2"
db = 2

[observe]
key = "door"
field = "status"

[edge]
from = "open"
to = "closed"

[[reactions]]
kind = "publish"
topic = "alarms"
message = "door-closed"

[[reactions]]
kind = "set_field"
key = "panel"
field = "door"
value = "closed"
"#;
        let config = WatchConfig::parse(toml).unwrap();
        assert_eq!(config.store.endpoint(), "127.0.0.1:6380");
        assert_eq!(config.store.password.as_deref(), Some("hunter2"));
        assert_eq!(config.store.db, 2);
        assert_eq!(config.store.connect_timeout_ms, 5_000);

        let settings = config.settings().unwrap();
        assert_eq!(settings.poll_interval, Duration::from_millis(250));
        assert_eq!(settings.edge, Edge::new("open", "closed").unwrap());
        assert_eq!(
            settings.reactions[0],
            Reaction::Publish {
                topic: "alarms".to_string(),
                message: "door-closed".to_string(),
            }
        );
        assert!(matches!(settings.reactions[1], Reaction::SetField { .. }));
    }

    #[test]
    fn explicit_empty_reaction_list_is_allowed() {
        let config = WatchConfig::parse("reactions = []").unwrap();
        assert!(config.settings().unwrap().reactions.is_empty());
    }

    #[test]
    fn unknown_reaction_kind_is_a_parse_error() {
        let toml = r#"
[[reactions]]
kind = "delete_key"
key = "x"
"#;
        assert!(matches!(
            WatchConfig::parse(toml),
            Err(WatchError::ParseError(_))
        ));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let config = WatchConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.settings(),
            Err(WatchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn identical_edge_values_are_rejected() {
        let mut config = WatchConfig::default();
        config.edge.to = config.edge.from.clone();
        assert!(config.settings().is_err());
    }

    #[test]
    fn reaction_without_target_is_rejected() {
        let mut config = WatchConfig::default();
        config.reactions.push(Reaction::Publish {
            topic: String::new(),
            message: "x".to_string(),
        });
        assert!(config.settings().is_err());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_ms = 1000").unwrap();

        let config = WatchConfig::load(file.path()).unwrap();
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn load_or_default_handles_missing_file() {
        let dir = tempdir().unwrap();
        let config = WatchConfig::load_or_default(&dir.path().join("edgewatch.toml")).unwrap();
        assert_eq!(config, WatchConfig::default());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = WatchConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, WatchError::IoError { .. }));
    }
}
