// edge.rs — The (from, to) transition the watcher reacts to.

use std::fmt;

use crate::error::WatchError;

/// A specific ordered transition between two observed values.
///
/// The prior sample is an `Option` because the watcher has no prior sample
/// before its first successful read; `None` never matches `from`, so the
/// first sample can never fire the edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    from: String,
    to: String,
}

impl Edge {
    /// Build an edge. Both values must be non-empty and distinct, otherwise
    /// the edge could never fire.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Result<Self, WatchError> {
        let from = from.into();
        let to = to.into();
        if from.is_empty() || to.is_empty() {
            return Err(WatchError::InvalidConfig(
                "edge values must not be empty".to_string(),
            ));
        }
        if from == to {
            return Err(WatchError::InvalidConfig(format!(
                "edge from and to are both '{}'",
                from
            )));
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    /// Whether moving from `prior` to `new` is exactly this edge.
    pub fn matches(&self, prior: Option<&str>, new: &str) -> bool {
        prior == Some(self.from.as_str()) && new == self.to
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' -> '{}'", self.from, self.to)
    }
}
