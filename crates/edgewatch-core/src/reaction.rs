// reaction.rs — Side effects performed when the watched edge fires.
//
// Reactions run in declared order. Each one is attempted regardless of how
// the previous one went, and each outcome is logged on its own line. There
// is no retry and no rollback: a failed reaction is simply reported.

use std::fmt;

use serde::{Deserialize, Serialize};

use edgewatch_store::StoreClient;

/// One side effect to perform on the edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reaction {
    /// Write `value` to `field` of the hash at `key`.
    SetField {
        key: String,
        field: String,
        value: String,
    },

    /// Publish `message` on `topic`.
    Publish { topic: String, message: String },
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reaction::SetField { key, field, value } => {
                write!(f, "set {} {} to '{}'", key, field, value)
            }
            Reaction::Publish { topic, message } => {
                write!(f, "publish '{}' to {}", message, topic)
            }
        }
    }
}

/// Result of one reaction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionOutcome {
    pub reaction: Reaction,
    /// `None` on success, the store's error message otherwise.
    pub error: Option<String>,
}

impl ReactionOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcomes of every reaction run for one edge, in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionReport {
    pub outcomes: Vec<ReactionOutcome>,
}

impl ReactionReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(ReactionOutcome::succeeded)
    }

    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }
}

/// Run `reactions` against `store` in order, logging each outcome.
pub async fn execute_reactions<S>(store: &S, reactions: &[Reaction]) -> ReactionReport
where
    S: StoreClient + ?Sized,
{
    let mut report = ReactionReport::default();

    for reaction in reactions {
        let result = match reaction {
            Reaction::SetField { key, field, value } => store.set_field(key, field, value).await,
            Reaction::Publish { topic, message } => store.publish(topic, message).await,
        };

        let error = match result {
            Ok(()) => {
                tracing::info!(reaction = %reaction, "reaction succeeded");
                None
            }
            Err(e) => {
                tracing::warn!(reaction = %reaction, error = %e, "reaction failed");
                Some(e.to_string())
            }
        };

        report.outcomes.push(ReactionOutcome {
            reaction: reaction.clone(),
            error,
        });
    }

    report
}
