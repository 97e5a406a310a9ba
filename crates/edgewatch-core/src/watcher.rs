// watcher.rs — Watcher: the poll-diff-react loop.
//
// Every tick the watcher reads one hash field and compares it with the last
// value it saw. A different value is logged as a state change; if the change
// is exactly the configured edge, the reactions run. The remembered value is
// then replaced whether or not the edge fired or the reactions succeeded.
//
// Absent fields and read errors skip the tick without touching memory, so a
// blip between two real samples cannot hide an edge.
//
// The very first successful read is always logged as a change from
// "<none>". That is the start-up announcement of the current value, not a
// real transition, and it can never fire the edge.
//
// There is no per-call timeout here: a store call that hangs holds up the
// loop until the store gives up.

use std::fmt;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use edgewatch_store::StoreClient;

use crate::config::WatchSettings;
use crate::reaction::{execute_reactions, ReactionReport};

/// Log label for "no sample yet".
const NO_PRIOR_SAMPLE: &str = "<none>";

/// What one poll cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The observed field does not exist.
    Absent,
    /// Reading the observed field failed.
    ReadFailed,
    /// Same value as last time; nothing logged.
    Unchanged,
    /// The value changed. `reactions` is set when the change was the edge.
    Changed {
        from: Option<String>,
        to: String,
        reactions: Option<ReactionReport>,
    },
}

impl CycleOutcome {
    pub fn edge_fired(&self) -> bool {
        matches!(
            self,
            CycleOutcome::Changed {
                reactions: Some(_),
                ..
            }
        )
    }
}

/// Running totals kept by a [`Watcher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub ticks: u64,
    pub transitions: u64,
    pub edges_fired: u64,
    pub absent_reads: u64,
    pub read_failures: u64,
    pub reaction_failures: u64,
}

impl fmt::Display for WatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks, {} transitions, {} edges fired, {} absent reads, {} read failures, {} reaction failures",
            self.ticks,
            self.transitions,
            self.edges_fired,
            self.absent_reads,
            self.read_failures,
            self.reaction_failures
        )
    }
}

/// Watches one field and reacts to one edge.
///
/// Owns its store handle, its settings and its memory of the last observed
/// value. Nothing else reads or writes that memory, so no locking is needed.
pub struct Watcher<S: StoreClient> {
    store: S,
    settings: WatchSettings,
    observed: Option<String>,
    stats: WatchStats,
}

impl<S: StoreClient> Watcher<S> {
    /// Create a watcher over an already-connected store.
    pub fn new(store: S, settings: WatchSettings) -> Self {
        Self {
            store,
            settings,
            observed: None,
            stats: WatchStats::default(),
        }
    }

    /// The last successfully read value, if any.
    pub fn observed(&self) -> Option<&str> {
        self.observed.as_deref()
    }

    pub fn stats(&self) -> WatchStats {
        self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Poll every `poll_interval` until `cancel` fires.
    ///
    /// The first poll happens one interval after the call.
    pub async fn run(&mut self, cancel: CancellationToken) -> WatchStats {
        let first_tick = Instant::now() + self.settings.poll_interval;
        self.run_from(first_tick, cancel).await
    }

    /// Like [`Watcher::run`], with the first tick at `first_tick`.
    ///
    /// Cancellation is checked before each tick and wins when both are
    /// ready. A cycle already running is never interrupted. A cycle that
    /// overruns the interval pushes the schedule back instead of causing a
    /// burst of catch-up ticks.
    pub async fn run_from(&mut self, first_tick: Instant, cancel: CancellationToken) -> WatchStats {
        let mut ticker = time::interval_at(first_tick, self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            store = %self.store.endpoint(),
            key = %self.settings.observe.key,
            field = %self.settings.observe.field,
            edge = %self.settings.edge,
            interval_ms = self.settings.poll_interval.as_millis() as u64,
            "watching for state changes"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("received termination signal, shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.poll_cycle().await;
                }
            }
        }

        tracing::info!("watcher stopped: {}", self.stats);
        self.stats
    }

    /// Sample the observed field once and react if the edge occurred.
    pub async fn poll_cycle(&mut self) -> CycleOutcome {
        self.stats.ticks += 1;
        let key = &self.settings.observe.key;
        let field = &self.settings.observe.field;

        let value = match self.store.get_field(key, field).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                self.stats.absent_reads += 1;
                tracing::info!("{}.{} not found, waiting...", key, field);
                return CycleOutcome::Absent;
            }
            Err(e) => {
                self.stats.read_failures += 1;
                tracing::warn!("error reading {}.{}: {}", key, field, e);
                return CycleOutcome::ReadFailed;
            }
        };

        if self.observed.as_deref() == Some(value.as_str()) {
            return CycleOutcome::Unchanged;
        }

        self.stats.transitions += 1;
        tracing::info!(
            "{}.{} changed: {} -> {}",
            key,
            field,
            self.observed.as_deref().unwrap_or(NO_PRIOR_SAMPLE),
            value
        );

        let reactions = if self.settings.edge.matches(self.observed.as_deref(), &value) {
            self.stats.edges_fired += 1;
            tracing::info!(
                "detected transition {}, running {} reaction(s)",
                self.settings.edge,
                self.settings.reactions.len()
            );
            let report = execute_reactions(&self.store, &self.settings.reactions).await;
            self.stats.reaction_failures += report.failures() as u64;
            Some(report)
        } else {
            None
        };

        let from = self.observed.replace(value.clone());
        CycleOutcome::Changed {
            from,
            to: value,
            reactions,
        }
    }
}
