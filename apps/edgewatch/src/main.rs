//! # edgewatch
//!
//! Watches one Redis hash field and reacts to one specific transition.
//!
//! With no config file this reproduces the reference deployment: poll
//! `vehicle.state` every 500ms and, when it goes from `stand-by` to
//! `parked`, set `dashboard.ready = true` and publish `ready` on the
//! `dashboard` channel.
//!
//! ## Usage
//!
//! ```text
//! edgewatch --config /etc/edgewatch.toml
//! edgewatch --host 127.0.0.1 --port 6379 --poll-interval-ms 250
//! edgewatch --dry-run          # in-memory store, no Redis needed
//! ```
//!
//! Runs until SIGINT or SIGTERM, then exits with status 0. Failing to reach
//! the store at startup exits non-zero before any polling starts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use edgewatch_core::{WatchConfig, WatchSettings, WatchStats, Watcher};
use edgewatch_store::{MemoryStore, RedisStore, StoreClient};

const DEFAULT_CONFIG: &str = "edgewatch.toml";

/// Redis state-transition watcher.
#[derive(Parser)]
#[command(name = "edgewatch", version, about = "Redis state-transition watcher")]
struct Cli {
    /// Config file (defaults to ./edgewatch.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override `store.host`.
    #[arg(long)]
    host: Option<String>,

    /// Override `store.port`.
    #[arg(long)]
    port: Option<u16>,

    /// Override `poll_interval_ms`.
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Watch an in-memory store instead of connecting to Redis.
    #[arg(long)]
    dry_run: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn load_config(&self) -> Result<WatchConfig> {
        let mut config = match &self.config {
            Some(path) => WatchConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => WatchConfig::load_or_default(Path::new(DEFAULT_CONFIG))
                .with_context(|| format!("failed to load {}", DEFAULT_CONFIG))?,
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut WatchConfig) {
        if let Some(host) = &self.host {
            config.store.host = host.clone();
        }
        if let Some(port) = self.port {
            config.store.port = port;
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval_ms = ms;
        }
    }
}

fn init_logging(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("edgewatch=info".parse()?)
        .add_directive("edgewatch_core=info".parse()?)
        .add_directive("edgewatch_store=info".parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_ansi(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

/// Cancel `cancel` on SIGINT, or SIGTERM on unix.
///
/// The handlers are registered before this returns, so a registration
/// failure reaches the caller instead of passing for a shutdown request.
fn install_shutdown_handler(cancel: CancellationToken) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            tokio::select! {
                _ = interrupt.recv() => {}
                _ = terminate.recv() => {}
            }
            cancel.cancel();
        });
    }
    #[cfg(not(unix))]
    {
        let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
        tokio::spawn(async move {
            ctrl_c.recv().await;
            cancel.cancel();
        });
    }
    Ok(())
}

/// Verify connectivity, then watch until a termination signal arrives.
async fn watch<S: StoreClient>(store: S, settings: WatchSettings) -> Result<WatchStats> {
    let endpoint = store.endpoint();
    store
        .ping()
        .await
        .with_context(|| format!("failed to connect to store at {}", endpoint))?;
    tracing::info!("successfully connected to {}", endpoint);

    let cancel = CancellationToken::new();
    install_shutdown_handler(cancel.clone()).context("failed to install signal handlers")?;

    let mut watcher = Watcher::new(store, settings);
    Ok(watcher.run(cancel).await)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs)?;

    let config = cli.load_config()?;
    let settings = config.settings().context("invalid configuration")?;

    tracing::info!("edgewatch {} starting up", env!("CARGO_PKG_VERSION"));

    if cli.dry_run {
        tracing::info!("dry run: watching an in-memory store");
        watch(MemoryStore::new(), settings).await?;
    } else {
        tracing::info!(
            "monitoring redis at {} for state changes",
            config.store.endpoint()
        );
        let store = RedisStore::connect(&config.store)
            .await
            .context("failed to connect to redis")?;
        watch(store, settings).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "edgewatch",
            "--host",
            "10.0.0.5",
            "--port",
            "6380",
            "--poll-interval-ms",
            "50",
        ]);
        let mut config = WatchConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.store.endpoint(), "10.0.0.5:6380");
        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.observe.key, "vehicle");
    }

    #[test]
    fn no_flags_leave_config_alone() {
        let cli = Cli::parse_from(["edgewatch"]);
        let mut config = WatchConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config, WatchConfig::default());
        assert!(!cli.dry_run);
    }

    #[tokio::test]
    async fn failed_ping_is_fatal() {
        let store = MemoryStore::new();
        store.fail_ping(true);
        let settings = WatchConfig::default().settings().unwrap();

        let err = watch(store, settings).await.unwrap_err();
        assert!(err.to_string().contains("failed to connect to store at memory"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sigterm_cancels_the_watch() {
        let cancel = CancellationToken::new();
        install_shutdown_handler(cancel.clone()).unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!cancel.is_cancelled());

        let status = std::process::Command::new("kill")
            .arg("-TERM")
            .arg(std::process::id().to_string())
            .status()
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(std::time::Duration::from_secs(5), cancel.cancelled())
            .await
            .expect("SIGTERM should cancel the token");
    }
}
