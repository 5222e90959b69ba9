//! Opening a persisted playground for a command.

use playground_core::{Bus, Notice, Persistence, Playground, PlaygroundConfig};
use playground_exec::{ExecCapabilities, Simulator};
use playground_storage::json::storage_at;
use playground_storage::JsonStorage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Options shared by every command that touches the project.
pub struct SessionOptions<'a> {
    pub config: &'a PlaygroundConfig,
    pub data_dir: Option<&'a Path>,
    pub shared: Option<&'a str>,
    /// Evaluate scripts in-process regardless of configuration.
    pub native_eval: bool,
}

/// An opened playground with its notice feed.
pub struct Session {
    pub playground: Playground<JsonStorage>,
    notices: broadcast::Receiver<Notice>,
}

impl Session {
    /// Open the project stored in the data directory.
    pub async fn open(options: &SessionOptions<'_>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir(options.config, options.data_dir)?;
        let storage = Arc::new(storage_at(&data_dir));
        tracing::debug!(data_dir = %data_dir.display(), "opening project store");

        let bus = Bus::new();
        let notices = bus.subscribe::<Notice>().await;
        let persistence = Persistence::new(storage, bus.clone())
            .with_history_limit(options.config.history_limit());
        let mut playground = Playground::new(persistence, bus).with_config(options.config);
        if options.native_eval {
            playground = playground.with_simulator(Simulator::new(ExecCapabilities::native()));
        }
        playground.open(options.shared).await?;

        Ok(Self {
            playground,
            notices,
        })
    }

    /// Print pending notices to stderr.
    pub fn flush_notices(&mut self) {
        while let Ok(notice) = self.notices.try_recv() {
            eprintln!("{}", format_notice(&notice));
        }
    }

    /// Save the current state and report notices.
    pub async fn finish(mut self) -> anyhow::Result<()> {
        self.playground.save().await?;
        self.flush_notices();
        Ok(())
    }
}

/// Resolve the data directory: flag, then config, then platform default.
pub fn resolve_data_dir(config: &PlaygroundConfig, explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    let explicit = explicit.or(config.data_dir.as_deref());
    Ok(playground_util::path::resolve_data_dir(explicit)?)
}

/// One-line rendering of a notice.
pub fn format_notice(notice: &Notice) -> String {
    let marker = if notice.is_destructive() { "!" } else { "*" };
    format!("{marker} {}: {}", notice.title, notice.description)
}
