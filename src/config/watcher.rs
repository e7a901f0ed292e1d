use anyhow::Result;
use notify::{
    event::{CreateKind, ModifyKind},
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::filter::{FilterEngine, ReloadReport};

/// Rule file change event
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A file changed and the rules were reloaded
    Reloaded(ReloadReport),

    /// A file changed but the reload failed; previous rules stay active
    ReloadFailed(String),
}

/// Hot reload of keyword rules on file change
pub struct RuleWatcher {
    /// Engine to reload
    engine: Arc<FilterEngine>,

    /// Files being watched
    paths: Vec<PathBuf>,

    /// File watcher
    watcher: RecommendedWatcher,

    /// Event receiver
    event_rx: mpsc::Receiver<notify::Result<Event>>,

    /// Debounce duration (avoid rapid reloads)
    debounce: Duration,
}

impl RuleWatcher {
    /// Create a watcher for the engine's main config and rule source
    pub fn new(engine: Arc<FilterEngine>, debounce: Duration) -> Result<Self> {
        let paths = engine.controller().watch_paths();
        let (event_tx, event_rx) = mpsc::channel(16);

        let watcher = RecommendedWatcher::new(
            move |res| {
                let _ = event_tx.blocking_send(res);
            },
            NotifyConfig::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        Ok(Self {
            engine,
            paths,
            watcher,
            event_rx,
            debounce,
        })
    }

    /// Files this watcher reacts to
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Start watching for changes
    pub fn start(&mut self) -> Result<()> {
        for path in &self.paths {
            info!(path = %path.display(), "watching filter rules");
            self.watcher.watch(path, RecursiveMode::NonRecursive)?;
        }

        Ok(())
    }

    /// Process events (call in a loop)
    pub async fn process_events(&mut self) -> Option<WatchEvent> {
        let event = self.event_rx.recv().await?;

        match event {
            Ok(event) => {
                if !matches!(
                    event.kind,
                    EventKind::Modify(ModifyKind::Data(_))
                        | EventKind::Modify(ModifyKind::Any)
                        | EventKind::Create(CreateKind::File)
                ) {
                    return None;
                }

                debug!(paths = ?event.paths, "filter rules modified");

                tokio::time::sleep(self.debounce).await;

                // Collapse the burst of events a single save tends to produce.
                while self.event_rx.try_recv().is_ok() {}

                match self.engine.on_reload("") {
                    Ok(report) => Some(WatchEvent::Reloaded(report)),
                    Err(e) => {
                        warn!(error = %e, "rule reload failed, keeping current rules");
                        Some(WatchEvent::ReloadFailed(e.to_string()))
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "file watcher error");
                None
            }
        }
    }

    /// Run the watcher loop
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                event = self.process_events() => {
                    if let Some(WatchEvent::Reloaded(report)) = event {
                        debug!(rules = report.rules, "watcher reload complete");
                    }
                }
                _ = shutdown.changed() => {
                    info!("rule watcher shutting down");
                    break;
                }
            }
        }
    }
}
