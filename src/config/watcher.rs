//! Hot reload of the configuration file.
//!
//! # Design Decisions
//! - Watch the parent directory, not the file: editors that save by writing a
//!   temp file and renaming it over the original replace the inode, and a
//!   file-level watch would go silent after the first save
//! - Only events naming the config file count
//! - A burst of events (truncate, write, rename) becomes a single reload
//! - A file that fails to load or validate is logged and never published

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::EdgeConfig;

/// Quiet period that must pass before a reload.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Publishes a freshly loaded `EdgeConfig` whenever the file changes.
pub struct ConfigWatcher {
    path: PathBuf,
    debounce: Duration,
    update_tx: mpsc::UnboundedSender<EdgeConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of its updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<EdgeConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            debounce: DEFAULT_DEBOUNCE,
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Must be called from within a Tokio runtime.
    ///
    /// Reloads stop when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let file_name: OsString = self
            .path
            .file_name()
            .ok_or_else(|| notify::Error::generic("config path has no file name"))?
            .to_os_string();
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let touches_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(file_name.as_os_str()));
                    if touches_config && !event.kind.is_access() {
                        let _ = event_tx.send(());
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tokio::spawn(debounce_reloads(event_rx, self.path.clone(), self.debounce, self.update_tx));

        tracing::info!(path = ?self.path, dir = ?dir, "Config watcher started");
        Ok(watcher)
    }
}

/// Turn raw change notifications into at most one reload per quiet period.
async fn debounce_reloads(
    mut events: mpsc::UnboundedReceiver<()>,
    path: PathBuf,
    debounce: Duration,
    updates: mpsc::UnboundedSender<EdgeConfig>,
) {
    while events.recv().await.is_some() {
        tokio::time::sleep(debounce).await;
        while events.try_recv().is_ok() {}

        tracing::info!(path = ?path, "Config file change detected, reloading");
        match load_config(&path) {
            Ok(config) => {
                if updates.send(config).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
            }
        }
    }
}
