//! Route table watcher for hot reload.
//!
//! Watches the parent directory, so saves that replace the file (write a temp
//! file, rename it over) keep being seen.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RouterConfig;

/// Forwards every valid new version of a route table file.
pub struct ConfigWatcher {
    path: PathBuf,
    updates: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of its updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (updates, rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                updates,
            },
            rx,
        )
    }

    /// Start watching. Events stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self.path.file_name().map(ToOwned::to_owned);
        let path = self.path;
        let updates = self.updates;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = %e, "Route table watch failed");
                        return;
                    }
                };

                let touches_table = event
                    .paths
                    .iter()
                    .any(|changed| changed.file_name() == file_name.as_deref());
                if !touches_table || !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }

                match load_config(&path) {
                    Ok(config) => {
                        tracing::info!(path = ?path, kind = ?event.kind, "Route table changed");
                        if updates.send(config).is_err() {
                            tracing::debug!("Route table receiver gone, dropping update");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(path = ?path, error = %e, "Ignoring invalid route table change");
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;
        tracing::info!(directory = ?directory, "Route table watcher started");

        Ok(watcher)
    }
}
