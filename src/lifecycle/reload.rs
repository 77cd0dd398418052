//! Hot reload of the bound route table.
//!
//! # Responsibilities
//! - Replace the current registration with one built from a new table
//! - Drive replacements from the config watcher until shutdown
//!
//! # Design Decisions
//! - New table is bound before the old one is unbound, so lookups never see
//!   an empty router during a swap
//! - While both are bound, the old routes still win (first registered)

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::config::RouterConfig;
use crate::lifecycle::startup::Registration;
use crate::routing::Router;

/// Owns the registration currently bound into a router.
pub struct Reloader {
    router: Arc<Router>,
    current: Registration,
}

impl Reloader {
    /// Bind `config` into `router` and keep track of it.
    pub fn start(router: Arc<Router>, config: &RouterConfig) -> Self {
        let current = Registration::from_config(config);
        current.bind(&router);
        Self { router, current }
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Swap the bound registration for one built from `config`.
    pub fn apply(&mut self, config: &RouterConfig) {
        let next = Registration::from_config(config);
        next.bind(&self.router);
        self.current.unbind(&self.router);
        self.current = next;

        tracing::info!(
            routes = self.router.routes().len(),
            filters = self.router.filters().len(),
            revision = self.router.revision(),
            "Route table reloaded"
        );
    }

    /// Apply updates as they arrive until shutdown or the channel closes.
    pub async fn run(
        mut self,
        mut updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                update = updates.recv() => match update {
                    Some(config) => self.apply(&config),
                    None => break,
                },
                _ = shutdown.recv() => {
                    tracing::info!("Reloader stopping");
                    break;
                }
            }
        }
    }
}
