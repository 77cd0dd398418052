//! Route registry and lookup.
//!
//! # Responsibilities
//! - Bind/unbind controllers and filters at runtime
//! - Look up the route for a (method, path) pair
//! - Return an explicit unbound route rather than an error on no match
//!
//! # Design Decisions
//! - Copy-on-write: writers build a new table and publish it with one atomic
//!   swap; readers load the current snapshot without locking
//! - Writers serialize on a mutex so concurrent binds cannot lose updates
//! - First registered route wins; there is no specificity ranking
//! - Registration misuse (double bind, unknown unbind) is a silent no-op

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::http::HttpMethod;
use crate::observability::metrics;
use crate::routing::builder::RouteBuilder;
use crate::routing::controller::Controller;
use crate::routing::filter::{Filter, FilterId, FilterSet};
use crate::routing::route::Route;

/// One published version of the registry.
#[derive(Clone, Default)]
struct RoutingTable {
    /// Registration order.
    routes: Vec<Arc<Route>>,
    /// Descending priority, bind order among equals.
    filters: Vec<Arc<dyn Filter>>,
}

/// The routing registry.
pub struct Router {
    table: ArcSwap<RoutingTable>,
    writer: Mutex<()>,
    revision: AtomicU64,
}

impl Router {
    /// Create an empty router.
    pub fn new() -> Self {
        Self {
            table: ArcSwap::from_pointee(RoutingTable::default()),
            writer: Mutex::new(()),
            revision: AtomicU64::new(0),
        }
    }

    /// Bind every valid route the controller declares.
    ///
    /// Routes that fail to build are logged and skipped. Routes already bound
    /// for this controller with the same method, template and action are not
    /// added twice.
    pub fn bind_controller(&self, controller: Arc<dyn Controller>) {
        let declared = controller.routes();

        let built: Vec<Arc<Route>> = declared
            .iter()
            .filter_map(|spec| match RouteBuilder::from_spec(spec, controller.clone()).build() {
                Ok(route) => Some(Arc::new(route)),
                Err(e) => {
                    tracing::warn!(
                        controller = controller.name(),
                        method = %spec.method,
                        uri = %spec.uri,
                        action = %spec.action,
                        error = %e,
                        "Rejected route"
                    );
                    metrics::record_rejected_route();
                    None
                }
            })
            .collect();

        let mut added = 0usize;
        self.update(|table| {
            for route in &built {
                if table.routes.iter().any(|existing| existing.same_binding(route)) {
                    continue;
                }
                table.routes.push(route.clone());
                added += 1;
            }
            added > 0
        });

        tracing::info!(
            controller = controller.name(),
            declared = declared.len(),
            added,
            "Controller bound"
        );
    }

    /// Remove every route dispatching to `controller`.
    pub fn unbind_controller(&self, controller: &Arc<dyn Controller>) {
        let mut removed = 0usize;
        self.update(|table| {
            let before = table.routes.len();
            table.routes.retain(|route| !route.is_bound_to(controller));
            removed = before - table.routes.len();
            removed > 0
        });

        if removed > 0 {
            tracing::info!(controller = controller.name(), removed, "Controller unbound");
        } else {
            tracing::debug!(controller = controller.name(), "Unbind of unknown controller ignored");
        }
    }

    /// Add a filter unless one with the same identity is already bound.
    pub fn bind_filter(&self, filter: Arc<dyn Filter>) {
        let id = FilterId::of(&filter);
        let priority = filter.priority();

        let added = self.update(|table| {
            if table.filters.iter().any(|f| FilterId::of(f) == id) {
                return false;
            }
            let position = table
                .filters
                .iter()
                .position(|f| f.priority() < priority)
                .unwrap_or(table.filters.len());
            table.filters.insert(position, filter);
            true
        });

        if added {
            tracing::info!(filter = ?id, priority, "Filter bound");
        } else {
            tracing::debug!(filter = ?id, "Filter already bound");
        }
    }

    /// Remove the filter with the same identity, if bound.
    pub fn unbind_filter(&self, filter: &Arc<dyn Filter>) {
        let id = FilterId::of(filter);

        let removed = self.update(|table| {
            let before = table.filters.len();
            table.filters.retain(|f| FilterId::of(f) != id);
            table.filters.len() != before
        });

        if removed {
            tracing::info!(filter = ?id, "Filter unbound");
        } else {
            tracing::debug!(filter = ?id, "Unbind of unknown filter ignored");
        }
    }

    /// Bound filters, highest priority first.
    pub fn filters(&self) -> FilterSet {
        FilterSet::new(self.table.load().filters.clone())
    }

    /// Bound routes in registration order.
    pub fn routes(&self) -> Vec<Arc<Route>> {
        self.table.load().routes.clone()
    }

    /// Find the first bound route for `method` whose pattern matches `path`.
    ///
    /// Never fails: returns [`Route::unbound`] when nothing matches.
    pub fn route_for(&self, method: HttpMethod, path: &str) -> Arc<Route> {
        let table = self.table.load();

        match table.routes.iter().find(|route| route.matches(method, path)) {
            Some(route) => {
                metrics::record_lookup(true);
                tracing::trace!(method = %method, path, uri = route.uri(), "Route matched");
                route.clone()
            }
            None => {
                metrics::record_lookup(false);
                tracing::trace!(method = %method, path, "No route matched");
                Arc::new(Route::unbound(method, path))
            }
        }
    }

    /// Build the URI reaching `action` on `controller` with the given parameters.
    ///
    /// The first route of that action whose template accepts the parameters wins.
    pub fn reverse_route_for(
        &self,
        controller: &Arc<dyn Controller>,
        action: &str,
        parameters: &HashMap<String, String>,
    ) -> Option<String> {
        self.table
            .load()
            .routes
            .iter()
            .filter(|route| route.is_bound_to(controller) && route.action_name() == Some(action))
            .find_map(|route| route.pattern()?.reverse(parameters))
    }

    /// Number of snapshots published so far.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Apply `change` to a copy of the table and publish it if it reports a change.
    fn update(&self, change: impl FnOnce(&mut RoutingTable) -> bool) -> bool {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = RoutingTable::clone(&self.table.load_full());
        if !change(&mut next) {
            return false;
        }

        metrics::record_registry_size(next.routes.len(), next.filters.len());
        self.table.store(Arc::new(next));
        self.revision.fetch_add(1, Ordering::AcqRel);
        true
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.load();
        f.debug_struct("Router")
            .field("routes", &table.routes)
            .field("filters", &table.filters.len())
            .field("revision", &self.revision())
            .finish()
    }
}
