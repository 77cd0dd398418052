//! Request dispatch over the router.
//!
//! # Responsibilities
//! - Resolve (method, path) to a route
//! - Answer 404 for unbound routes
//! - Run applicable filters by descending priority, stopping at the first
//!   filter that produces an outcome
//! - Invoke the route's action otherwise
//!
//! # Design Decisions
//! - Filters only run for bound routes
//! - The filter list is snapshotted once per request

use std::collections::HashMap;
use std::sync::Arc;

use crate::http::{HttpMethod, Outcome, RequestContext};
use crate::observability::metrics;
use crate::routing::{FilterId, Route, Router};

/// Result of dispatching one request.
#[derive(Debug)]
pub struct Dispatch {
    pub route: Arc<Route>,
    pub context: RequestContext,
    pub outcome: Outcome,
    /// The filter that short-circuited the chain, if any.
    pub short_circuited_by: Option<FilterId>,
}

/// Front door for an HTTP server built on [`Router`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
}

impl Dispatcher {
    pub fn new(router: Arc<Router>) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Dispatch a request.
    pub fn dispatch(&self, method: HttpMethod, path: &str) -> Dispatch {
        let route = self.router.route_for(method, path);

        if route.is_unbound() {
            tracing::debug!(method = %method, path, "No route matched");
            metrics::record_dispatch(404);
            return Dispatch {
                route,
                context: RequestContext::new(method, path, HashMap::new()),
                outcome: Outcome::not_found(),
                short_circuited_by: None,
            };
        }

        let mut context = RequestContext::new(method, path, route.path_parameters_encoded(path));
        let filters = self.router.filters();

        for filter in filters.applicable(path) {
            if let Some(outcome) = filter.call(&route, &mut context) {
                let id = FilterId::of(filter);
                tracing::debug!(
                    method = %method,
                    path,
                    filter = ?id,
                    status = outcome.status,
                    "Filter short-circuited request"
                );
                metrics::record_dispatch(outcome.status);
                return Dispatch {
                    route,
                    context,
                    outcome,
                    short_circuited_by: Some(id),
                };
            }
        }

        let outcome = route.invoke(&context);
        tracing::debug!(
            method = %method,
            path,
            uri = route.uri(),
            action = route.action_name().unwrap_or_default(),
            status = outcome.status,
            "Request dispatched"
        );
        metrics::record_dispatch(outcome.status);

        Dispatch {
            route,
            context,
            outcome,
            short_circuited_by: None,
        }
    }
}
