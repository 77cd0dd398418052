//! Route table registration.
//!
//! # Responsibilities
//! - Turn a validated route table into controllers and filters
//! - Bind them into a router, and unbind them again
//!
//! # Design Decisions
//! - Configured actions answer with a fixed status and body
//! - A filter whose pattern does not compile is skipped with a warning,
//!   the same policy the router applies to broken routes

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{ControllerConfig, FilterConfig, RouterConfig};
use crate::http::{Outcome, RequestContext};
use crate::routing::{Action, ActionError, Controller, Filter, FnFilter, Route, RouteSpec, Router};

/// A controller defined by the route table.
#[derive(Debug)]
pub struct ConfiguredController {
    name: String,
    routes: Vec<RouteSpec>,
    actions: HashMap<String, Outcome>,
}

impl ConfiguredController {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            name: config.name.clone(),
            routes: config.routes.clone(),
            actions: config
                .actions
                .iter()
                .map(|a| (a.name.clone(), Outcome::new(a.status, a.body.clone())))
                .collect(),
        }
    }
}

impl Controller for ConfiguredController {
    fn name(&self) -> &str {
        &self.name
    }

    fn routes(&self) -> Vec<RouteSpec> {
        self.routes.clone()
    }

    fn action(&self, name: &str) -> Result<Action, ActionError> {
        let outcome = self.actions.get(name).cloned().ok_or_else(|| ActionError::Missing {
            controller: self.name.clone(),
            action: name.to_string(),
        })?;

        Ok(Arc::new(move |_: &RequestContext| outcome.clone()))
    }
}

fn configured_filter(config: &FilterConfig) -> Option<Arc<dyn Filter>> {
    let name = config.name.clone();
    let respond = config
        .respond
        .as_ref()
        .map(|r| Outcome::new(r.status, r.body.clone()));

    let filter = FnFilter::new(
        config.priority,
        config.uri.as_deref(),
        move |route: &Route, context: &mut RequestContext| {
            tracing::trace!(filter = %name, path = context.path(), uri = route.uri(), "Filter applied");
            context.set_attribute("filter", name.clone());
            respond.clone()
        },
    );

    match filter {
        Ok(filter) => Some(Arc::new(filter)),
        Err(e) => {
            tracing::warn!(filter = %config.name, error = %e, "Skipping filter with invalid uri pattern");
            None
        }
    }
}

/// The controllers and filters of one route table.
pub struct Registration {
    controllers: Vec<Arc<dyn Controller>>,
    filters: Vec<Arc<dyn Filter>>,
}

impl Registration {
    pub fn from_config(config: &RouterConfig) -> Self {
        let controllers = config
            .controllers
            .iter()
            .map(|c| Arc::new(ConfiguredController::from_config(c)) as Arc<dyn Controller>)
            .collect();
        let filters = config.filters.iter().filter_map(configured_filter).collect();

        Self { controllers, filters }
    }

    pub fn controllers(&self) -> &[Arc<dyn Controller>] {
        &self.controllers
    }

    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    /// Bind controllers in table order, then filters.
    pub fn bind(&self, router: &Router) {
        for controller in &self.controllers {
            router.bind_controller(controller.clone());
        }
        for filter in &self.filters {
            router.bind_filter(filter.clone());
        }
    }

    pub fn unbind(&self, router: &Router) {
        for controller in &self.controllers {
            router.unbind_controller(controller);
        }
        for filter in &self.filters {
            router.unbind_filter(filter);
        }
    }
}
