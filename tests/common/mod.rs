//! Shared fixtures for router integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use request_router::http::{HttpMethod, Outcome, RequestContext};
use request_router::routing::{Action, ActionError, Controller, Filter, FnFilter, Route, RouteSpec};

/// Controller answering every declared action with 200 and the action name.
pub struct FakeController {
    name: String,
    routes: Vec<RouteSpec>,
}

impl FakeController {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            routes: Vec::new(),
        }
    }

    pub fn route(mut self, method: HttpMethod, uri: &str, action: &str) -> Self {
        self.routes.push(RouteSpec::new(method, uri, action));
        self
    }

    pub fn shared(self) -> Arc<dyn Controller> {
        Arc::new(self)
    }
}

impl Controller for FakeController {
    fn name(&self) -> &str {
        &self.name
    }

    fn routes(&self) -> Vec<RouteSpec> {
        self.routes.clone()
    }

    fn action(&self, name: &str) -> Result<Action, ActionError> {
        let body = name.to_string();
        Ok(Arc::new(move |_: &RequestContext| Outcome::ok(body.clone())))
    }
}

/// Controller with one good action (`ok`) and one whose signature cannot be used (`broken`).
pub struct MalformedController;

impl Controller for MalformedController {
    fn name(&self) -> &str {
        "malformed"
    }

    fn routes(&self) -> Vec<RouteSpec> {
        vec![
            RouteSpec::new(HttpMethod::Get, "/ok", "ok"),
            RouteSpec::new(HttpMethod::Get, "/broken", "broken"),
        ]
    }

    fn action(&self, name: &str) -> Result<Action, ActionError> {
        match name {
            "ok" => Ok(Arc::new(|_: &RequestContext| Outcome::ok("ok"))),
            _ => Err(ActionError::IncompatibleSignature {
                controller: "malformed".into(),
                action: name.to_string(),
                reason: "does not return an outcome".into(),
            }),
        }
    }
}

/// Filter that passes every request through.
pub fn passthrough(priority: i32) -> Arc<dyn Filter> {
    Arc::new(FnFilter::new(priority, None, |_: &Route, _: &mut RequestContext| None).unwrap())
}

/// Filter that appends `label` to the `trail` attribute and passes through.
pub fn tracer(label: &'static str, priority: i32, uri: Option<&str>) -> Arc<dyn Filter> {
    let filter = FnFilter::new(priority, uri, move |_: &Route, context: &mut RequestContext| {
        let trail = match context.attribute("trail") {
            Some(previous) => format!("{previous},{label}"),
            None => label.to_string(),
        };
        context.set_attribute("trail", trail);
        None
    });
    Arc::new(filter.unwrap())
}

/// Filter that answers every request itself.
pub fn blocker(priority: i32, status: u16) -> Arc<dyn Filter> {
    let filter = FnFilter::new(priority, None, move |_: &Route, _: &mut RequestContext| {
        Some(Outcome::new(status, "blocked"))
    });
    Arc::new(filter.unwrap())
}

pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
