//! Bound routes and the unbound sentinel.
//!
//! # Responsibilities
//! - Tie a method and a compiled pattern to a controller action
//! - Represent "no match" as a value (`Route::unbound`) instead of an error
//! - Extract path parameters and invoke the action
//!
//! # Design Decisions
//! - Accessors on the sentinel never fail; they return empty/neutral values
//! - Routes are immutable and shared via `Arc` between registry snapshots

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::http::{HttpMethod, Outcome, RequestContext};
use crate::routing::controller::{same_controller, Action, Controller};
use crate::routing::pattern::RoutePattern;

struct Binding {
    pattern: RoutePattern,
    controller: Arc<dyn Controller>,
    action_name: String,
    action: Action,
}

/// A bound (method, pattern, controller action) entry, or the unbound sentinel.
pub struct Route {
    method: HttpMethod,
    uri: String,
    binding: Option<Binding>,
}

impl Route {
    pub(crate) fn bound(
        method: HttpMethod,
        pattern: RoutePattern,
        controller: Arc<dyn Controller>,
        action_name: String,
        action: Action,
    ) -> Self {
        Self {
            method,
            uri: pattern.template().to_string(),
            binding: Some(Binding {
                pattern,
                controller,
                action_name,
                action,
            }),
        }
    }

    /// The "no match" result for `method` and `path`.
    pub fn unbound(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            uri: path.into(),
            binding: None,
        }
    }

    pub fn is_unbound(&self) -> bool {
        self.binding.is_none()
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The template of a bound route, or the requested path for the sentinel.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn pattern(&self) -> Option<&RoutePattern> {
        self.binding.as_ref().map(|b| &b.pattern)
    }

    pub fn controller(&self) -> Option<&Arc<dyn Controller>> {
        self.binding.as_ref().map(|b| &b.controller)
    }

    pub fn action_name(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.action_name.as_str())
    }

    /// True if this route dispatches to `controller`.
    pub fn is_bound_to(&self, controller: &Arc<dyn Controller>) -> bool {
        self.controller()
            .is_some_and(|own| same_controller(own, controller))
    }

    /// True if this is a bound route for `method` whose pattern matches `path`.
    pub fn matches(&self, method: HttpMethod, path: &str) -> bool {
        self.method == method
            && self
                .binding
                .as_ref()
                .is_some_and(|b| b.pattern.matches(path))
    }

    /// Path parameters of `path`, verbatim. Empty for the sentinel.
    pub fn path_parameters_encoded(&self, path: &str) -> HashMap<String, String> {
        self.binding
            .as_ref()
            .map(|b| b.pattern.extract_parameters(path))
            .unwrap_or_default()
    }

    /// Run the action. The sentinel answers 404.
    pub fn invoke(&self, context: &RequestContext) -> Outcome {
        match &self.binding {
            Some(binding) => (binding.action)(context),
            None => Outcome::not_found(),
        }
    }

    /// Same controller, method, template and action.
    pub(crate) fn same_binding(&self, other: &Route) -> bool {
        match (&self.binding, &other.binding) {
            (Some(a), Some(b)) => {
                self.method == other.method
                    && self.uri == other.uri
                    && a.action_name == b.action_name
                    && same_controller(&a.controller, &b.controller)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.binding {
            Some(binding) => f
                .debug_struct("Route")
                .field("method", &self.method)
                .field("uri", &self.uri)
                .field("controller", &binding.controller.name())
                .field("action", &binding.action_name)
                .finish(),
            None => f
                .debug_struct("Route")
                .field("method", &self.method)
                .field("uri", &self.uri)
                .field("unbound", &true)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_accessors_are_neutral() {
        let route = Route::unbound(HttpMethod::Get, "/missing");
        assert!(route.is_unbound());
        assert!(route.controller().is_none());
        assert!(route.action_name().is_none());
        assert!(route.pattern().is_none());
        assert!(route.path_parameters_encoded("/missing").is_empty());
        assert!(!route.matches(HttpMethod::Get, "/missing"));

        let context = RequestContext::new(HttpMethod::Get, "/missing", HashMap::new());
        assert_eq!(route.invoke(&context).status, 404);
    }
}
