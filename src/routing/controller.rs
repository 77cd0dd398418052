//! Controller abstraction.
//!
//! # Responsibilities
//! - Declare the routes a controller wants bound (`routes`)
//! - Resolve an action name to something callable (`action`)
//!
//! # Design Decisions
//! - Controllers declare routes explicitly; there is no introspection
//! - Action resolution happens once, when the route is built, so a broken
//!   action is detected at bind time rather than per request
//! - The router identifies a controller by the address of its allocation

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::{HttpMethod, Outcome, RequestContext};

/// A resolved controller action.
pub type Action = Arc<dyn Fn(&RequestContext) -> Outcome + Send + Sync>;

/// One route declared by a controller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteSpec {
    pub method: HttpMethod,
    pub uri: String,
    pub action: String,
}

impl RouteSpec {
    pub fn new(method: HttpMethod, uri: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            action: action.into(),
        }
    }
}

/// Why an action could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("controller `{controller}` has no action `{action}`")]
    Missing { controller: String, action: String },

    #[error("action `{action}` of controller `{controller}` has an incompatible signature: {reason}")]
    IncompatibleSignature {
        controller: String,
        action: String,
        reason: String,
    },
}

/// A collaborator exposing routes to bind and the actions behind them.
pub trait Controller: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Routes this controller wants bound.
    fn routes(&self) -> Vec<RouteSpec>;

    /// Resolve an action by name.
    fn action(&self, name: &str) -> Result<Action, ActionError>;
}

/// Identity comparison of two controller handles.
pub fn same_controller(a: &Arc<dyn Controller>, b: &Arc<dyn Controller>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty;

    impl Controller for Empty {
        fn routes(&self) -> Vec<RouteSpec> {
            Vec::new()
        }

        fn action(&self, name: &str) -> Result<Action, ActionError> {
            Err(ActionError::Missing {
                controller: self.name().to_string(),
                action: name.to_string(),
            })
        }
    }

    #[test]
    fn test_identity_is_by_allocation() {
        let a: Arc<dyn Controller> = Arc::new(Empty);
        let b: Arc<dyn Controller> = Arc::new(Empty);
        assert!(same_controller(&a, &a.clone()));
        assert!(!same_controller(&a, &b));
    }

    #[test]
    fn test_default_name_is_type_name() {
        assert!(Empty.name().ends_with("Empty"));
    }
}
