//! Fluent route construction.
//!
//! ```text
//! RouteBuilder::new()
//!     .route(HttpMethod::Get)
//!     .on("/users/{id}")
//!     .to(controller, "show")
//!     .build()
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::http::HttpMethod;
use crate::routing::controller::{ActionError, Controller, RouteSpec};
use crate::routing::pattern::{RoutePattern, TemplateError};
use crate::routing::route::Route;

/// Why a route could not be built.
#[derive(Debug, Clone, Error)]
pub enum RouteError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("route builder is missing its {field}")]
    Incomplete { field: &'static str },
}

/// Accumulates a method, a template and a controller target.
#[derive(Default)]
pub struct RouteBuilder {
    method: Option<HttpMethod>,
    uri: Option<String>,
    target: Option<(Arc<dyn Controller>, String)>,
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-filled from a controller's declaration.
    pub fn from_spec(spec: &RouteSpec, controller: Arc<dyn Controller>) -> Self {
        Self::new()
            .route(spec.method)
            .on(spec.uri.clone())
            .to(controller, spec.action.clone())
    }

    pub fn route(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn on(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn to(mut self, controller: Arc<dyn Controller>, action: impl Into<String>) -> Self {
        self.target = Some((controller, action.into()));
        self
    }

    /// Compile the template and resolve the action.
    pub fn build(self) -> Result<Route, RouteError> {
        let method = self.method.ok_or(RouteError::Incomplete { field: "method" })?;
        let uri = self.uri.ok_or(RouteError::Incomplete { field: "uri" })?;
        let (controller, action_name) = self.target.ok_or(RouteError::Incomplete { field: "target" })?;

        let pattern = RoutePattern::compile(&uri)?;
        let action = controller.action(&action_name)?;

        Ok(Route::bound(method, pattern, controller, action_name, action))
    }
}
