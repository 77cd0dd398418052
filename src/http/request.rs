//! Per-request context handed to filters and actions.
//!
//! # Responsibilities
//! - Hold the request method and path
//! - Expose the path parameters of the resolved route
//! - Carry attributes filters attach for later filters and the action
//!
//! # Design Decisions
//! - Parameters are extracted once, when the route is resolved
//! - Values stay encoded; decoding is the front-end's business

use std::collections::HashMap;

use crate::http::HttpMethod;

/// Request state visible to the filter chain and the target action.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: HttpMethod,
    path: String,
    parameters: HashMap<String, String>,
    attributes: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(method: HttpMethod, path: impl Into<String>, parameters: HashMap<String, String>) -> Self {
        Self {
            method,
            path: path.into(),
            parameters,
            attributes: HashMap::new(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Encoded value of a path parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }
}
